//! Typed records for the rows the storefront reads and writes.
//!
//! Constructors validate the invariants that must hold at the store boundary
//! (positive quantities, non-negative prices and stock) so that services never
//! operate on arbitrary row shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Largest price a `NUMERIC(12,2)` column holds.
pub const MAX_PRICE: Decimal = dec!(9999999999.99);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Profile row together with its credential, never serialized.
#[derive(Debug, Clone)]
pub struct Account {
    pub profile: Profile,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = String, example = "249.99")]
    pub price: Decimal,
    pub stock: i32,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        title: String,
        description: Option<String>,
        category: Option<String>,
        image_url: Option<String>,
        price: Decimal,
        stock: i32,
        seller_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let fields = ProductFields {
            title,
            description,
            category,
            image_url,
            price,
            stock,
        };
        fields.check()?;
        Ok(Self {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            image_url: fields.image_url,
            price: fields.price,
            stock: fields.stock,
            seller_id,
            created_at,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Seller-editable product columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

impl ProductFields {
    pub fn check(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("title is required"));
        }
        if self.price.is_sign_negative() {
            return Err(AppError::validation("price must not be negative"));
        }
        if self.price.scale() > 2 {
            return Err(AppError::validation("price must have at most two decimal places"));
        }
        if self.price > MAX_PRICE {
            return Err(AppError::validation(format!("price must not exceed {MAX_PRICE}")));
        }
        if self.stock < 0 {
            return Err(AppError::validation("stock must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product: Product,
    pub quantity: i32,
}

impl CartLine {
    pub fn new(id: Uuid, user_id: Uuid, product: Product, quantity: i32) -> AppResult<Self> {
        if quantity < 1 {
            return Err(AppError::validation("cart quantity must be at least 1"));
        }
        Ok(Self {
            id,
            user_id,
            product,
            quantity,
        })
    }

    pub fn line_total(&self) -> AppResult<Decimal> {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| AppError::validation("cart line total is out of range"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "559.00")]
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Price captured when the order was placed.
    #[schema(value_type = String, example = "200.00")]
    pub price: Decimal,
}

impl OrderItem {
    pub fn new(
        id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> AppResult<Self> {
        if quantity < 1 {
            return Err(AppError::validation("order item quantity must be at least 1"));
        }
        if price.is_sign_negative() {
            return Err(AppError::validation("order item price must not be negative"));
        }
        Ok(Self {
            id,
            order_id,
            product_id,
            quantity,
            price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn check_rating(rating: i16) -> AppResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::validation("rating must be between 1 and 5"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReviewSummary {
    pub count: usize,
    #[schema(value_type = Option<String>, example = "4.3")]
    pub average_rating: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn product(price: Decimal, stock: i32) -> AppResult<Product> {
        Product::new(
            Uuid::new_v4(),
            "Rooibos Tea".into(),
            None,
            Some("groceries".into()),
            None,
            price,
            stock,
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn product_rejects_negative_price_and_stock() {
        assert!(product(dec!(10), 1).is_ok());
        assert!(matches!(product(dec!(-0.01), 1), Err(AppError::ValidationFailed(_))));
        assert!(matches!(product(dec!(10), -1), Err(AppError::ValidationFailed(_))));
    }

    #[test]
    fn product_price_must_fit_the_price_column() {
        assert!(product(MAX_PRICE, 1).is_ok());
        assert!(product(dec!(19.99), 1).is_ok());
        assert!(matches!(product(dec!(10.005), 1), Err(AppError::ValidationFailed(_))));
        assert!(matches!(product(dec!(10000000000.00), 1), Err(AppError::ValidationFailed(_))));
        assert!(matches!(product(Decimal::MAX, 1), Err(AppError::ValidationFailed(_))));
    }

    #[test]
    fn cart_line_requires_positive_quantity() {
        let p = product(dec!(25.50), 3).unwrap();
        assert!(CartLine::new(Uuid::new_v4(), Uuid::new_v4(), p.clone(), 0).is_err());
        let line = CartLine::new(Uuid::new_v4(), Uuid::new_v4(), p, 2).unwrap();
        assert_eq!(line.line_total().unwrap(), dec!(51.00));
    }

    #[test]
    fn oversized_line_total_is_an_error() {
        let p = Product {
            price: Decimal::MAX,
            ..product(dec!(1), 3).unwrap()
        };
        let line = CartLine::new(Uuid::new_v4(), Uuid::new_v4(), p, 2).unwrap();
        assert!(matches!(line.line_total(), Err(AppError::ValidationFailed(_))));
    }

    #[test]
    fn order_item_validates_boundary_values() {
        let id = Uuid::new_v4();
        assert!(OrderItem::new(id, id, id, 1, dec!(0)).is_ok());
        assert!(OrderItem::new(id, id, id, 0, dec!(1)).is_err());
        assert!(OrderItem::new(id, id, id, 1, dec!(-1)).is_err());
    }

    #[test]
    fn roles_and_statuses_round_trip_as_lowercase_text() {
        assert_eq!(Role::from_str("seller").unwrap(), Role::Seller);
        assert_eq!(Role::Admin.as_ref(), "admin");
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert!(OrderStatus::from_str("paid").is_err());
    }
}
