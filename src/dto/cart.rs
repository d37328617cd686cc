use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::CartLine,
    pricing::format_zar,
    services::cart_service::Cart,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartLineRequest {
    /// Zero or less removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: i64,
    #[schema(value_type = String, example = "400.00")]
    pub total: Decimal,
    pub total_display: String,
}

impl TryFrom<Cart> for CartView {
    type Error = AppError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        let total = cart.total()?;
        Ok(Self {
            item_count: cart.item_count(),
            total,
            total_display: format_zar(total),
            lines: cart.into_lines(),
        })
    }
}
