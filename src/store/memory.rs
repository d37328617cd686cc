use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CartRow, StorefrontStore};
use crate::{
    error::{AppError, AppResult},
    models::{Account, CartLine, Order, OrderItem, OrderStatus, Product, Profile, Review},
};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    products: Vec<Product>,
    cart: Vec<CartRow>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    wishlist: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    reviews: Vec<Review>,
}

/// In-process store with the same uniqueness and cascade rules as the
/// Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(what: &str) -> AppError {
    AppError::RemoteWriteFailed(format!("duplicate key value violates unique constraint on {what}"))
}

#[async_trait]
impl StorefrontStore for MemoryStore {
    async fn insert_account(&self, profile: Profile, password_hash: String) -> AppResult<Profile> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .iter()
            .any(|a| a.profile.email == profile.email || a.profile.id == profile.id)
        {
            return Err(conflict("profiles"));
        }
        tables.accounts.push(Account {
            profile: profile.clone(),
            password_hash,
        });
        Ok(profile)
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.profile.email == email).cloned())
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.profile.id == id)
            .map(|a| a.profile.clone()))
    }

    async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().map(|a| a.profile.clone()).collect())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products = tables.products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: Product) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.iter().any(|p| p.id == product.id) {
            return Err(conflict("products"));
        }
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> AppResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(None);
        };
        existing.title = product.title;
        existing.description = product.description;
        existing.category = product.category;
        existing.image_url = product.image_url;
        existing.price = product.price;
        existing.stock = product.stock;
        Ok(Some(existing.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.order_items.iter().any(|i| i.product_id == id) {
            return Err(AppError::RemoteWriteFailed(
                "product is referenced by order_items".into(),
            ));
        }
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Ok(false);
        }
        tables.cart.retain(|c| c.product_id != id);
        tables.wishlist.retain(|(_, product_id, _)| *product_id != id);
        tables.reviews.retain(|r| r.product_id != id);
        Ok(true)
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let tables = self.tables.read().await;
        tables
            .cart
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| {
                tables
                    .products
                    .iter()
                    .find(|p| p.id == row.product_id)
                    .map(|product| CartLine::new(row.id, row.user_id, product.clone(), row.quantity))
            })
            .collect()
    }

    async fn find_cart_row(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Option<CartRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cart
            .iter()
            .find(|row| row.user_id == user_id && row.product_id == product_id)
            .cloned())
    }

    async fn insert_cart_row(&self, row: CartRow) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if row.quantity < 1 {
            return Err(AppError::RemoteWriteFailed("cart quantity check violated".into()));
        }
        if tables
            .cart
            .iter()
            .any(|c| c.id == row.id || (c.user_id == row.user_id && c.product_id == row.product_id))
        {
            return Err(conflict("cart"));
        }
        tables.cart.push(row);
        Ok(())
    }

    async fn set_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if quantity < 1 {
            return Err(AppError::RemoteWriteFailed("cart quantity check violated".into()));
        }
        match tables
            .cart
            .iter_mut()
            .find(|c| c.id == line_id && c.user_id == user_id)
        {
            Some(row) => {
                row.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_cart_row(&self, user_id: Uuid, line_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.cart.len();
        tables.cart.retain(|c| !(c.id == line_id && c.user_id == user_id));
        Ok(tables.cart.len() < before)
    }

    async fn clear_cart(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.cart.len();
        tables.cart.retain(|c| c.user_id != user_id);
        Ok((before - tables.cart.len()) as u64)
    }

    async fn insert_order(&self, order: Order) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(conflict("orders"));
        }
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> AppResult<Vec<OrderItem>> {
        let mut tables = self.tables.write().await;
        for item in &items {
            if !tables.orders.iter().any(|o| o.id == item.order_id) {
                return Err(AppError::RemoteWriteFailed(format!(
                    "order {} does not exist",
                    item.order_id
                )));
            }
            if !tables.products.iter().any(|p| p.id == item.product_id) {
                return Err(AppError::RemoteWriteFailed(format!(
                    "product {} does not exist",
                    item.product_id
                )));
            }
        }
        tables.order_items.extend(items.iter().cloned());
        Ok(items)
    }

    async fn delete_order(&self, order_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.orders.len();
        tables.orders.retain(|o| o.id != order_id);
        tables.order_items.retain(|i| i.order_id != order_id);
        Ok(tables.orders.len() < before)
    }

    async fn list_orders(&self, user_id: Option<Uuid>) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| user_id.is_none_or(|id| o.user_id == id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let tables = self.tables.read().await;
        Ok(tables
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_order_items_for_seller(&self, seller_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let tables = self.tables.read().await;
        let owned = |product_id: Uuid| {
            tables
                .products
                .iter()
                .any(|p| p.id == product_id && p.seller_id == seller_id)
        };
        let placed_at = |order_id: Uuid| {
            tables
                .orders
                .iter()
                .find(|o| o.id == order_id)
                .map(|o| o.created_at)
        };
        let mut sales: Vec<(Option<DateTime<Utc>>, OrderItem)> = tables
            .order_items
            .iter()
            .filter(|i| owned(i.product_id))
            .map(|i| (placed_at(i.order_id), i.clone()))
            .collect();
        sales.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(sales.into_iter().map(|(_, item)| item).collect())
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .map(|order| {
                order.status = status;
                order.clone()
            }))
    }

    async fn wishlist_contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .wishlist
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == product_id))
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .wishlist
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == product_id)
        {
            return Err(conflict("wishlist"));
        }
        tables.wishlist.push((user_id, product_id, Utc::now()));
        Ok(())
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.wishlist.len();
        tables
            .wishlist
            .retain(|(u, p, _)| !(*u == user_id && *p == product_id));
        Ok(tables.wishlist.len() < before)
    }

    async fn wishlist_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<_> = tables
            .wishlist
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .collect();
        entries.sort_by(|a, b| b.2.cmp(&a.2));
        Ok(entries
            .into_iter()
            .filter_map(|(_, product_id, _)| tables.products.iter().find(|p| p.id == *product_id).cloned())
            .collect())
    }

    async fn insert_review(&self, review: Review) -> AppResult<Review> {
        let mut tables = self.tables.write().await;
        if tables
            .reviews
            .iter()
            .any(|r| r.product_id == review.product_id && r.user_id == review.user_id)
        {
            return Err(conflict("reviews"));
        }
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
