//! Typed handles over the storefront tables.
//!
//! Services only ever talk to [`StorefrontStore`]; row ownership (a buyer
//! only sees their own cart and orders) is expressed by the `user_id`
//! arguments, the same filter the store's row policies apply.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Account, CartLine, Order, OrderItem, OrderStatus, Product, Profile, Review},
};

pub mod memory;
pub mod orm;

pub use memory::MemoryStore;
pub use orm::OrmStore;

/// Raw cart row, before it is joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[async_trait]
pub trait StorefrontStore: Send + Sync {
    async fn insert_account(&self, profile: Profile, password_hash: String) -> AppResult<Profile>;
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    async fn find_profile(&self, id: Uuid) -> AppResult<Option<Profile>>;
    async fn list_profiles(&self) -> AppResult<Vec<Profile>>;

    async fn list_products(&self) -> AppResult<Vec<Product>>;
    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn insert_product(&self, product: Product) -> AppResult<Product>;
    /// Returns `None` when the product no longer exists.
    async fn update_product(&self, product: Product) -> AppResult<Option<Product>>;
    async fn delete_product(&self, id: Uuid) -> AppResult<bool>;

    /// Cart lines joined with their current product, oldest first.
    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;
    async fn find_cart_row(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Option<CartRow>>;
    async fn insert_cart_row(&self, row: CartRow) -> AppResult<()>;
    async fn set_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<bool>;
    async fn delete_cart_row(&self, user_id: Uuid, line_id: Uuid) -> AppResult<bool>;
    async fn clear_cart(&self, user_id: Uuid) -> AppResult<u64>;

    async fn insert_order(&self, order: Order) -> AppResult<Order>;
    /// Writes all rows or none of them.
    async fn insert_order_items(&self, items: Vec<OrderItem>) -> AppResult<Vec<OrderItem>>;
    async fn delete_order(&self, order_id: Uuid) -> AppResult<bool>;
    /// Newest first; `None` lists every user's orders.
    async fn list_orders(&self, user_id: Option<Uuid>) -> AppResult<Vec<Order>>;
    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>>;
    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;
    async fn list_order_items_for_seller(&self, seller_id: Uuid) -> AppResult<Vec<OrderItem>>;
    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Option<Order>>;

    async fn wishlist_contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool>;
    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()>;
    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool>;
    async fn wishlist_products(&self, user_id: Uuid) -> AppResult<Vec<Product>>;

    async fn insert_review(&self, review: Review) -> AppResult<Review>;
    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>>;
}
