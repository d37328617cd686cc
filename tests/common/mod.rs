#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use storefront_api::{
    error::{AppError, AppResult},
    models::{Account, CartLine, Order, OrderItem, OrderStatus, Product, Profile, Review, Role},
    services::identity_service::{self, SessionTokens},
    session::Session,
    state::AppState,
    store::{CartRow, MemoryStore, StorefrontStore},
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn memory_state() -> AppState {
    AppState::in_memory(JWT_SECRET)
}

pub fn state_with(store: Arc<dyn StorefrontStore>) -> AppState {
    AppState::new(store, SessionTokens::new(JWT_SECRET, 1))
}

/// Creates an account with the given role and returns a session for it.
pub async fn session_for(state: &AppState, role: Role) -> Session {
    let email = format!("{}@example.com", Uuid::new_v4());
    let profile = identity_service::create_account(state, &email, "password123", "Test User", role)
        .await
        .expect("create account");
    Session::authenticated(profile.id, role)
}

pub async fn add_product(state: &AppState, seller_id: Uuid, title: &str, price: Decimal, stock: i32) -> Product {
    let product = Product::new(
        Uuid::new_v4(),
        title.to_string(),
        None,
        Some("groceries".to_string()),
        None,
        price,
        stock,
        seller_id,
        Utc::now(),
    )
    .expect("valid product");
    state.store.insert_product(product).await.expect("insert product")
}

/// [`MemoryStore`] with switchable write failures and a call counter.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_order_items: AtomicBool,
    pub fail_clear_cart: AtomicBool,
    pub fail_order_delete: AtomicBool,
    pub order_inserts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(flag: &AtomicBool, what: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::RemoteWriteFailed(format!("{what} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl StorefrontStore for FlakyStore {
    async fn insert_account(&self, profile: Profile, password_hash: String) -> AppResult<Profile> {
        self.inner.insert_account(profile, password_hash).await
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.inner.find_account_by_email(email).await
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<Profile>> {
        self.inner.find_profile(id).await
    }

    async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        self.inner.list_profiles().await
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        self.inner.find_product(id).await
    }

    async fn insert_product(&self, product: Product) -> AppResult<Product> {
        self.inner.insert_product(product).await
    }

    async fn update_product(&self, product: Product) -> AppResult<Option<Product>> {
        self.inner.update_product(product).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete_product(id).await
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        self.inner.fetch_cart(user_id).await
    }

    async fn find_cart_row(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Option<CartRow>> {
        self.inner.find_cart_row(user_id, product_id).await
    }

    async fn insert_cart_row(&self, row: CartRow) -> AppResult<()> {
        self.inner.insert_cart_row(row).await
    }

    async fn set_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<bool> {
        self.inner.set_cart_quantity(user_id, line_id, quantity).await
    }

    async fn delete_cart_row(&self, user_id: Uuid, line_id: Uuid) -> AppResult<bool> {
        self.inner.delete_cart_row(user_id, line_id).await
    }

    async fn clear_cart(&self, user_id: Uuid) -> AppResult<u64> {
        Self::check(&self.fail_clear_cart, "cart")?;
        self.inner.clear_cart(user_id).await
    }

    async fn insert_order(&self, order: Order) -> AppResult<Order> {
        self.order_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_order(order).await
    }

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> AppResult<Vec<OrderItem>> {
        Self::check(&self.fail_order_items, "order_items")?;
        self.inner.insert_order_items(items).await
    }

    async fn delete_order(&self, order_id: Uuid) -> AppResult<bool> {
        Self::check(&self.fail_order_delete, "orders")?;
        self.inner.delete_order(order_id).await
    }

    async fn list_orders(&self, user_id: Option<Uuid>) -> AppResult<Vec<Order>> {
        self.inner.list_orders(user_id).await
    }

    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        self.inner.find_order(order_id).await
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        self.inner.list_order_items(order_id).await
    }

    async fn list_order_items_for_seller(&self, seller_id: Uuid) -> AppResult<Vec<OrderItem>> {
        self.inner.list_order_items_for_seller(seller_id).await
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Option<Order>> {
        self.inner.set_order_status(order_id, status).await
    }

    async fn wishlist_contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        self.inner.wishlist_contains(user_id, product_id).await
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        self.inner.add_to_wishlist(user_id, product_id).await
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        self.inner.remove_from_wishlist(user_id, product_id).await
    }

    async fn wishlist_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        self.inner.wishlist_products(user_id).await
    }

    async fn insert_review(&self, review: Review) -> AppResult<Review> {
        self.inner.insert_review(review).await
    }

    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        self.inner.list_reviews(product_id).await
    }
}
