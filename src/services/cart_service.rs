//! Per-user cart of (product, quantity) lines.
//!
//! Every mutation writes to the store and then re-reads the whole cart, so
//! the returned [`Cart`] is always what the store currently holds. Two tabs
//! editing the same cart are last-write-wins; there is no version column.

use std::{future::Future, sync::Arc};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    access::{self, Area},
    error::{AppError, AppResult},
    models::CartLine,
    pricing,
    session::Session,
    state::AppState,
    store::{CartRow, StorefrontStore},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    user_id: Uuid,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(user_id: Uuid, lines: Vec<CartLine>) -> Self {
        Self { user_id, lines }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn line_for_product(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price × quantity over the loaded lines.
    pub fn total(&self) -> AppResult<Decimal> {
        pricing::cart_total(&self.lines)
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }
}

async fn reload(store: &dyn StorefrontStore, user_id: Uuid) -> AppResult<Cart> {
    let lines = store.fetch_cart(user_id).await?;
    Ok(Cart::new(user_id, lines))
}

/// Apply `mutation` against the store, then return the authoritative cart.
async fn mutate_and_reload<F, Fut>(state: &AppState, user_id: Uuid, mutation: F) -> AppResult<Cart>
where
    F: FnOnce(Arc<dyn StorefrontStore>) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    mutation(Arc::clone(&state.store)).await?;
    reload(state.store.as_ref(), user_id).await
}

pub async fn load_cart(state: &AppState, session: &Session) -> AppResult<Cart> {
    let user = access::require(session, Area::Cart)?;
    reload(state.store.as_ref(), user.user_id).await
}

/// Adds `quantity` of a product, incrementing the existing line if there is
/// one. The resulting quantity may not exceed the product's stock.
pub async fn add_to_cart(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<Cart> {
    let user = access::require(session, Area::Cart)?;
    if quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1"));
    }

    let product = state
        .store
        .find_product(product_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let existing = state.store.find_cart_row(user.user_id, product_id).await?;
    let in_cart = existing.as_ref().map_or(0, |row| row.quantity);
    let wanted = in_cart.saturating_add(quantity);
    if wanted > product.stock {
        return Err(AppError::validation(format!(
            "only {} of {} in stock",
            product.stock, product.title
        )));
    }

    let user_id = user.user_id;
    let cart = mutate_and_reload(state, user_id, |store| async move {
        let updated = match existing {
            Some(row) => store.set_cart_quantity(user_id, row.id, wanted).await?,
            None => false,
        };
        if !updated {
            store
                .insert_cart_row(CartRow {
                    id: Uuid::new_v4(),
                    user_id,
                    product_id,
                    quantity,
                })
                .await?;
        }
        Ok(())
    })
    .await?;

    tracing::info!(%user_id, %product_id, quantity, "added to cart");
    Ok(cart)
}

/// Overwrites a line's quantity; zero or less removes the line. Stock is not
/// re-checked here.
pub async fn update_quantity(
    state: &AppState,
    session: &Session,
    line_id: Uuid,
    quantity: i32,
) -> AppResult<Cart> {
    if quantity <= 0 {
        return remove_from_cart(state, session, line_id).await;
    }

    let user = access::require(session, Area::Cart)?;
    let user_id = user.user_id;
    mutate_and_reload(state, user_id, |store| async move {
        if store.set_cart_quantity(user_id, line_id, quantity).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    })
    .await
}

pub async fn remove_from_cart(state: &AppState, session: &Session, line_id: Uuid) -> AppResult<Cart> {
    let user = access::require(session, Area::Cart)?;
    let user_id = user.user_id;
    mutate_and_reload(state, user_id, |store| async move {
        if !store.delete_cart_row(user_id, line_id).await? {
            tracing::debug!(%user_id, %line_id, "cart line already gone");
        }
        Ok(())
    })
    .await
}

/// Empties the caller's cart. Only checkout calls this.
pub async fn clear_cart(state: &AppState, session: &Session) -> AppResult<Cart> {
    let user = access::require(session, Area::Checkout)?;
    let user_id = user.user_id;
    mutate_and_reload(state, user_id, |store| async move {
        let removed = store.clear_cart(user_id).await?;
        tracing::debug!(%user_id, removed, "cart cleared");
        Ok(())
    })
    .await
}
