use uuid::Uuid;

use crate::{
    access::{self, Area},
    error::{AppError, AppResult},
    models::Product,
    session::Session,
    state::AppState,
};

pub async fn list_wishlist(state: &AppState, session: &Session) -> AppResult<Vec<Product>> {
    let user = access::require(session, Area::Wishlist)?;
    state.store.wishlist_products(user.user_id).await
}

/// Flips the product's wishlist membership and returns whether it is now
/// wishlisted.
pub async fn toggle(state: &AppState, session: &Session, product_id: Uuid) -> AppResult<bool> {
    let user = access::require(session, Area::Wishlist)?;
    if state.store.find_product(product_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let wishlisted = if state
        .store
        .wishlist_contains(user.user_id, product_id)
        .await?
    {
        state
            .store
            .remove_from_wishlist(user.user_id, product_id)
            .await?;
        false
    } else {
        state.store.add_to_wishlist(user.user_id, product_id).await?;
        true
    };

    tracing::info!(user_id = %user.user_id, %product_id, wishlisted, "wishlist toggled");
    Ok(wishlisted)
}
