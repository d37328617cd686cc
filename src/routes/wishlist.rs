use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{WishlistProductList, WishlistToggle},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::wishlist_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/{product_id}/toggle", post(toggle_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses(
        (status = 200, description = "Wishlisted products", body = ApiResponse<WishlistProductList>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<WishlistProductList>>> {
    let items = wishlist_service::list_wishlist(&state, &session).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success(
        "OK",
        WishlistProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/{product_id}/toggle",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Wishlist membership flipped", body = ApiResponse<WishlistToggle>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WishlistToggle>>> {
    let wishlisted = wishlist_service::toggle(&state, &session, product_id).await?;
    let message = if wishlisted {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    Ok(Json(ApiResponse::success(
        message,
        WishlistToggle {
            product_id,
            wishlisted,
        },
        None,
    )))
}
