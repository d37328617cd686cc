use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, UpdateCartLineRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::cart_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route("/{line_id}", delete(remove_from_cart).patch(update_quantity))
}

fn cart_response(
    message: &str,
    cart: cart_service::Cart,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = CartView::try_from(cart)?;
    let meta = Meta::counted(view.lines.len());
    Ok(Json(ApiResponse::success(message, view, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current user", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::load_cart(&state, &session).await?;
    cart_response("OK", cart)
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add to cart or increment the existing line", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Invalid quantity or not enough stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart =
        cart_service::add_to_cart(&state, &session, payload.product_id, payload.quantity).await?;
    cart_response("Added to cart", cart)
}

#[utoipa::path(
    patch,
    path = "/api/cart/{line_id}",
    params(
        ("line_id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = UpdateCartLineRequest,
    responses(
        (status = 200, description = "Quantity updated; zero removes the line", body = ApiResponse<CartView>),
        (status = 404, description = "Cart line not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<Uuid>,
    Json(payload): Json<UpdateCartLineRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::update_quantity(&state, &session, line_id, payload.quantity).await?;
    cart_response("Cart updated", cart)
}

#[utoipa::path(
    delete,
    path = "/api/cart/{line_id}",
    params(
        ("line_id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::remove_from_cart(&state, &session, line_id).await?;
    cart_response("Removed from cart", cart)
}
