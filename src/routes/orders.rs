use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithItems, PlacedOrder},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::order_service,
    session::Session,
    state::AppState,
    validation::ShippingForm,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders of the current user, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let items = order_service::list_orders(&state, &session).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = ShippingForm,
    responses(
        (status = 200, description = "Order placed; `cart_cleared` reports whether the cart was emptied", body = ApiResponse<PlacedOrder>),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Invalid shipping form or empty cart"),
        (status = 502, description = "Order could not be written; nothing was kept"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ShippingForm>,
) -> AppResult<Json<ApiResponse<PlacedOrder>>> {
    let placed = order_service::place_order(&state, &session, form).await?;
    let message = if placed.cart_cleared {
        "Checkout success"
    } else {
        "Order placed; the cart could not be emptied"
    };
    Ok(Json(ApiResponse::success(
        message,
        placed,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = order_service::get_order(&state, &session, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}
