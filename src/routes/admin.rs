use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{ProfileList, UpdateOrderStatusRequest},
        orders::{OrderList, OrderWithItems},
        products::RemovedProduct,
    },
    error::AppResult,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::admin_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/users", get(list_users))
        .route("/products/{id}", delete(remove_product))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("status" = Option<String>, Query, description = "pending, processing, shipped, delivered or cancelled")
    ),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let items = admin_service::list_all_orders(&state, &session, query.status).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success("Orders", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = admin_service::get_order_admin(&state, &session, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = admin_service::update_order_status(&state, &session, id, payload.status).await?;
    Ok(Json(ApiResponse::success("Status updated", order, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All profiles", body = ApiResponse<ProfileList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<ProfileList>>> {
    let items = admin_service::list_profiles(&state, &session).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success("Users", ProfileList { items }, Some(meta))))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product removed", body = ApiResponse<RemovedProduct>),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Product is referenced by orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn remove_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RemovedProduct>>> {
    admin_service::remove_product(&state, &session, id).await?;
    Ok(Json(ApiResponse::success(
        "Product removed",
        RemovedProduct { id },
        Some(Meta::empty()),
    )))
}
