use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductRequest, ProductList, RemovedProduct, SalesList, UpdateProductRequest,
    },
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    services::product_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_own_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/sales", get(list_sales))
}

#[utoipa::path(
    get,
    path = "/api/seller/products",
    responses(
        (status = 200, description = "Products listed by the caller", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn list_own_products(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = product_service::list_seller_products(&state, &session).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/seller/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid product fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::create_product(&state, &session, payload).await?;
    Ok(Json(ApiResponse::success("Product created", product, None)))
}

#[utoipa::path(
    put,
    path = "/api/seller/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn update_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::update_product(&state, &session, id, payload).await?;
    Ok(Json(ApiResponse::success("Product updated", product, None)))
}

#[utoipa::path(
    delete,
    path = "/api/seller/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<RemovedProduct>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Product is referenced by orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RemovedProduct>>> {
    product_service::delete_product(&state, &session, id).await?;
    Ok(Json(ApiResponse::success(
        "Product deleted",
        RemovedProduct { id },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/seller/sales",
    responses(
        (status = 200, description = "Order lines for the caller's products", body = ApiResponse<SalesList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<SalesList>>> {
    let items = product_service::list_seller_sales(&state, &session).await?;
    let meta = Meta::counted(items.len());
    Ok(Json(ApiResponse::success("Sales", SalesList { items }, Some(meta))))
}
