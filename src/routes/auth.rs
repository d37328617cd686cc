use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    access::{self, Access, Area},
    dto::auth::{SignInRequest, SignInResponse, SignOutResponse, SignUpRequest},
    error::AppResult,
    models::Profile,
    response::{ApiResponse, Meta},
    services::identity_service,
    session::Session,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessDecision {
    pub access: Access,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
        .route("/access/{area}", get(check_access))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<Profile>),
        (status = 422, description = "Invalid or duplicate sign-up")
    ),
    tag = "Auth"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = identity_service::sign_up(&state, payload).await?;
    Ok(Json(ApiResponse::success("Account created", profile, None)))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SignInResponse>),
        (status = 422, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> AppResult<Json<ApiResponse<SignInResponse>>> {
    let resp = identity_service::sign_in(&state, payload).await?;
    Ok(Json(ApiResponse::success("Signed in", resp, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = ApiResponse<SignOutResponse>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<SignOutResponse>>> {
    let user_id = identity_service::sign_out(&state, &session)?;
    Ok(Json(ApiResponse::success(
        "Signed out",
        SignOutResponse { user_id },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current profile", body = ApiResponse<Profile>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = identity_service::current_profile(&state, &session).await?;
    Ok(Json(ApiResponse::success("OK", profile, None)))
}

#[utoipa::path(
    get,
    path = "/api/auth/access/{area}",
    params(
        ("area" = Area, Path, description = "account, cart, checkout, orders, wishlist, seller_dashboard or admin_dashboard")
    ),
    responses(
        (status = 200, description = "Navigation decision for the area", body = ApiResponse<AccessDecision>)
    ),
    tag = "Auth"
)]
pub async fn check_access(
    session: Session,
    Path(area): Path<Area>,
) -> Json<ApiResponse<AccessDecision>> {
    let access = access::gate(&session, area);
    Json(ApiResponse::success("OK", AccessDecision { access }, None))
}
