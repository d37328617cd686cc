use axum::{extract::FromRequestParts, http::header};

use crate::{
    error::AppError, services::identity_service::current_session, session::Session,
    state::AppState,
};

/// Builds the caller's [`Session`] from the `Authorization` header. No header
/// means an anonymous session; a header that does not decode to a live
/// session is rejected.
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Session::anonymous());
        };

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthenticated)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthenticated)?;

        current_session(state, token)
    }
}

