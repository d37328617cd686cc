use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{models::{Profile, Role}, validation::not_blank};

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    /// Defaults to `buyer`.
    pub role: Option<Role>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    pub token: String,
    pub profile: Profile,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub sid: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignOutResponse {
    pub user_id: Uuid,
}
