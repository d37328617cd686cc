use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{OrderStatus, Profile};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileList {
    pub items: Vec<Profile>,
}
