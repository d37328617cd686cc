use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Review, ReviewSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub summary: ReviewSummary,
    pub items: Vec<Review>,
}
