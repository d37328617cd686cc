use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    access::{self, Area},
    dto::reviews::AddReviewRequest,
    error::{AppError, AppResult},
    models::{Review, ReviewSummary},
    session::Session,
    state::AppState,
};

/// Count and mean rating, rounded to one decimal place.
pub fn summarize(reviews: &[Review]) -> ReviewSummary {
    if reviews.is_empty() {
        return ReviewSummary {
            count: 0,
            average_rating: None,
        };
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let average = Decimal::from(sum) / Decimal::from(reviews.len() as i64);
    ReviewSummary {
        count: reviews.len(),
        average_rating: Some(average.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)),
    }
}

pub async fn add_review(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
    payload: AddReviewRequest,
) -> AppResult<Review> {
    let user = access::require(session, Area::Account)?;
    Review::check_rating(payload.rating)?;

    let product = state
        .store
        .find_product(product_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if product.seller_id == user.user_id {
        return Err(AppError::Forbidden);
    }

    let existing = state.store.list_reviews(product_id).await?;
    if existing.iter().any(|r| r.user_id == user.user_id) {
        return Err(AppError::validation("You have already reviewed this product"));
    }

    let comment = payload
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let review = state
        .store
        .insert_review(Review {
            id: Uuid::new_v4(),
            product_id,
            user_id: user.user_id,
            rating: payload.rating,
            comment,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(%product_id, user_id = %user.user_id, rating = review.rating, "review added");
    Ok(review)
}

pub async fn list_reviews(state: &AppState, product_id: Uuid) -> AppResult<Vec<Review>> {
    if state.store.find_product(product_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    state.store.list_reviews(product_id).await
}
