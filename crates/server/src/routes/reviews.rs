use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use dealership_reviews::{DealerId, NewReview, Review};
use std::sync::Arc;

/// GET /fetchReviews
pub async fn fetch_reviews(State(state): State<Arc<ServerState>>) -> ServerResult<Json<Vec<Review>>> {
    let reviews = state
        .reviews
        .list_all()
        .await
        .map_err(ServerError::store("Error fetching documents"))?;
    Ok(Json(reviews))
}

/// GET /fetchReviews/dealer/{id}
pub async fn fetch_reviews_by_dealer(
    State(state): State<Arc<ServerState>>,
    Path(dealer_id): Path<String>,
) -> ServerResult<Json<Vec<Review>>> {
    let reviews = state
        .reviews
        .list_by_dealer(&DealerId::from_path(&dealer_id))
        .await
        .map_err(ServerError::store("Error fetching documents"))?;
    Ok(Json(reviews))
}

/// POST /insert_review
///
/// The body is read raw, whatever its content type, and must decode as a
/// review object. Nothing touches the store until it does.
pub async fn insert_review(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<Review>> {
    let candidate: NewReview = serde_json::from_slice(&body).map_err(ServerError::InvalidJson)?;

    let review = state
        .reviews
        .append(candidate)
        .await
        .map_err(ServerError::store("Error inserting review"))?;

    tracing::info!(review_id = review.id, dealership = %review.dealership, "Review inserted");
    Ok(Json(review))
}
