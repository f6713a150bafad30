use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::Json;
use dealership_reviews::{DealerId, Dealership};
use std::sync::Arc;

/// GET /fetchDealers
pub async fn fetch_dealers(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<Dealership>>> {
    let dealers = state
        .dealerships
        .list_all()
        .await
        .map_err(ServerError::store("Error fetching dealerships"))?;
    Ok(Json(dealers))
}

/// GET /fetchDealers/{state}
pub async fn fetch_dealers_by_state(
    State(state): State<Arc<ServerState>>,
    Path(state_name): Path<String>,
) -> ServerResult<Json<Vec<Dealership>>> {
    let dealers = state
        .dealerships
        .list_by_state(&state_name)
        .await
        .map_err(ServerError::store("Error fetching dealerships by state"))?;
    Ok(Json(dealers))
}

/// GET /fetchDealer/{id}
pub async fn fetch_dealer(
    State(state): State<Arc<ServerState>>,
    Path(dealer_id): Path<String>,
) -> ServerResult<Json<Dealership>> {
    state
        .dealerships
        .get_by_id(&DealerId::from_path(&dealer_id))
        .await
        .map_err(ServerError::store("Error fetching dealer details"))?
        .map(Json)
        .ok_or(ServerError::NotFound("Dealer not found"))
}
