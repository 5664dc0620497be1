use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::extract::AppPath;
use crate::utils::response::success;

pub async fn list_venues(State(state): State<AppState>) -> AppResult<Response> {
    let venues = state.venues.list_venues().await?;
    Ok(success(venues, "Venues retrieved successfully"))
}

pub async fn get_venue(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    let venue = state.venues.get_venue(id).await?;
    Ok(success(venue, "Venue retrieved successfully"))
}
