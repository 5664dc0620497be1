//! Catalogue management. Every handler requires an [`AdminUser`].

use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::models::{
    CreateEventRequest, CreateVenueRequest, EventResponse, UpdateEventRequest, UpdateVenueRequest,
};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::extract::{AppJson, AppPath};
use crate::utils::response::{created, no_content, success};

pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(request): AppJson<CreateEventRequest>,
) -> AppResult<Response> {
    let record = state.events.create_event(request, &admin).await?;
    Ok(created(
        EventResponse::from(record),
        "Event created successfully",
    ))
}

pub async fn get_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    let record = state.events.get_event(id).await?;
    Ok(success(
        EventResponse::from(record),
        "Event retrieved successfully",
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateEventRequest>,
) -> AppResult<Response> {
    let record = state.events.update_event(id, request).await?;
    Ok(success(
        EventResponse::from(record),
        "Event updated successfully",
    ))
}

pub async fn publish_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    let record = state.events.publish_event(id).await?;
    Ok(success(
        EventResponse::from(record),
        "Event published successfully",
    ))
}

pub async fn cancel_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    let record = state.events.cancel_event(id).await?;
    Ok(success(
        EventResponse::from(record),
        "Event cancelled successfully",
    ))
}

pub async fn delete_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    state.events.delete_event(id).await?;
    Ok(no_content())
}

pub async fn create_venue(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(request): AppJson<CreateVenueRequest>,
) -> AppResult<Response> {
    let venue = state.venues.create_venue(request).await?;
    Ok(created(venue, "Venue created successfully"))
}

pub async fn update_venue(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateVenueRequest>,
) -> AppResult<Response> {
    let venue = state.venues.update_venue(id, request).await?;
    Ok(success(venue, "Venue updated successfully"))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    state.venues.delete_venue(id).await?;
    Ok(no_content())
}
