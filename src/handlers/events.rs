use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::filter::EventFilter;
use crate::models::{EventCategory, EventResponse, EventSummary, PageRequest};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::extract::{AppPath, AppQuery};
use crate::utils::params::{blank_as_none, blank_as_none_datetime};
use crate::utils::response::success;

/// `GET /api/events` query string. Text inputs are passed through untrimmed;
/// blank ones are dropped when the filter is built.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<EventCategory>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "blank_as_none_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl SearchParams {
    pub fn page_request(&self) -> AppResult<PageRequest> {
        PageRequest::from_params(self.page, self.size, self.sort.as_deref())
    }

    pub fn into_filter(self) -> EventFilter {
        EventFilter {
            q: self.q,
            category: self.category,
            city: self.city,
            start_date: self.start_date,
            end_date: self.end_date,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

pub async fn search_events(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Response> {
    let page = params.page_request()?;
    let filter = params.into_filter();

    let results = state
        .events
        .search_events(&filter, &page)
        .await?
        .map(EventSummary::from);

    Ok(success(results, "Events retrieved successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Response> {
    let record = state.events.get_published_event(id).await?;
    Ok(success(
        EventResponse::from(record),
        "Event retrieved successfully",
    ))
}
