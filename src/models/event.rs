use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::venue::VenueSummary;
use crate::utils::validation::{http_url_or_empty, in_future, not_blank, price_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::Cancelled => "CANCELLED",
            EventStatus::Completed => "COMPLETED",
        }
    }

    /// Only drafts may be edited or deleted.
    pub fn is_mutable(self) -> bool {
        self == EventStatus::Draft
    }

    pub fn can_transition_to(self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Published) | (EventStatus::Draft, EventStatus::Cancelled)
        )
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Music,
    Sports,
    Theater,
    Comedy,
    Conference,
    Festival,
    Exhibition,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 8] = [
        EventCategory::Music,
        EventCategory::Sports,
        EventCategory::Theater,
        EventCategory::Comedy,
        EventCategory::Conference,
        EventCategory::Festival,
        EventCategory::Exhibition,
        EventCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Music => "MUSIC",
            EventCategory::Sports => "SPORTS",
            EventCategory::Theater => "THEATER",
            EventCategory::Comedy => "COMEDY",
            EventCategory::Conference => "CONFERENCE",
            EventCategory::Festival => "FESTIVAL",
            EventCategory::Exhibition => "EXHIBITION",
            EventCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown event category '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artist_name: Option<String>,
    pub event_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub price: Decimal,
    pub total_tickets: i32,
    pub available_tickets: i32,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub category: EventCategory,
    pub venue_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event joined with the venue and creator data every view needs.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub event: Event,
    pub venue: VenueSummary,
    pub creator_name: String,
}

/// Insert payload; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub artist_name: Option<String>,
    pub event_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub price: Decimal,
    pub total_tickets: i32,
    pub available_tickets: i32,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub category: EventCategory,
    pub venue_id: Uuid,
    pub created_by: Uuid,
}

/// End-before-start is checked by the service once the effective times are known.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(
        custom(function = "not_blank", message = "name is required"),
        length(max = 300, message = "name cannot exceed 300 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "description is required"),
        length(max = 5000, message = "description cannot exceed 5000 characters")
    )]
    pub description: String,
    #[validate(length(max = 200, message = "artistName cannot exceed 200 characters"))]
    pub artist_name: Option<String>,
    #[validate(custom(function = "in_future"))]
    pub event_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    #[validate(custom(function = "price_amount"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "totalTickets must be at least 1"))]
    pub total_tickets: i32,
    #[validate(
        length(max = 500, message = "imageUrl cannot exceed 500 characters"),
        custom(function = "http_url_or_empty", message = "imageUrl must be a valid URL or empty")
    )]
    pub image_url: Option<String>,
    pub category: EventCategory,
    pub venue_id: Uuid,
}

impl CreateEventRequest {
    pub fn into_new_event(self, created_by: Uuid) -> NewEvent {
        NewEvent {
            name: self.name,
            description: self.description,
            artist_name: self.artist_name,
            event_date_time: self.event_date_time,
            end_date_time: self.end_date_time,
            price: self.price,
            total_tickets: self.total_tickets,
            available_tickets: self.total_tickets,
            image_url: self.image_url,
            status: EventStatus::Draft,
            category: self.category,
            venue_id: self.venue_id,
            created_by,
        }
    }
}

/// Partial update: omitted fields are left alone, supplied ones follow the create rules.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(
        custom(function = "not_blank", message = "name cannot be blank"),
        length(max = 300, message = "name cannot exceed 300 characters")
    )]
    pub name: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "description cannot be blank"),
        length(max = 5000, message = "description cannot exceed 5000 characters")
    )]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "artistName cannot exceed 200 characters"))]
    pub artist_name: Option<String>,
    #[validate(custom(function = "in_future"))]
    pub event_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    #[validate(custom(function = "price_amount"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "totalTickets must be at least 1"))]
    pub total_tickets: Option<i32>,
    #[validate(
        length(max = 500, message = "imageUrl cannot exceed 500 characters"),
        custom(function = "http_url_or_empty", message = "imageUrl must be a valid URL or empty")
    )]
    pub image_url: Option<String>,
    pub category: Option<EventCategory>,
    pub venue_id: Option<Uuid>,
}

impl UpdateEventRequest {
    /// Copies the supplied descriptive fields. Venue and ticket counts are
    /// handled by the caller since they need cross-entity checks.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(artist_name) = &self.artist_name {
            event.artist_name = Some(artist_name.clone());
        }
        if let Some(start) = self.event_date_time {
            event.event_date_time = start;
        }
        if let Some(end) = self.end_date_time {
            event.end_date_time = Some(end);
        }
        if let Some(price) = self.price {
            event.price = price;
        }
        if let Some(image_url) = &self.image_url {
            event.image_url = Some(image_url.clone());
        }
        if let Some(category) = self.category {
            event.category = category;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artist_name: Option<String>,
    pub event_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub price: Decimal,
    pub total_tickets: i32,
    pub available_tickets: i32,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub category: EventCategory,
    pub venue: VenueSummary,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRecord> for EventResponse {
    fn from(record: EventRecord) -> Self {
        let EventRecord {
            event,
            venue,
            creator_name,
        } = record;
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            artist_name: event.artist_name,
            event_date_time: event.event_date_time,
            end_date_time: event.end_date_time,
            price: event.price,
            total_tickets: event.total_tickets,
            available_tickets: event.available_tickets,
            image_url: event.image_url,
            status: event.status,
            category: event.category,
            venue,
            created_by_name: creator_name,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Listing view used by the public search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub artist_name: Option<String>,
    pub event_date_time: DateTime<Utc>,
    pub price: Decimal,
    pub available_tickets: i32,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub category: EventCategory,
    pub venue_name: String,
    pub venue_city: String,
}

impl From<EventRecord> for EventSummary {
    fn from(record: EventRecord) -> Self {
        let EventRecord { event, venue, .. } = record;
        Self {
            id: event.id,
            name: event.name,
            artist_name: event.artist_name,
            event_date_time: event.event_date_time,
            price: event.price,
            available_tickets: event.available_tickets,
            image_url: event.image_url,
            status: event.status,
            category: event.category,
            venue_name: venue.name,
            venue_city: venue.city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AppError;
    use chrono::Duration;

    fn request(now: DateTime<Utc>) -> CreateEventRequest {
        CreateEventRequest {
            name: "Night Lights".into(),
            description: "Synth showcase".into(),
            artist_name: Some("The Pulses".into()),
            event_date_time: now + Duration::days(7),
            end_date_time: None,
            price: Decimal::new(4_500, 2),
            total_tickets: 200,
            image_url: Some(String::new()),
            category: EventCategory::Music,
            venue_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn only_drafts_move_forward() {
        use EventStatus::*;
        assert!(Draft.can_transition_to(Published));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(!Draft.can_transition_to(Completed));
        assert!(!Published.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Published));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(Draft.is_mutable());
        assert!(!Published.is_mutable());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("music".parse::<EventCategory>(), Ok(EventCategory::Music));
        assert_eq!("THEATER".parse::<EventCategory>(), Ok(EventCategory::Theater));
        assert!("opera".parse::<EventCategory>().is_err());
    }

    #[test]
    fn status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Published).unwrap(),
            "\"PUBLISHED\""
        );
    }

    #[test]
    fn valid_create_request_passes() {
        assert!(request(Utc::now()).validate().is_ok());
    }

    #[test]
    fn past_start_and_zero_tickets_are_rejected() {
        let now = Utc::now();
        let mut req = request(now);
        req.event_date_time = now - Duration::hours(1);
        req.total_tickets = 0;
        match req.validate().map_err(AppError::from) {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["eventDateTime", "totalTickets"]);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn bad_price_and_image_url_are_rejected() {
        let mut req = request(Utc::now());
        req.price = Decimal::new(1_999, 3);
        req.image_url = Some("ftp://cdn.example.com/a.png".into());
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("image_url"));
    }

    #[test]
    fn new_event_starts_as_draft_with_all_tickets_available() {
        let creator = Uuid::new_v4();
        let new_event = request(Utc::now()).into_new_event(creator);
        assert_eq!(new_event.status, EventStatus::Draft);
        assert_eq!(new_event.available_tickets, 200);
        assert_eq!(new_event.created_by, creator);
    }

    #[test]
    fn update_rejects_blank_name_but_allows_omission() {
        assert!(UpdateEventRequest::default().validate().is_ok());
        let update = UpdateEventRequest {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
