use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::filter::EventFilter;
use crate::models::{
    CreateEventRequest, EventRecord, EventStatus, Page, PageRequest, UpdateEventRequest, User,
    Venue, VenueSummary,
};
use crate::store::Store;
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::{append_validation_error, end_not_before_start};

fn check_capacity(total_tickets: i32, venue: &Venue) -> AppResult<()> {
    if total_tickets > venue.capacity {
        return Err(AppError::ValidationError(format!(
            "Total tickets ({total_tickets}) exceed venue capacity ({})",
            venue.capacity
        )));
    }
    Ok(())
}

/// Event catalogue operations: the public search and the admin lifecycle.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn venue(&self, id: Uuid) -> AppResult<Venue> {
        self.store.find_venue(id).await?.ok_or_else(|| {
            warn!(venue_id = %id, "Venue not found");
            AppError::NotFound(format!("Venue {id} not found"))
        })
    }

    async fn draft(&self, id: Uuid, action: &str) -> AppResult<EventRecord> {
        let record = self.get_event(id).await?;
        if !record.event.status.is_mutable() {
            warn!(event_id = %id, status = %record.event.status, action, "Event is not a draft");
            return Err(AppError::Conflict(format!(
                "Cannot {action} an event with status {}",
                record.event.status
            )));
        }
        Ok(record)
    }

    pub async fn create_event(
        &self,
        request: CreateEventRequest,
        creator: &User,
    ) -> AppResult<EventRecord> {
        request.validate()?;
        append_validation_error(
            Ok(()),
            "end_date_time",
            end_not_before_start(request.event_date_time, request.end_date_time),
        )?;

        let venue = self.venue(request.venue_id).await?;
        check_capacity(request.total_tickets, &venue)?;

        let event = self
            .store
            .insert_event(request.into_new_event(creator.id))
            .await?;

        info!(event_id = %event.id, venue_id = %venue.id, created_by = %creator.id, "Event created");

        Ok(EventRecord {
            event,
            venue: VenueSummary::from(&venue),
            creator_name: creator.name.clone(),
        })
    }

    /// Any status.
    pub async fn get_event(&self, id: Uuid) -> AppResult<EventRecord> {
        self.store.find_event(id).await?.ok_or_else(|| {
            warn!(event_id = %id, "Event not found");
            AppError::NotFound(format!("Event {id} not found"))
        })
    }

    /// Drafts, cancelled and completed events are reported as missing.
    pub async fn get_published_event(&self, id: Uuid) -> AppResult<EventRecord> {
        match self.store.find_event(id).await? {
            Some(record) if record.event.status == EventStatus::Published => Ok(record),
            _ => {
                warn!(event_id = %id, "Published event not found");
                Err(AppError::NotFound(format!("Event {id} not found")))
            }
        }
    }

    pub async fn search_events(
        &self,
        filter: &EventFilter,
        page: &PageRequest,
    ) -> AppResult<Page<EventRecord>> {
        let predicate = filter.to_predicate();
        if filter.is_unrestricted() {
            debug!(page = page.page, size = page.size, "Listing all published events");
        } else {
            debug!(?predicate, page = page.page, size = page.size, "Searching events");
        }
        self.store.search_events(&predicate, page).await
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        request: UpdateEventRequest,
    ) -> AppResult<EventRecord> {
        let EventRecord {
            mut event,
            venue: current_venue,
            creator_name,
        } = self.draft(id, "update").await?;

        let now = Utc::now();
        request.validate()?;

        let venue = self.venue(request.venue_id.unwrap_or(event.venue_id)).await?;
        let total_tickets = request.total_tickets.unwrap_or(event.total_tickets);
        if request.total_tickets.is_some() || venue.id != current_venue.id {
            check_capacity(total_tickets, &venue)?;
        }

        let available_tickets = event.available_tickets + (total_tickets - event.total_tickets);
        if available_tickets < 0 {
            return Err(AppError::ValidationError(format!(
                "Cannot reduce total tickets to {total_tickets}: {} already sold",
                event.total_tickets - event.available_tickets
            )));
        }

        request.apply_to(&mut event);
        append_validation_error(
            Ok(()),
            "end_date_time",
            end_not_before_start(event.event_date_time, event.end_date_time),
        )?;

        event.venue_id = venue.id;
        event.total_tickets = total_tickets;
        event.available_tickets = available_tickets;
        event.updated_at = now;

        self.store.update_event(&event).await?;
        info!(event_id = %id, "Event updated");

        Ok(EventRecord {
            event,
            venue: VenueSummary::from(&venue),
            creator_name,
        })
    }

    async fn transition(&self, id: Uuid, next: EventStatus) -> AppResult<EventRecord> {
        let mut record = self.get_event(id).await?;
        let current = record.event.status;

        if !current.can_transition_to(next) {
            warn!(event_id = %id, from = %current, to = %next, "Rejected status change");
            return Err(AppError::Conflict(format!(
                "Cannot change event status from {current} to {next}"
            )));
        }

        record.event.status = next;
        record.event.updated_at = Utc::now();
        self.store.update_event(&record.event).await?;

        info!(event_id = %id, from = %current, to = %next, "Event status changed");
        Ok(record)
    }

    pub async fn publish_event(&self, id: Uuid) -> AppResult<EventRecord> {
        self.transition(id, EventStatus::Published).await
    }

    pub async fn cancel_event(&self, id: Uuid) -> AppResult<EventRecord> {
        self.transition(id, EventStatus::Cancelled).await
    }

    pub async fn delete_event(&self, id: Uuid) -> AppResult<()> {
        self.draft(id, "delete").await?;
        self.store.delete_event(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
