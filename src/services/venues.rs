use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateVenueRequest, UpdateVenueRequest, Venue};
use crate::store::Store;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct VenueService {
    store: Arc<dyn Store>,
}

impl VenueService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_venue(&self, request: CreateVenueRequest) -> AppResult<Venue> {
        request.validate()?;
        let venue = self.store.insert_venue(request.into_new_venue()).await?;
        info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    pub async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        self.store.list_venues().await
    }

    pub async fn get_venue(&self, id: Uuid) -> AppResult<Venue> {
        self.store.find_venue(id).await?.ok_or_else(|| {
            warn!(venue_id = %id, "Venue not found");
            AppError::NotFound(format!("Venue {id} not found"))
        })
    }

    /// Supplied fields overwrite; absent ones are kept.
    pub async fn update_venue(&self, id: Uuid, request: UpdateVenueRequest) -> AppResult<Venue> {
        request.validate()?;
        let mut venue = self.get_venue(id).await?;

        request.apply_to(&mut venue);
        venue.updated_at = Utc::now();
        self.store.update_venue(&venue).await?;

        info!(venue_id = %id, "Venue updated");
        Ok(venue)
    }

    pub async fn delete_venue(&self, id: Uuid) -> AppResult<()> {
        self.get_venue(id).await?;

        let events = self.store.count_events_for_venue(id).await?;
        if events > 0 {
            warn!(venue_id = %id, events, "Venue still has events");
            return Err(AppError::Conflict(format!(
                "Venue {id} still has {events} event(s)"
            )));
        }

        self.store.delete_venue(id).await?;
        info!(venue_id = %id, "Venue deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, EventStatus, NewEvent};
    use crate::store::{EventRepository, MemoryStore};
    use rust_decimal::Decimal;

    fn request(name: &str) -> CreateVenueRequest {
        CreateVenueRequest {
            name: name.into(),
            address: "500 E Cesar Chavez St".into(),
            city: "Austin".into(),
            state: "TX".into(),
            zip_code: "78701".into(),
            country: None,
            capacity: 2_000,
            description: None,
            image_url: None,
            contact_email: Some("box@venue.example".into()),
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_country_and_lists_by_name() {
        let service = VenueService::new(Arc::new(MemoryStore::new()));
        let zilker = service.create_venue(request("Zilker Park")).await.unwrap();
        service.create_venue(request("ACL Live")).await.unwrap();

        assert_eq!(zilker.country, "USA");
        let names: Vec<_> = service
            .list_venues()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["ACL Live", "Zilker Park"]);
    }

    #[tokio::test]
    async fn invalid_venue_is_rejected() {
        let service = VenueService::new(Arc::new(MemoryStore::new()));
        let mut bad = request("");
        bad.capacity = 0;
        assert!(matches!(
            service.create_venue(bad).await,
            Err(AppError::InvalidFields(fields)) if fields.len() == 2
        ));
    }

    #[tokio::test]
    async fn update_is_partial() {
        let service = VenueService::new(Arc::new(MemoryStore::new()));
        let venue = service.create_venue(request("Stubb's")).await.unwrap();

        let updated = service
            .update_venue(
                venue.id,
                UpdateVenueRequest {
                    capacity: Some(2_200),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.capacity, 2_200);
        assert_eq!(updated.name, "Stubb's");
        assert_eq!(service.get_venue(venue.id).await.unwrap().capacity, 2_200);
    }

    #[tokio::test]
    async fn delete_conflicts_while_events_reference_venue() {
        let store = Arc::new(MemoryStore::new());
        let service = VenueService::new(store.clone());
        let venue = service.create_venue(request("Mohawk")).await.unwrap();

        store
            .insert_event(NewEvent {
                name: "Show".into(),
                description: "desc".into(),
                artist_name: None,
                event_date_time: Utc::now(),
                end_date_time: None,
                price: Decimal::new(10, 0),
                total_tickets: 10,
                available_tickets: 10,
                image_url: None,
                status: EventStatus::Draft,
                category: EventCategory::Music,
                venue_id: venue.id,
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert!(matches!(
            service.delete_venue(venue.id).await,
            Err(AppError::Conflict(_))
        ));

        let empty = service.create_venue(request("Empty Room")).await.unwrap();
        service.delete_venue(empty.id).await.unwrap();
        assert!(matches!(
            service.get_venue(empty.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
