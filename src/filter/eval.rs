//! Direct evaluation of a [`Predicate`] against an [`EventRecord`].

use std::cmp::Ordering;

use crate::filter::{Field, Predicate, Value};
use crate::models::EventRecord;

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
            (a, b) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

fn scalar(record: &EventRecord, field: Field) -> Option<Value> {
    let event = &record.event;
    match field {
        Field::Status => Some(Value::Status(event.status)),
        Field::Category => Some(Value::Category(event.category)),
        Field::EventDateTime => Some(Value::DateTime(event.event_date_time)),
        Field::Price => Some(Value::Decimal(event.price)),
        Field::Name | Field::ArtistName | Field::VenueCity => None,
    }
}

fn text(record: &EventRecord, field: Field) -> Option<&str> {
    match field {
        Field::Name => Some(&record.event.name),
        Field::ArtistName => record.event.artist_name.as_deref(),
        Field::VenueCity => Some(&record.venue.city),
        _ => None,
    }
}

fn compare(record: &EventRecord, field: Field, value: &Value) -> Option<Ordering> {
    scalar(record, field)?.partial_cmp(value)
}

impl Predicate {
    /// A missing value (e.g. no artist) never matches, as with SQL `NULL`.
    pub fn matches(&self, record: &EventRecord) -> bool {
        match self {
            Predicate::Eq(field, value) => scalar(record, *field).as_ref() == Some(value),
            Predicate::Gte(field, value) => {
                matches!(compare(record, *field, value), Some(Ordering::Greater | Ordering::Equal))
            }
            Predicate::Lte(field, value) => {
                matches!(compare(record, *field, value), Some(Ordering::Less | Ordering::Equal))
            }
            Predicate::Contains(field, needle) => text(record, *field)
                .map_or(false, |haystack| haystack.to_lowercase().contains(needle.as_str())),
            Predicate::And(predicates) => predicates.iter().all(|p| p.matches(record)),
            Predicate::Or(predicates) => predicates.iter().any(|p| p.matches(record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{is_published, EventFilter};
    use crate::models::{Event, EventCategory, EventStatus, VenueSummary};
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn record(
        name: &str,
        artist: Option<&str>,
        city: &str,
        price: i64,
        start: DateTime<Utc>,
        status: EventStatus,
        category: EventCategory,
    ) -> EventRecord {
        let now = Utc::now();
        EventRecord {
            event: Event {
                id: Uuid::new_v4(),
                name: name.into(),
                description: "desc".into(),
                artist_name: artist.map(Into::into),
                event_date_time: start,
                end_date_time: None,
                price: Decimal::new(price, 0),
                total_tickets: 100,
                available_tickets: 100,
                image_url: None,
                status,
                category,
                venue_id: Uuid::new_v4(),
                created_by: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
            },
            venue: VenueSummary {
                id: Uuid::new_v4(),
                name: "Hall".into(),
                address: "1 Main".into(),
                city: city.into(),
                state: "TX".into(),
            },
            creator_name: "Admin".into(),
        }
    }

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, day, 20, 0, 0).unwrap()
    }

    fn published_music(name: &str, city: &str, price: i64) -> EventRecord {
        record(
            name,
            None,
            city,
            price,
            june(10),
            EventStatus::Published,
            EventCategory::Music,
        )
    }

    #[test]
    fn published_base_excludes_other_statuses() {
        let draft = record(
            "Draft",
            None,
            "Austin",
            10,
            june(1),
            EventStatus::Draft,
            EventCategory::Music,
        );
        assert!(!is_published().matches(&draft));
        assert!(is_published().matches(&published_music("Live", "Austin", 10)));
    }

    #[test]
    fn search_hits_artist_and_ignores_missing_artist() {
        let with_artist = record(
            "Friday Show",
            Some("Miles Ahead Quartet"),
            "Austin",
            30,
            june(3),
            EventStatus::Published,
            EventCategory::Music,
        );
        let filter = EventFilter {
            q: Some("AHEAD".into()),
            ..Default::default()
        };
        assert!(filter.to_predicate().matches(&with_artist));
        assert!(!filter
            .to_predicate()
            .matches(&published_music("Friday Show", "Austin", 30)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filter = EventFilter {
            min_price: Some(Decimal::new(10, 0)),
            max_price: Some(Decimal::new(100, 0)),
            ..Default::default()
        };
        let predicate = filter.to_predicate();
        assert!(predicate.matches(&published_music("a", "Austin", 10)));
        assert!(predicate.matches(&published_music("b", "Austin", 100)));
        assert!(!predicate.matches(&published_music("c", "Austin", 9)));
        assert!(!predicate.matches(&published_music("d", "Austin", 101)));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = EventFilter {
            start_date: Some(june(10)),
            end_date: Some(june(10)),
            ..Default::default()
        };
        assert!(filter
            .to_predicate()
            .matches(&published_music("on the day", "Austin", 10)));

        let later = EventFilter {
            start_date: Some(june(11)),
            ..Default::default()
        };
        assert!(!later
            .to_predicate()
            .matches(&published_music("too early", "Austin", 10)));
    }

    #[test]
    fn music_in_austin_between_ten_and_hundred() {
        let filter = EventFilter {
            category: Some(EventCategory::Music),
            city: Some("austin".into()),
            min_price: Some(Decimal::new(10, 0)),
            max_price: Some(Decimal::new(100, 0)),
            ..Default::default()
        };
        let predicate = filter.to_predicate();

        assert!(predicate.matches(&published_music("a", "Austin", 50)));
        assert!(predicate.matches(&published_music("b", "North AUSTIN", 50)));
        assert!(!predicate.matches(&published_music("c", "Dallas", 50)));
        assert!(!predicate.matches(&record(
            "d",
            None,
            "Austin",
            50,
            june(10),
            EventStatus::Published,
            EventCategory::Sports,
        )));
        assert!(!predicate.matches(&record(
            "e",
            None,
            "Austin",
            50,
            june(10),
            EventStatus::Cancelled,
            EventCategory::Music,
        )));
    }

    #[test]
    fn combined_filters_equal_intersection_of_single_filters() {
        let records = vec![
            published_music("Jazz Night", "Austin", 20),
            published_music("Jazz Brunch", "Dallas", 20),
            published_music("Rock Night", "Austin", 200),
            published_music("Jazz Gala", "Austin", 500),
        ];
        let singles = [
            EventFilter {
                q: Some("jazz".into()),
                ..Default::default()
            },
            EventFilter {
                city: Some("austin".into()),
                ..Default::default()
            },
            EventFilter {
                max_price: Some(Decimal::new(250, 0)),
                ..Default::default()
            },
        ];
        let combined = EventFilter {
            q: Some("jazz".into()),
            city: Some("austin".into()),
            max_price: Some(Decimal::new(250, 0)),
            ..Default::default()
        };

        for record in &records {
            let intersection = singles.iter().all(|f| f.to_predicate().matches(record));
            assert_eq!(combined.to_predicate().matches(record), intersection);
        }
    }
}
