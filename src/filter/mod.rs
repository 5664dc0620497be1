//! Event search predicates.
//!
//! Every optional search input becomes a [`Criterion`]: either an active
//! [`Predicate`] or `Absent`. [`EventFilter::to_predicate`] folds the active
//! criteria under the mandatory published-only condition. The tree is
//! storage-neutral; [`sql`] renders it for PostgreSQL and [`eval`] matches it
//! against records held in memory.

pub mod eval;
pub mod sql;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{EventCategory, EventStatus};

/// Event attributes a predicate may test. `VenueCity` follows the
/// event → venue relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    Name,
    ArtistName,
    Category,
    VenueCity,
    EventDateTime,
    Price,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Status(EventStatus),
    Category(EventCategory),
    DateTime(DateTime<Utc>),
    Decimal(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Field, Value),
    Gte(Field, Value),
    Lte(Field, Value),
    /// Case-insensitive substring match. The needle is stored lower-cased.
    Contains(Field, String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// One search criterion: a condition to apply, or nothing to restrict.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Active(Predicate),
    Absent,
}

impl Criterion {
    fn when<T>(input: Option<T>, build: impl FnOnce(T) -> Predicate) -> Self {
        input.map_or(Criterion::Absent, |value| Criterion::Active(build(value)))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Criterion::Active(_))
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|value| !value.trim().is_empty())
}

fn contains(field: Field, needle: &str) -> Predicate {
    Predicate::Contains(field, needle.to_lowercase())
}

pub fn is_published() -> Predicate {
    Predicate::Eq(Field::Status, Value::Status(EventStatus::Published))
}

pub fn name_or_artist_contains(query: Option<&str>) -> Criterion {
    Criterion::when(non_blank(query), |q| {
        Predicate::Or(vec![
            contains(Field::Name, q),
            contains(Field::ArtistName, q),
        ])
    })
}

pub fn has_category(category: Option<EventCategory>) -> Criterion {
    Criterion::when(category, |c| Predicate::Eq(Field::Category, Value::Category(c)))
}

pub fn venue_city_contains(city: Option<&str>) -> Criterion {
    Criterion::when(non_blank(city), |c| contains(Field::VenueCity, c))
}

pub fn starts_on_or_after(start: Option<DateTime<Utc>>) -> Criterion {
    Criterion::when(start, |t| Predicate::Gte(Field::EventDateTime, Value::DateTime(t)))
}

pub fn starts_on_or_before(end: Option<DateTime<Utc>>) -> Criterion {
    Criterion::when(end, |t| Predicate::Lte(Field::EventDateTime, Value::DateTime(t)))
}

pub fn price_at_least(min: Option<Decimal>) -> Criterion {
    Criterion::when(min, |p| Predicate::Gte(Field::Price, Value::Decimal(p)))
}

pub fn price_at_most(max: Option<Decimal>) -> Criterion {
    Criterion::when(max, |p| Predicate::Lte(Field::Price, Value::Decimal(p)))
}

/// The seven independently optional inputs of the public event search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub q: Option<String>,
    pub category: Option<EventCategory>,
    pub city: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl EventFilter {
    /// Criteria in conjunction order.
    pub fn criteria(&self) -> [Criterion; 7] {
        [
            name_or_artist_contains(self.q.as_deref()),
            has_category(self.category),
            venue_city_contains(self.city.as_deref()),
            starts_on_or_after(self.start_date),
            starts_on_or_before(self.end_date),
            price_at_least(self.min_price),
            price_at_most(self.max_price),
        ]
    }

    pub fn is_unrestricted(&self) -> bool {
        !self.criteria().iter().any(Criterion::is_active)
    }

    /// `PUBLISHED AND c1 AND ... AND cn` over the active criteria.
    pub fn to_predicate(&self) -> Predicate {
        let clauses = self
            .criteria()
            .into_iter()
            .fold(vec![is_published()], |mut clauses, criterion| {
                if let Criterion::Active(predicate) = criterion {
                    clauses.push(predicate);
                }
                clauses
            });
        Predicate::And(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_filter_is_published_only() {
        let filter = EventFilter::default();
        assert!(filter.is_unrestricted());
        assert_eq!(filter.to_predicate(), Predicate::And(vec![is_published()]));
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(name_or_artist_contains(Some("")), Criterion::Absent);
        assert_eq!(name_or_artist_contains(Some("  \t")), Criterion::Absent);
        assert_eq!(venue_city_contains(Some("   ")), Criterion::Absent);
        assert_eq!(venue_city_contains(None), Criterion::Absent);

        let blank = EventFilter {
            q: Some(" ".into()),
            city: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.to_predicate(), EventFilter::default().to_predicate());
    }

    #[test]
    fn search_matches_name_or_artist_lower_cased() {
        assert_eq!(
            name_or_artist_contains(Some("Jazz")),
            Criterion::Active(Predicate::Or(vec![
                Predicate::Contains(Field::Name, "jazz".into()),
                Predicate::Contains(Field::ArtistName, "jazz".into()),
            ]))
        );
    }

    #[test]
    fn surrounding_whitespace_is_kept_in_the_needle() {
        assert_eq!(
            venue_city_contains(Some(" Austin")),
            Criterion::Active(Predicate::Contains(Field::VenueCity, " austin".into()))
        );
    }

    #[test]
    fn conjunction_order_is_fixed() {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 12, 31, 23, 59, 59).unwrap();
        let filter = EventFilter {
            q: Some("fest".into()),
            category: Some(EventCategory::Music),
            city: Some("Austin".into()),
            start_date: Some(start),
            end_date: Some(end),
            min_price: Some(Decimal::new(10, 0)),
            max_price: Some(Decimal::new(100, 0)),
        };
        assert!(!filter.is_unrestricted());

        let Predicate::And(clauses) = filter.to_predicate() else {
            panic!("expected a conjunction");
        };
        assert_eq!(
            clauses,
            vec![
                is_published(),
                Predicate::Or(vec![
                    Predicate::Contains(Field::Name, "fest".into()),
                    Predicate::Contains(Field::ArtistName, "fest".into()),
                ]),
                Predicate::Eq(Field::Category, Value::Category(EventCategory::Music)),
                Predicate::Contains(Field::VenueCity, "austin".into()),
                Predicate::Gte(Field::EventDateTime, Value::DateTime(start)),
                Predicate::Lte(Field::EventDateTime, Value::DateTime(end)),
                Predicate::Gte(Field::Price, Value::Decimal(Decimal::new(10, 0))),
                Predicate::Lte(Field::Price, Value::Decimal(Decimal::new(100, 0))),
            ]
        );
    }

    #[test]
    fn absent_criteria_are_skipped() {
        let filter = EventFilter {
            max_price: Some(Decimal::new(50, 0)),
            ..Default::default()
        };
        assert_eq!(
            filter.to_predicate(),
            Predicate::And(vec![
                is_published(),
                Predicate::Lte(Field::Price, Value::Decimal(Decimal::new(50, 0))),
            ])
        );
    }
}
