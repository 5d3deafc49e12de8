//! Data access for event records.
//!
//! - [`EventRepository`]: the storage seam used by the service layer
//! - [`PgEventRepository`]: Postgres via sqlx
//! - [`InMemoryEventRepository`]: same semantics, kept in process memory

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Event, EventCategory, EventFields, EventStatus, NewEvent, Page, PageRequest};

mod memory;
mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer maps onto the domain model.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Filters behind the list endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    All,
    Category(EventCategory),
    Status(EventStatus),
    /// Inclusive on both ends; no `end` means "from `start` on".
    DateRange {
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    },
    Tag(String),
    /// Case-insensitive substring match on the organizer.
    OrganizerContains(String),
    /// Upcoming events that still have seats.
    AvailableCapacity,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Category(category) => event.category == *category,
            EventFilter::Status(status) => event.status == *status,
            EventFilter::DateRange { start, end } => {
                event.event_date >= *start && end.map_or(true, |end| event.event_date <= end)
            }
            EventFilter::Tag(tag) => event.tags.iter().any(|t| t == tag),
            EventFilter::OrganizerContains(text) => event
                .organizer
                .to_lowercase()
                .contains(&text.to_lowercase()),
            EventFilter::AvailableCapacity => {
                event.status == EventStatus::Upcoming
                    && event.current_registrations < event.max_capacity
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Event),
    NotFound,
    /// The new capacity would sit below the seats already taken.
    CapacityBelowRegistrations { current_registrations: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Registered(Event),
    NotFound,
    NotUpcoming(EventStatus),
    Full,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    /// Inserts every event or none of them.
    async fn insert_all(&self, events: Vec<NewEvent>) -> Result<usize, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StoreError>;

    /// Overwrites the client-writable fields. `status: None` keeps the stored
    /// status. `current_registrations` is never touched.
    async fn update(
        &self,
        id: i64,
        fields: EventFields,
        status: Option<EventStatus>,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Returns false when no row had this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn find_page(
        &self,
        filter: &EventFilter,
        page: &PageRequest,
    ) -> Result<Page<Event>, StoreError>;

    /// Upcoming events dated at or after `now`, soonest first.
    async fn find_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError>;

    /// Takes one seat if the event is upcoming and not full. The check and
    /// the increment are a single atomic step against the store.
    async fn register(&self, id: i64, now: DateTime<Utc>) -> Result<RegisterOutcome, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(organizer: &str, tags: &[&str], date: DateTime<Utc>) -> Event {
        Event {
            id: 1,
            title: "Torneio Inter-Faculdades".to_string(),
            description: "Football tournament between faculties".to_string(),
            event_date: date,
            location: "Estádio Universitário".to_string(),
            organizer: organizer.to_string(),
            category: EventCategory::Sports,
            max_capacity: 2,
            current_registrations: 1,
            status: EventStatus::Upcoming,
            image_url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_organizer_filter_is_case_insensitive_substring() {
        let e = event("Faculdade de Engenharia - UEM", &[], Utc::now());
        assert!(EventFilter::OrganizerContains("engenharia".into()).matches(&e));
        assert!(EventFilter::OrganizerContains("UEM".into()).matches(&e));
        assert!(!EventFilter::OrganizerContains("Medicina".into()).matches(&e));
    }

    #[test]
    fn test_tag_filter_is_exact() {
        let e = event("Reitoria", &["Desporto", "Futebol"], Utc::now());
        assert!(EventFilter::Tag("Futebol".into()).matches(&e));
        assert!(!EventFilter::Tag("futebol".into()).matches(&e));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let start = Utc::now();
        let end = start + Duration::days(2);
        let filter = EventFilter::DateRange {
            start,
            end: Some(end),
        };
        assert!(filter.matches(&event("x", &[], start)));
        assert!(filter.matches(&event("x", &[], end)));
        assert!(!filter.matches(&event("x", &[], end + Duration::seconds(1))));

        let open = EventFilter::DateRange { start, end: None };
        assert!(open.matches(&event("x", &[], start + Duration::days(365))));
    }

    #[test]
    fn test_available_capacity_filter() {
        let mut e = event("x", &[], Utc::now());
        assert!(EventFilter::AvailableCapacity.matches(&e));
        e.current_registrations = 2;
        assert!(!EventFilter::AvailableCapacity.matches(&e));
        e.current_registrations = 0;
        e.status = EventStatus::Cancelled;
        assert!(!EventFilter::AvailableCapacity.matches(&e));
    }
}
