//! In-memory implementation of [`EventRepository`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{EventFilter, EventRepository, RegisterOutcome, StoreError, UpdateOutcome};
use crate::models::capacity::{check_registration, RegistrationRefusal};
use crate::models::{
    Event, EventFields, EventStatus, NewEvent, Page, PageRequest, SortDirection, SortField,
};

#[derive(Default)]
struct State {
    next_id: i64,
    events: BTreeMap<i64, Event>,
}

/// Keeps every event behind one lock, so each operation is atomic the same
/// way a single SQL statement is.
///
/// ```
/// use uem_events_server::repository::InMemoryEventRepository;
///
/// let repository = InMemoryEventRepository::new();
/// assert_eq!(repository.len(), 0);
/// ```
#[derive(Default)]
pub struct InMemoryEventRepository {
    state: RwLock<State>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compare(a: &Event, b: &Event, sort: SortField) -> Ordering {
    match sort {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::EventDate => a.event_date.cmp(&b.event_date),
        SortField::Location => a.location.cmp(&b.location),
        SortField::Organizer => a.organizer.cmp(&b.organizer),
        SortField::Category => a.category.as_str().cmp(b.category.as_str()),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::MaxCapacity => a.max_capacity.cmp(&b.max_capacity),
        SortField::CurrentRegistrations => a.current_registrations.cmp(&b.current_registrations),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut state = self.state.write();
        state.next_id += 1;
        let event = event.into_event(state.next_id);
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn insert_all(&self, events: Vec<NewEvent>) -> Result<usize, StoreError> {
        let mut state = self.state.write();
        let inserted = events.len();
        for event in events {
            state.next_id += 1;
            let event = event.into_event(state.next_id);
            state.events.insert(event.id, event);
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.state.read().events.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        fields: EventFields,
        status: Option<EventStatus>,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut state = self.state.write();
        let Some(event) = state.events.get_mut(&id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if fields.max_capacity < event.current_registrations {
            return Ok(UpdateOutcome::CapacityBelowRegistrations {
                current_registrations: event.current_registrations,
            });
        }

        event.title = fields.title;
        event.description = fields.description;
        event.event_date = fields.event_date;
        event.location = fields.location;
        event.organizer = fields.organizer;
        event.category = fields.category;
        event.max_capacity = fields.max_capacity;
        event.image_url = fields.image_url;
        event.tags = fields.tags;
        if let Some(status) = status {
            event.status = status;
        }
        event.updated_at = now;

        Ok(UpdateOutcome::Updated(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().events.remove(&id).is_some())
    }

    async fn find_page(
        &self,
        filter: &EventFilter,
        page: &PageRequest,
    ) -> Result<Page<Event>, StoreError> {
        let state = self.state.read();
        let mut matching: Vec<&Event> = state
            .events
            .values()
            .filter(|event| filter.matches(event))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare(a, b, page.sort);
            let ordering = match page.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn find_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let state = self.state.read();
        let mut upcoming: Vec<Event> = state
            .events
            .values()
            .filter(|event| event.status == EventStatus::Upcoming && event.event_date >= now)
            .cloned()
            .collect();
        upcoming.sort_by(|a, b| a.event_date.cmp(&b.event_date).then(a.id.cmp(&b.id)));
        Ok(upcoming)
    }

    async fn register(&self, id: i64, now: DateTime<Utc>) -> Result<RegisterOutcome, StoreError> {
        let mut state = self.state.write();
        let Some(event) = state.events.get_mut(&id) else {
            return Ok(RegisterOutcome::NotFound);
        };

        match check_registration(event.status, event.max_capacity, event.current_registrations) {
            Ok(()) => {
                event.current_registrations += 1;
                event.updated_at = now;
                Ok(RegisterOutcome::Registered(event.clone()))
            }
            Err(RegistrationRefusal::NotUpcoming(status)) => Ok(RegisterOutcome::NotUpcoming(status)),
            Err(RegistrationRefusal::Full) => Ok(RegisterOutcome::Full),
        }
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.len() as i64)
    }
}
