use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{Event, EventCategory, EventRequest, EventStatus, NewEvent, Page, PageRequest};
use crate::repository::{EventFilter, EventRepository, RegisterOutcome, UpdateOutcome};
use crate::utils::error::AppError;
use crate::utils::validation::ValidationErrors;

/// Registry operations over a single [`EventRepository`].
///
/// Timestamps are assigned here, not by the store: `created_at` once on
/// create, `updated_at` on every mutation.
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_events(&self, page: PageRequest) -> Result<Page<Event>, AppError> {
        debug!(page = page.page, size = page.size, "Listing events");
        self.find_page(EventFilter::All, page).await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event, AppError> {
        debug!(event_id = id, "Fetching event");
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::event_not_found(id))
    }

    pub async fn create_event(&self, request: EventRequest) -> Result<Event, AppError> {
        let now = Utc::now();
        let validated = request.validate(now)?;
        info!(title = %validated.fields.title, "Creating event");

        let event = self
            .repository
            .insert(NewEvent {
                fields: validated.fields,
                status: validated.status.unwrap_or_default(),
                current_registrations: 0,
                created_at: now,
            })
            .await?;

        info!(event_id = event.id, "Event created");
        Ok(event)
    }

    pub async fn update_event(&self, id: i64, request: EventRequest) -> Result<Event, AppError> {
        let now = Utc::now();
        let validated = request.validate(now)?;
        info!(event_id = id, "Updating event");

        match self
            .repository
            .update(id, validated.fields, validated.status, now)
            .await?
        {
            UpdateOutcome::Updated(event) => {
                info!(event_id = id, "Event updated");
                Ok(event)
            }
            UpdateOutcome::NotFound => Err(AppError::event_not_found(id)),
            UpdateOutcome::CapacityBelowRegistrations {
                current_registrations,
            } => Err(ValidationErrors::single(
                "maxCapacity",
                format!(
                    "cannot be lower than the {} registrations already taken",
                    current_registrations
                ),
            )
            .into()),
        }
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), AppError> {
        info!(event_id = id, "Deleting event");
        if !self.repository.delete(id).await? {
            return Err(AppError::event_not_found(id));
        }
        info!(event_id = id, "Event deleted");
        Ok(())
    }

    pub async fn events_by_category(
        &self,
        category: EventCategory,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        debug!(%category, "Listing events by category");
        self.find_page(EventFilter::Category(category), page).await
    }

    pub async fn events_by_status(
        &self,
        status: EventStatus,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        debug!(%status, "Listing events by status");
        self.find_page(EventFilter::Status(status), page).await
    }

    pub async fn events_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        if let Some(end) = end {
            if end < start {
                return Err(ValidationErrors::single("end", "must not be before start").into());
            }
        }
        debug!(%start, ?end, "Listing events by date range");
        self.find_page(EventFilter::DateRange { start, end }, page)
            .await
    }

    pub async fn events_by_tag(&self, tag: &str, page: PageRequest) -> Result<Page<Event>, AppError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ValidationErrors::single("tag", "is required").into());
        }
        debug!(tag, "Listing events by tag");
        self.find_page(EventFilter::Tag(tag.to_string()), page).await
    }

    pub async fn events_by_organizer(
        &self,
        organizer: &str,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        let organizer = organizer.trim();
        if organizer.is_empty() {
            return Err(ValidationErrors::single("organizer", "is required").into());
        }
        debug!(organizer, "Listing events by organizer");
        self.find_page(EventFilter::OrganizerContains(organizer.to_string()), page)
            .await
    }

    pub async fn upcoming_events(&self) -> Result<Vec<Event>, AppError> {
        debug!("Listing upcoming events");
        Ok(self.repository.find_upcoming(Utc::now()).await?)
    }

    pub async fn events_with_available_capacity(
        &self,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        debug!("Listing events with available capacity");
        self.find_page(EventFilter::AvailableCapacity, page).await
    }

    pub async fn register_participant(&self, id: i64) -> Result<Event, AppError> {
        info!(event_id = id, "Registering participant");

        match self.repository.register(id, Utc::now()).await? {
            RegisterOutcome::Registered(event) => {
                info!(
                    event_id = id,
                    registrations = event.current_registrations,
                    max_capacity = event.max_capacity,
                    "Participant registered"
                );
                Ok(event)
            }
            RegisterOutcome::NotFound => Err(AppError::event_not_found(id)),
            RegisterOutcome::NotUpcoming(status) => {
                warn!(event_id = id, %status, "Registration refused: event not upcoming");
                Err(AppError::InvalidState(format!(
                    "Only upcoming events accept registrations (event {} is {})",
                    id, status
                )))
            }
            RegisterOutcome::Full => {
                warn!(event_id = id, "Registration refused: event is full");
                Err(AppError::CapacityExceeded(format!(
                    "Event {} is full, no seats available",
                    id
                )))
            }
        }
    }

    async fn find_page(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, AppError> {
        Ok(self.repository.find_page(&filter, &page).await?)
    }
}
