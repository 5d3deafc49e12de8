// Postgres implementation of EventRepository.
// Registration and the capacity guard on update are single conditional
// UPDATE statements; the affected row tells success from refusal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres, QueryBuilder};

use super::{EventFilter, EventRepository, RegisterOutcome, StoreError, UpdateOutcome};
use crate::models::capacity::{check_registration, RegistrationRefusal};
use crate::models::{Event, EventFields, EventStatus, NewEvent, Page, PageRequest};

const EVENT_COLUMNS: &str = "id, title, description, event_date, location, organizer, category, \
     max_capacity, current_registrations, status, image_url, tags, created_at, updated_at";

/// A refusal read back after a failed conditional update can race with a
/// concurrent status or capacity change; retry a few times before giving up.
const REGISTER_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: String,
    event_date: DateTime<Utc>,
    location: String,
    organizer: String,
    category: String,
    max_capacity: i32,
    current_registrations: i32,
    status: String,
    image_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("event {}: {}", row.id, e)))?;
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("event {}: {}", row.id, e)))?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            location: row.location,
            organizer: row.organizer,
            category,
            max_capacity: row.max_capacity,
            current_registrations: row.current_registrations,
            status,
            image_url: row.image_url,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, StoreError> {
    rows.into_iter().map(Event::try_from).collect()
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    match filter {
        EventFilter::All => {}
        EventFilter::Category(category) => {
            builder.push(" WHERE category = ").push_bind(category.as_str());
        }
        EventFilter::Status(status) => {
            builder.push(" WHERE status = ").push_bind(status.as_str());
        }
        EventFilter::DateRange { start, end } => {
            builder.push(" WHERE event_date >= ").push_bind(*start);
            if let Some(end) = end {
                builder.push(" AND event_date <= ").push_bind(*end);
            }
        }
        EventFilter::Tag(tag) => {
            builder.push(" WHERE ").push_bind(tag.clone()).push(" = ANY(tags)");
        }
        EventFilter::OrganizerContains(text) => {
            // POSITION avoids escaping LIKE wildcards in user input.
            builder
                .push(" WHERE POSITION(LOWER(")
                .push_bind(text.clone())
                .push(") IN LOWER(organizer)) > 0");
        }
        EventFilter::AvailableCapacity => {
            builder
                .push(" WHERE status = ")
                .push_bind(EventStatus::Upcoming.as_str())
                .push(" AND current_registrations < max_capacity");
        }
    }
}

/// Explains why the conditional update matched no row. `None` means the
/// re-read event is registrable again and the update should be retried.
fn refusal(event: Option<&Event>) -> Option<RegisterOutcome> {
    let Some(event) = event else {
        return Some(RegisterOutcome::NotFound);
    };

    match check_registration(event.status, event.max_capacity, event.current_registrations) {
        Ok(()) => None,
        Err(RegistrationRefusal::NotUpcoming(status)) => Some(RegisterOutcome::NotUpcoming(status)),
        Err(RegistrationRefusal::Full) => Some(RegisterOutcome::Full),
    }
}

async fn insert_event<'e, E>(executor: E, event: NewEvent) -> Result<Event, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    let NewEvent {
        fields,
        status,
        current_registrations,
        created_at,
    } = event;

    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        INSERT INTO events (title, description, event_date, location, organizer, category,
                            max_capacity, current_registrations, status, image_url, tags,
                            created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.event_date)
    .bind(&fields.location)
    .bind(&fields.organizer)
    .bind(fields.category.as_str())
    .bind(fields.max_capacity)
    .bind(current_registrations)
    .bind(status.as_str())
    .bind(&fields.image_url)
    .bind(&fields.tags)
    .bind(created_at)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        insert_event(&self.pool, event).await
    }

    async fn insert_all(&self, events: Vec<NewEvent>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted = events.len();
        for event in events {
            insert_event(&mut *tx, event).await?;
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    async fn update(
        &self,
        id: i64,
        fields: EventFields,
        status: Option<EventStatus>,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                title = $2,
                description = $3,
                event_date = $4,
                location = $5,
                organizer = $6,
                category = $7,
                max_capacity = $8,
                image_url = $9,
                tags = $10,
                status = COALESCE($11, status),
                updated_at = $12
            WHERE id = $1 AND current_registrations <= $8
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.event_date)
        .bind(&fields.location)
        .bind(&fields.organizer)
        .bind(fields.category.as_str())
        .bind(fields.max_capacity)
        .bind(&fields.image_url)
        .bind(&fields.tags)
        .bind(status.map(|s| s.as_str()))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(UpdateOutcome::Updated(row.try_into()?));
        }

        // Registrations only ever grow, so a row that failed the guard
        // still fails it now.
        match self.find_by_id(id).await? {
            None => Ok(UpdateOutcome::NotFound),
            Some(event) => Ok(UpdateOutcome::CapacityBelowRegistrations {
                current_registrations: event.current_registrations,
            }),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_page(
        &self,
        filter: &EventFilter,
        page: &PageRequest,
    ) -> Result<Page<Event>, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
        push_filter(&mut select, filter);
        // Column and keyword come from closed enums, never from the request.
        select
            .push(format!(
                " ORDER BY {} {}, id ASC",
                page.sort.column(),
                page.direction.keyword()
            ))
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<EventRow> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page::new(
            into_events(rows)?,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn find_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE status = $1 AND event_date >= $2
            ORDER BY event_date ASC, id ASC
            "#
        ))
        .bind(EventStatus::Upcoming.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn register(&self, id: i64, now: DateTime<Utc>) -> Result<RegisterOutcome, StoreError> {
        for _ in 0..REGISTER_ATTEMPTS {
            let row = sqlx::query_as::<_, EventRow>(&format!(
                r#"
                UPDATE events
                SET current_registrations = current_registrations + 1,
                    updated_at = $2
                WHERE id = $1
                  AND status = $3
                  AND current_registrations < max_capacity
                RETURNING {EVENT_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(now)
            .bind(EventStatus::Upcoming.as_str())
            .fetch_optional(&self.pool)
            .await?;

            if let Some(row) = row {
                return Ok(RegisterOutcome::Registered(row.try_into()?));
            }

            match refusal(self.find_by_id(id).await?.as_ref()) {
                Some(outcome) => return Ok(outcome),
                None => {
                    tracing::debug!(event_id = id, "Event changed under registration, retrying");
                }
            }
        }

        tracing::warn!(
            event_id = id,
            attempts = REGISTER_ATTEMPTS,
            "Registration kept losing to concurrent changes, reporting the event as full"
        );
        Ok(RegisterOutcome::Full)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;

    fn row(category: &str, status: &str) -> EventRow {
        let now = Utc::now();
        EventRow {
            id: 11,
            title: "Conferência de Tecnologia".to_string(),
            description: "Trends in AI and cloud computing".to_string(),
            event_date: now,
            location: "Auditório Principal".to_string(),
            organizer: "Faculdade de Engenharia".to_string(),
            category: category.to_string(),
            max_capacity: 150,
            current_registrations: 45,
            status: status.to_string(),
            image_url: None,
            tags: vec!["IA".to_string(), "Cloud".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_maps_to_event() {
        let event = Event::try_from(row("TECH", "UPCOMING")).unwrap();
        assert_eq!(event.category, EventCategory::Tech);
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.tags, vec!["IA", "Cloud"]);
    }

    #[test]
    fn test_unknown_enum_text_is_corrupt() {
        let err = Event::try_from(row("PARTY", "UPCOMING")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(msg) if msg.contains("event 11")));
    }

    #[test]
    fn test_refusal_diagnosis() {
        assert_eq!(refusal(None), Some(RegisterOutcome::NotFound));

        let mut event = Event::try_from(row("TECH", "CANCELLED")).unwrap();
        assert_eq!(
            refusal(Some(&event)),
            Some(RegisterOutcome::NotUpcoming(EventStatus::Cancelled))
        );

        event.status = EventStatus::Upcoming;
        event.current_registrations = event.max_capacity;
        assert_eq!(refusal(Some(&event)), Some(RegisterOutcome::Full));

        // A seat freed up between the update and the re-read.
        event.current_registrations -= 1;
        assert_eq!(refusal(Some(&event)), None);
    }

    #[test]
    fn test_filter_sql() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, &EventFilter::Tag("IA".to_string()));
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM events WHERE $1 = ANY(tags)");

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, &EventFilter::AvailableCapacity);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM events WHERE status = $1 AND current_registrations < max_capacity"
        );
    }
}
