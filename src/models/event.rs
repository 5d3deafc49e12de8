use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::capacity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventCategory {
    Academic,
    Cultural,
    Sports,
    Tech,
    Workshop,
    Seminar,
    Conference,
    Graduation,
    Career,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 10] = [
        EventCategory::Academic,
        EventCategory::Cultural,
        EventCategory::Sports,
        EventCategory::Tech,
        EventCategory::Workshop,
        EventCategory::Seminar,
        EventCategory::Conference,
        EventCategory::Graduation,
        EventCategory::Career,
        EventCategory::Other,
    ];

    /// Stored and serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Academic => "ACADEMIC",
            EventCategory::Cultural => "CULTURAL",
            EventCategory::Sports => "SPORTS",
            EventCategory::Tech => "TECH",
            EventCategory::Workshop => "WORKSHOP",
            EventCategory::Seminar => "SEMINAR",
            EventCategory::Conference => "CONFERENCE",
            EventCategory::Graduation => "GRADUATION",
            EventCategory::Career => "CAREER",
            EventCategory::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::Academic => "Académico",
            EventCategory::Cultural => "Cultural",
            EventCategory::Sports => "Desporto",
            EventCategory::Tech => "Tecnologia",
            EventCategory::Workshop => "Workshop",
            EventCategory::Seminar => "Seminário",
            EventCategory::Conference => "Conferência",
            EventCategory::Graduation => "Graduação",
            EventCategory::Career => "Carreira",
            EventCategory::Other => "Outro",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EventCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Upcoming,
        EventStatus::Ongoing,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "UPCOMING",
            EventStatus::Ongoing => "ONGOING",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Próximo",
            EventStatus::Ongoing => "Em Curso",
            EventStatus::Completed => "Concluído",
            EventStatus::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: trimmed.to_string(),
            })
    }
}

/// A persisted event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub category: EventCategory,
    pub max_capacity: i32,
    pub current_registrations: i32,
    pub status: EventStatus,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn available_capacity(&self) -> i32 {
        capacity::available_capacity(self.max_capacity, self.current_registrations)
    }

    pub fn is_full(&self) -> bool {
        capacity::is_full(self.max_capacity, self.current_registrations)
    }

    pub fn has_available_capacity(&self) -> bool {
        capacity::has_available_capacity(self.max_capacity, self.current_registrations)
    }

    pub fn occupancy_percentage(&self) -> f64 {
        capacity::occupancy_percentage(self.max_capacity, self.current_registrations)
    }
}

/// Validated client-writable fields, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub category: EventCategory,
    pub max_capacity: i32,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

/// Everything the store needs to insert a row. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub fields: EventFields,
    pub status: EventStatus,
    pub current_registrations: i32,
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    pub fn into_event(self, id: i64) -> Event {
        let NewEvent {
            fields,
            status,
            current_registrations,
            created_at,
        } = self;

        Event {
            id,
            title: fields.title,
            description: fields.description,
            event_date: fields.event_date,
            location: fields.location,
            organizer: fields.organizer,
            category: fields.category,
            max_capacity: fields.max_capacity,
            current_registrations,
            status,
            image_url: fields.image_url,
            tags: fields.tags,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_fields() -> EventFields {
        EventFields {
            title: "Semana da Engenharia".to_string(),
            description: "Talks and exhibitions from the engineering faculty".to_string(),
            event_date: Utc::now() + Duration::days(10),
            location: "Campus Principal".to_string(),
            organizer: "Faculdade de Engenharia".to_string(),
            category: EventCategory::Academic,
            max_capacity: 40,
            image_url: None,
            tags: vec!["engenharia".to_string()],
        }
    }

    #[test]
    fn test_category_parses_case_insensitively() {
        assert_eq!("tech".parse::<EventCategory>(), Ok(EventCategory::Tech));
        assert_eq!(" Career ".parse::<EventCategory>(), Ok(EventCategory::Career));
        let err = "party".parse::<EventCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category 'party'");
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for status in EventStatus::ALL {
            assert_eq!(status.as_str().parse::<EventStatus>(), Ok(status));
        }
        assert_eq!(EventStatus::default(), EventStatus::Upcoming);
    }

    #[test]
    fn test_enums_serialize_upper_case() {
        let json = serde_json::to_string(&EventCategory::Graduation).unwrap();
        assert_eq!(json, "\"GRADUATION\"");
        let status: EventStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, EventStatus::Cancelled);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(EventCategory::Sports.display_name(), "Desporto");
        assert_eq!(EventStatus::Ongoing.display_name(), "Em Curso");
    }

    #[test]
    fn test_new_event_into_event_stamps_both_timestamps() {
        let created_at = Utc::now();
        let event = NewEvent {
            fields: sample_fields(),
            status: EventStatus::Upcoming,
            current_registrations: 0,
            created_at,
        }
        .into_event(7);

        assert_eq!(event.id, 7);
        assert_eq!(event.created_at, created_at);
        assert_eq!(event.updated_at, created_at);
        assert_eq!(event.available_capacity(), 40);
        assert!(!event.is_full());
        assert!(event.has_available_capacity());
    }
}
