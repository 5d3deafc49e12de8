use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::event::{Event, EventCategory, EventStatus};

/// List-view shape of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub category: EventCategory,
    pub category_display_name: &'static str,
    pub status: EventStatus,
    pub status_display_name: &'static str,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub available_capacity: i32,
    pub is_full: bool,
}

/// Detail-view shape of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub category: EventCategory,
    pub category_display_name: &'static str,
    pub status: EventStatus,
    pub status_display_name: &'static str,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    pub available_capacity: i32,
    pub occupancy_percentage: f64,
    pub is_full: bool,
    pub has_available_capacity: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventSummary {
    fn from(event: Event) -> Self {
        let available_capacity = event.available_capacity();
        let is_full = event.is_full();

        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            organizer: event.organizer,
            category: event.category,
            category_display_name: event.category.display_name(),
            status: event.status,
            status_display_name: event.status.display_name(),
            image_url: event.image_url,
            tags: event.tags,
            available_capacity,
            is_full,
        }
    }
}

impl From<Event> for EventDetail {
    fn from(event: Event) -> Self {
        let available_capacity = event.available_capacity();
        let occupancy_percentage = event.occupancy_percentage();
        let is_full = event.is_full();
        let has_available_capacity = event.has_available_capacity();

        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            organizer: event.organizer,
            category: event.category,
            category_display_name: event.category.display_name(),
            status: event.status,
            status_display_name: event.status.display_name(),
            image_url: event.image_url,
            tags: event.tags,
            max_capacity: event.max_capacity,
            current_registrations: event.current_registrations,
            available_capacity,
            occupancy_percentage,
            is_full,
            has_available_capacity,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(max_capacity: i32, current_registrations: i32) -> Event {
        let now = Utc::now();
        Event {
            id: 3,
            title: "Festival Cultural".to_string(),
            description: "Music and dance from every province".to_string(),
            event_date: now + Duration::days(12),
            location: "Praça da UEM".to_string(),
            organizer: "Associação de Estudantes".to_string(),
            category: EventCategory::Cultural,
            max_capacity,
            current_registrations,
            status: EventStatus::Upcoming,
            image_url: Some("https://example.org/festival.jpg".to_string()),
            tags: vec!["Cultura".to_string(), "Música".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_detail_carries_derived_fields() {
        let detail = EventDetail::from(event(300, 150));
        assert_eq!(detail.available_capacity, 150);
        assert_eq!(detail.occupancy_percentage, 50.0);
        assert!(!detail.is_full);
        assert!(detail.has_available_capacity);
        assert_eq!(detail.category_display_name, "Cultural");
        assert_eq!(detail.status_display_name, "Próximo");
    }

    #[test]
    fn test_summary_json_shape() {
        let json = serde_json::to_value(EventSummary::from(event(10, 10))).unwrap();
        assert_eq!(json["isFull"], true);
        assert_eq!(json["availableCapacity"], 0);
        assert_eq!(json["category"], "CULTURAL");
        assert_eq!(json["tags"][1], "Música");
        assert!(json.get("maxCapacity").is_none());
        assert!(json.get("currentRegistrations").is_none());
    }
}
