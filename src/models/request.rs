use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::event::{EventCategory, EventFields, EventStatus};
use crate::utils::validation::{check_length, required_text, ValidationErrors};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 2000;
pub const LOCATION_MAX: usize = 200;
pub const ORGANIZER_MAX: usize = 150;
pub const IMAGE_URL_MAX: usize = 500;
pub const TAG_MAX: usize = 50;

/// Body of both `POST /api/events` and `PUT /api/events/{id}`.
///
/// Required fields are optional here so that a missing field is reported
/// alongside every other problem instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub category: Option<EventCategory>,
    pub max_capacity: Option<i32>,
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<EventStatus>,
}

/// Output of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub fields: EventFields,
    pub status: Option<EventStatus>,
}

impl EventRequest {
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedEvent, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required_text(&mut errors, "title", self.title);
        if let Some(title) = &title {
            check_length(&mut errors, "title", title, TITLE_MIN, TITLE_MAX);
        }

        let description = required_text(&mut errors, "description", self.description);
        if let Some(description) = &description {
            check_length(
                &mut errors,
                "description",
                description,
                DESCRIPTION_MIN,
                DESCRIPTION_MAX,
            );
        }

        let location = required_text(&mut errors, "location", self.location);
        if let Some(location) = &location {
            check_length(&mut errors, "location", location, 0, LOCATION_MAX);
        }

        let organizer = required_text(&mut errors, "organizer", self.organizer);
        if let Some(organizer) = &organizer {
            check_length(&mut errors, "organizer", organizer, 0, ORGANIZER_MAX);
        }

        match self.event_date {
            Some(date) if date <= now => errors.add("eventDate", "must be in the future"),
            Some(_) => {}
            None => errors.add("eventDate", "is required"),
        }

        if self.category.is_none() {
            errors.add("category", "is required");
        }

        match self.max_capacity {
            Some(capacity) if capacity < 1 => errors.add("maxCapacity", "must be at least 1"),
            Some(_) => {}
            None => errors.add("maxCapacity", "is required"),
        }

        let image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &image_url {
            check_length(&mut errors, "imageUrl", url, 0, IMAGE_URL_MAX);
        }

        let tags: Vec<String> = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .collect();
        for tag in &tags {
            if tag.is_empty() {
                errors.add("tags", "must not contain blank tags");
            } else if tag.chars().count() > TAG_MAX {
                errors.add("tags", format!("each tag must be at most {} characters", TAG_MAX));
            }
        }

        match (
            title,
            description,
            self.event_date,
            location,
            organizer,
            self.category,
            self.max_capacity,
        ) {
            (
                Some(title),
                Some(description),
                Some(event_date),
                Some(location),
                Some(organizer),
                Some(category),
                Some(max_capacity),
            ) if errors.is_empty() => Ok(ValidatedEvent {
                fields: EventFields {
                    title,
                    description,
                    event_date,
                    location,
                    organizer,
                    category,
                    max_capacity,
                    image_url,
                    tags,
                },
                status: self.status,
            }),
            _ => Err(errors),
        }
    }
}
