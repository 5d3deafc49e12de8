use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::models::{
    EventCategory, EventDetail, EventRequest, EventStatus, EventSummary, PageRequest,
};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::utils::validation::ValidationErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// Filtered lists are always sorted by event date.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

fn invalid(field: &str, message: String) -> AppError {
    ValidationErrors::single(field, message).into()
}

fn event_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| invalid("id", rejection.body_text()))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| invalid("query", rejection.body_text()))
}

fn body(payload: Result<Json<EventRequest>, JsonRejection>) -> Result<EventRequest, AppError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| invalid("body", rejection.body_text()))
}

fn date_sorted(page: Option<u32>, size: Option<u32>) -> Result<PageRequest, AppError> {
    Ok(PageRequest::new(page, size, None, None)?)
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query(params)?;
    let page = PageRequest::new(
        params.page,
        params.size,
        params.sort_by.as_deref(),
        params.sort_direction.as_deref(),
    )?;
    info!(page = page.page, size = page.size, "GET /api/events");

    let events = state.events.list_events(page).await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let id = event_id(path)?;
    info!("GET /api/events/{}", id);

    let event = state.events.get_event(id).await?;
    Ok(success(EventDetail::from(event), "Event retrieved"))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = body(payload)?;
    info!(title = ?request.title, "POST /api/events");

    let event = state.events.create_event(request).await?;
    Ok(created(EventDetail::from(event), "Event created"))
}

/// PUT /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = event_id(path)?;
    let request = body(payload)?;
    info!("PUT /api/events/{}", id);

    let event = state.events.update_event(id, request).await?;
    Ok(success(EventDetail::from(event), "Event updated"))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let id = event_id(path)?;
    info!("DELETE /api/events/{}", id);

    state.events.delete_event(id).await?;
    Ok(empty_success("Event deleted"))
}

/// GET /api/events/category/{category}
pub async fn events_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let category: EventCategory = category
        .parse()
        .map_err(|e: crate::models::UnknownVariant| invalid("category", e.to_string()))?;
    let params = query(params)?;
    info!("GET /api/events/category/{}", category);

    let events = state
        .events
        .events_by_category(category, date_sorted(params.page, params.size)?)
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/status/{status}
pub async fn events_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let status: EventStatus = status
        .parse()
        .map_err(|e: crate::models::UnknownVariant| invalid("status", e.to_string()))?;
    let params = query(params)?;
    info!("GET /api/events/status/{}", status);

    let events = state
        .events
        .events_by_status(status, date_sorted(params.page, params.size)?)
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/date-range?start=..&end=..
pub async fn events_by_date_range(
    State(state): State<AppState>,
    params: Result<Query<DateRangeParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query(params)?;
    info!(start = %params.start, end = ?params.end, "GET /api/events/date-range");

    let events = state
        .events
        .events_by_date_range(
            params.start,
            params.end,
            date_sorted(params.page, params.size)?,
        )
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/tag/{tag}
pub async fn events_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query(params)?;
    info!("GET /api/events/tag/{}", tag);

    let events = state
        .events
        .events_by_tag(&tag, date_sorted(params.page, params.size)?)
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/organizer/{organizer}
pub async fn events_by_organizer(
    State(state): State<AppState>,
    Path(organizer): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query(params)?;
    info!("GET /api/events/organizer/{}", organizer);

    let events = state
        .events
        .events_by_organizer(&organizer, date_sorted(params.page, params.size)?)
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// GET /api/events/upcoming
pub async fn upcoming_events(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("GET /api/events/upcoming");

    let events: Vec<EventSummary> = state
        .events
        .upcoming_events()
        .await?
        .into_iter()
        .map(EventSummary::from)
        .collect();
    Ok(success(events, "Upcoming events retrieved"))
}

/// GET /api/events/available
pub async fn available_events(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query(params)?;
    info!("GET /api/events/available");

    let events = state
        .events
        .events_with_available_capacity(date_sorted(params.page, params.size)?)
        .await?;
    Ok(success(events.map(EventSummary::from), "Events retrieved"))
}

/// POST /api/events/{id}/register
pub async fn register_participant(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let id = event_id(path)?;
    info!("POST /api/events/{}/register", id);

    let event = state.events.register_participant(id).await?;
    Ok(success(EventDetail::from(event), "Participant registered"))
}
