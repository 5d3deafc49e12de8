use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, Config, SecurityHeaders};
use crate::handlers::{events, health_check};
use crate::state::AppState;

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/upcoming", get(events::upcoming_events))
        .route("/api/events/available", get(events::available_events))
        .route("/api/events/date-range", get(events::events_by_date_range))
        .route(
            "/api/events/category/:category",
            get(events::events_by_category),
        )
        .route("/api/events/status/:status", get(events::events_by_status))
        .route("/api/events/tag/:tag", get(events::events_by_tag))
        .route(
            "/api/events/organizer/:organizer",
            get(events::events_by_organizer),
        )
        .route(
            "/api/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/events/:id/register",
            post(events::register_participant),
        )
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(event_routes())
        .with_state(state);

    SecurityHeaders::new(config.production)
        .apply(router)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&config.allowed_origins))
}
