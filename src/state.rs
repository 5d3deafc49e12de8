use std::sync::Arc;

use crate::repository::EventRepository;
use crate::services::EventService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self {
            events: Arc::new(EventService::new(repository)),
        }
    }
}
