pub mod capacity;
pub mod event;
pub mod page;
pub mod projection;
pub mod request;

pub use capacity::RegistrationRefusal;
pub use event::{Event, EventCategory, EventFields, EventStatus, NewEvent, UnknownVariant};
pub use page::{Page, PageRequest, SortDirection, SortField};
pub use projection::{EventDetail, EventSummary};
pub use request::{EventRequest, ValidatedEvent};
