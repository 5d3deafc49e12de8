//! Capacity arithmetic over an event's counters.
//!
//! These are plain functions so both stores and the HTTP projections agree
//! on what "full" means without touching storage.

use crate::models::event::EventStatus;

/// Why a registration cannot be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRefusal {
    NotUpcoming(EventStatus),
    Full,
}

pub fn available_capacity(max_capacity: i32, current_registrations: i32) -> i32 {
    max_capacity - current_registrations
}

pub fn is_full(max_capacity: i32, current_registrations: i32) -> bool {
    current_registrations >= max_capacity
}

pub fn has_available_capacity(max_capacity: i32, current_registrations: i32) -> bool {
    available_capacity(max_capacity, current_registrations) > 0
}

/// Returns 0.0 for a zero capacity instead of dividing by it.
pub fn occupancy_percentage(max_capacity: i32, current_registrations: i32) -> f64 {
    if max_capacity == 0 {
        return 0.0;
    }
    f64::from(current_registrations) / f64::from(max_capacity) * 100.0
}

/// Status is checked before capacity: a cancelled event with free seats is
/// refused as `NotUpcoming`, not `Full`.
pub fn check_registration(
    status: EventStatus,
    max_capacity: i32,
    current_registrations: i32,
) -> Result<(), RegistrationRefusal> {
    if status != EventStatus::Upcoming {
        return Err(RegistrationRefusal::NotUpcoming(status));
    }
    if is_full(max_capacity, current_registrations) {
        return Err(RegistrationRefusal::Full);
    }
    Ok(())
}
