//! Pure booking rules: slot normalization and past-date rejection.
//!
//! Everything here takes the clock as an argument so the rules stay
//! deterministic under test.

use chrono::{DateTime, Timelike, Utc};

use crate::errors::{AgendaError, AgendaResult};

/// Truncates an instant to the start of its containing hour.
pub fn start_of_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_minute(0)
        .and_then(|value| value.with_second(0))
        .and_then(|value| value.with_nanosecond(0))
        .expect("zeroing sub-hour fields keeps the instant valid")
}

/// Parses an ISO-8601 date-time and normalizes it to the canonical slot key.
///
/// Bookings are hour-aligned regardless of the minute requested, so the
/// parsed instant is truncated to the start of its hour.
pub fn parse_slot(date: &str) -> AgendaResult<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(date)
        .map_err(|err| AgendaError::Validation(format!("Invalid date '{}': {}", date, err)))?
        .with_timezone(&Utc);

    Ok(start_of_hour(instant))
}

/// Rejects slots that are not strictly in the future.
///
/// The boundary is exclusive: a slot equal to `now` counts as past.
pub fn ensure_future(slot: DateTime<Utc>, now: DateTime<Utc>) -> AgendaResult<()> {
    if slot <= now {
        return Err(AgendaError::PastDate);
    }

    Ok(())
}
