use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether the scheduled moment is already behind `now`.
    ///
    /// Recomputed on every call; `now` is injected so callers control the
    /// clock.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    /// Cancellation is allowed while more than two hours remain before the
    /// scheduled slot. At exactly two hours before, the window is closed.
    pub fn is_cancelable(&self, now: DateTime<Utc>) -> bool {
        now < self.date - Duration::hours(2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub provider_id: Uuid,
    pub user_id: Uuid,
    /// ISO-8601 date-time; normalized to the start of its hour before use.
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub past: bool,
    pub cancelable: bool,
}
