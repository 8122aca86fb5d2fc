//! # Appointment Handlers
//!
//! Booking a slot runs a fixed validation sequence; every step
//! short-circuits, so no appointment or notification row exists after a
//! failed request:
//!
//! 1. The target user must exist and be flagged as a provider
//! 2. The requested date is parsed and truncated to the start of its hour,
//!    which is the canonical slot key
//! 3. Slots that are not strictly in the future are rejected
//! 4. The provider must not already hold a non-canceled appointment for the
//!    slot
//! 5. The appointment is inserted, and a notification addressed to the
//!    provider is recorded with a localized rendering of the slot

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use agenda_core::{
    booking,
    errors::AgendaError,
    locale::{self, Portuguese},
    models::appointment::{Appointment, CreateAppointmentRequest, CreateAppointmentResponse},
};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Json<CreateAppointmentResponse>, AppError> {
    // Confirms existence and the provider role in one lookup
    agenda_db::repositories::user::find_provider_by_id(&state.db_pool, payload.provider_id)
        .await
        .map_err(AgendaError::Database)?
        .ok_or(AgendaError::InvalidProvider)?;

    let slot = booking::parse_slot(&payload.date)?;
    booking::ensure_future(slot, Utc::now())?;

    // Check-then-act: no enclosing transaction, so two concurrent requests
    // for the same provider and slot can both pass this check
    let existing = agenda_db::repositories::appointment::find_active_by_provider_and_date(
        &state.db_pool,
        payload.provider_id,
        slot,
    )
    .await
    .map_err(AgendaError::Database)?;

    if existing.is_some() {
        return Err(AppError(AgendaError::SlotUnavailable));
    }

    let db_appointment = agenda_db::repositories::appointment::create_appointment(
        &state.db_pool,
        payload.user_id,
        payload.provider_id,
        slot,
    )
    .await
    .map_err(AgendaError::Database)?;

    // Notify the provider, naming the requesting user
    let user = agenda_db::repositories::user::get_user_by_id(&state.db_pool, payload.user_id)
        .await
        .map_err(AgendaError::Database)?
        .ok_or_else(|| {
            AgendaError::NotFound(format!("User with ID {} not found", payload.user_id))
        })?;

    let content = locale::booking_message(&Portuguese, &user.name, slot);
    agenda_db::repositories::notification::create_notification(
        &state.db_pool,
        payload.provider_id,
        &content,
    )
    .await
    .map_err(AgendaError::Database)?;

    let appointment: Appointment = db_appointment.into();

    // Derived booleans are computed against the response-time clock, never
    // stored
    let now = Utc::now();
    let response = CreateAppointmentResponse {
        id: appointment.id,
        date: appointment.date,
        canceled_at: appointment.canceled_at,
        user_id: appointment.user_id,
        provider_id: appointment.provider_id,
        past: appointment.is_past(now),
        cancelable: appointment.is_cancelable(now),
    };

    Ok(Json(response))
}
