use crate::models::DbAppointment;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts a new appointment. `date` is expected to already be normalized to
/// the start of its hour by the booking rules.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    provider_id: Uuid,
    date: DateTime<Utc>,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, user_id={}, provider_id={}, date={}",
        id,
        user_id,
        provider_id,
        date
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, date, canceled_at, user_id, provider_id, created_at)
        VALUES ($1, $2, NULL, $3, $4, $5)
        RETURNING id, date, canceled_at, user_id, provider_id, created_at
        "#,
    )
    .bind(id)
    .bind(date)
    .bind(user_id)
    .bind(provider_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(appointment)
}

/// Finds the non-canceled appointment holding a provider's slot, if any.
pub async fn find_active_by_provider_and_date(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    date: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    tracing::debug!(
        "Checking availability: provider_id={}, date={}",
        provider_id,
        date
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, date, canceled_at, user_id, provider_id, created_at
        FROM appointments
        WHERE provider_id = $1 AND date = $2 AND canceled_at IS NULL
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Marks an appointment canceled, freeing its slot for new bookings.
pub async fn cancel_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<DbAppointment> {
    let now = Utc::now();

    tracing::debug!("Canceling appointment: id={}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET canceled_at = $2
        WHERE id = $1
        RETURNING id, date, canceled_at, user_id, provider_id, created_at
        "#,
    )
    .bind(id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(appointment)
}
