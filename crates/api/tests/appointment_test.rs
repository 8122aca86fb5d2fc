
use chrono::{DateTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use agenda_api::middleware::error_handling::AppError;
use agenda_core::{
    booking,
    errors::AgendaError,
    locale::{self, Portuguese},
    models::appointment::CreateAppointmentResponse,
};
use agenda_db::models::{DbAppointment, DbUser};

use crate::test_utils::TestContext;

fn instant(value: &str) -> DateTime<Utc> {
    value.parse().expect("valid RFC 3339 instant")
}

fn db_user(id: Uuid, name: &str, provider: bool) -> DbUser {
    DbUser {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        provider,
        created_at: instant("2024-01-01T00:00:00Z"),
    }
}

// Mirrors the create_appointment handler against the repository mocks, with
// the clock injected so the past-date boundary is deterministic.
async fn create_appointment_wrapper(
    ctx: &mut TestContext,
    provider_id: Uuid,
    user_id: Uuid,
    date: &str,
    now: DateTime<Utc>,
) -> Result<CreateAppointmentResponse, AppError> {
    ctx.user_repo
        .find_provider_by_id(provider_id)
        .await?
        .ok_or(AgendaError::InvalidProvider)?;

    let slot = booking::parse_slot(date)?;
    booking::ensure_future(slot, now)?;

    let existing = ctx
        .appointment_repo
        .find_active_by_provider_and_date(provider_id, slot)
        .await?;
    if existing.is_some() {
        return Err(AppError(AgendaError::SlotUnavailable));
    }

    let db_appointment = ctx
        .appointment_repo
        .create_appointment(user_id, provider_id, slot)
        .await?;

    let user = ctx
        .user_repo
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| AgendaError::NotFound(format!("User with ID {} not found", user_id)))?;

    let content = locale::booking_message(&Portuguese, &user.name, slot);
    // Static reference for mockall
    let content_static: &'static str = Box::leak(content.into_boxed_str());
    ctx.notification_repo
        .create_notification(provider_id, content_static)
        .await?;

    Ok(CreateAppointmentResponse {
        id: db_appointment.id,
        date: db_appointment.date,
        canceled_at: db_appointment.canceled_at,
        user_id: db_appointment.user_id,
        provider_id: db_appointment.provider_id,
        past: db_appointment.date < now,
        cancelable: now < db_appointment.date - chrono::Duration::hours(2),
    })
}

#[tokio::test]
async fn test_create_appointment_normalizes_date_and_notifies_provider() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");
    let expected_slot = instant("2024-06-10T14:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));

    ctx.appointment_repo
        .expect_find_active_by_provider_and_date()
        .with(predicate::eq(provider_id), predicate::eq(expected_slot))
        .times(1)
        .returning(|_, _| Ok(None));

    ctx.appointment_repo
        .expect_create_appointment()
        .with(
            predicate::eq(user_id),
            predicate::eq(provider_id),
            predicate::eq(expected_slot),
        )
        .times(1)
        .returning(move |user_id, provider_id, date| {
            Ok(DbAppointment {
                id: appointment_id,
                date,
                canceled_at: None,
                user_id,
                provider_id,
                created_at: now,
            })
        });

    ctx.user_repo
        .expect_get_user_by_id()
        .with(predicate::eq(user_id))
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Ana Souza", false))));

    let expected_content: &'static str = Box::leak(
        "Novo agendamento de Ana Souza para dia 10 de junho, às 14:00h"
            .to_string()
            .into_boxed_str(),
    );
    ctx.notification_repo
        .expect_create_notification()
        .with(predicate::eq(provider_id), predicate::eq(expected_content))
        .times(1)
        .returning(move |user_id, content| {
            Ok(agenda_db::models::DbNotification {
                id: Uuid::new_v4(),
                content: content.to_string(),
                user_id,
                created_at: now,
            })
        });

    // Requested 14:23, stored slot must be 14:00
    let response =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await
            .expect("booking should succeed");

    assert_eq!(response.id, appointment_id);
    assert_eq!(response.date, expected_slot);
    assert_eq!(response.canceled_at, None);
    assert_eq!(response.user_id, user_id);
    assert_eq!(response.provider_id, provider_id);
    assert_eq!(response.past, false);
    // More than two hours remain before the slot
    assert_eq!(response.cancelable, true);
}

#[tokio::test]
async fn test_create_appointment_rejects_non_provider() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");

    // The target exists but is a plain user, so the provider lookup yields
    // nothing
    ctx.user_repo
        .expect_find_provider_by_id()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(|_| Ok(None));

    // Nothing past the first step may run
    ctx.appointment_repo
        .expect_find_active_by_provider_and_date()
        .times(0);
    ctx.appointment_repo.expect_create_appointment().times(0);
    ctx.notification_repo.expect_create_notification().times(0);

    let result =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await;

    match result.unwrap_err().0 {
        AgendaError::InvalidProvider => {}
        e => panic!("Expected InvalidProvider error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_appointment_rejects_past_date() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));

    // No availability check or write happens for a past slot
    ctx.appointment_repo
        .expect_find_active_by_provider_and_date()
        .times(0);
    ctx.appointment_repo.expect_create_appointment().times(0);
    ctx.notification_repo.expect_create_notification().times(0);

    let result =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-09T14:23:00Z", now)
            .await;

    match result.unwrap_err().0 {
        AgendaError::PastDate => {}
        e => panic!("Expected PastDate error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_appointment_rejects_slot_equal_to_now() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    // The requested minute truncates to exactly `now`; the boundary is
    // exclusive, so this is rejected
    let now = instant("2024-06-10T14:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));

    ctx.appointment_repo.expect_create_appointment().times(0);

    let result =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await;

    match result.unwrap_err().0 {
        AgendaError::PastDate => {}
        e => panic!("Expected PastDate error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_appointment_rejects_taken_slot() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");
    let slot = instant("2024-06-10T14:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));

    // Another client already holds the slot
    ctx.appointment_repo
        .expect_find_active_by_provider_and_date()
        .with(predicate::eq(provider_id), predicate::eq(slot))
        .times(1)
        .returning(move |provider_id, date| {
            Ok(Some(DbAppointment {
                id: Uuid::new_v4(),
                date,
                canceled_at: None,
                user_id: other_user_id,
                provider_id,
                created_at: now,
            }))
        });

    ctx.appointment_repo.expect_create_appointment().times(0);
    ctx.notification_repo.expect_create_notification().times(0);

    let result =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await;

    match result.unwrap_err().0 {
        AgendaError::SlotUnavailable => {}
        e => panic!("Expected SlotUnavailable error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_appointment_succeeds_after_cancellation_frees_slot() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let first_appointment_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");
    let slot = instant("2024-06-10T14:00:00Z");

    // Cancel the appointment holding the slot
    ctx.appointment_repo
        .expect_cancel_appointment()
        .with(predicate::eq(first_appointment_id))
        .times(1)
        .returning(move |id| {
            Ok(DbAppointment {
                id,
                date: slot,
                canceled_at: Some(now),
                user_id: Uuid::new_v4(),
                provider_id,
                created_at: now,
            })
        });

    let canceled = ctx
        .appointment_repo
        .cancel_appointment(first_appointment_id)
        .await
        .expect("cancellation should succeed");
    assert!(canceled.canceled_at.is_some());

    // The canceled appointment no longer counts against availability
    ctx.user_repo
        .expect_find_provider_by_id()
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));
    ctx.appointment_repo
        .expect_find_active_by_provider_and_date()
        .with(predicate::eq(provider_id), predicate::eq(slot))
        .times(1)
        .returning(|_, _| Ok(None));
    ctx.appointment_repo
        .expect_create_appointment()
        .times(1)
        .returning(move |user_id, provider_id, date| {
            Ok(DbAppointment {
                id: Uuid::new_v4(),
                date,
                canceled_at: None,
                user_id,
                provider_id,
                created_at: now,
            })
        });
    ctx.user_repo
        .expect_get_user_by_id()
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Ana Souza", false))));
    ctx.notification_repo
        .expect_create_notification()
        .times(1)
        .returning(move |user_id, content| {
            Ok(agenda_db::models::DbNotification {
                id: Uuid::new_v4(),
                content: content.to_string(),
                user_id,
                created_at: now,
            })
        });

    let response =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await
            .expect("rebooking a freed slot should succeed");

    assert_eq!(response.date, slot);
    assert_eq!(response.canceled_at, None);
}

#[tokio::test]
async fn test_create_appointment_rejects_malformed_date() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .times(1)
        .returning(move |id| Ok(Some(db_user(id, "Barber Joe", true))));

    ctx.appointment_repo.expect_create_appointment().times(0);

    let result = create_appointment_wrapper(&mut ctx, provider_id, user_id, "not-a-date", now).await;

    match result.unwrap_err().0 {
        AgendaError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_appointment_propagates_store_failure() {
    let mut ctx = TestContext::new();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = instant("2024-06-10T10:00:00Z");

    ctx.user_repo
        .expect_find_provider_by_id()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection refused")));

    ctx.appointment_repo.expect_create_appointment().times(0);
    ctx.notification_repo.expect_create_notification().times(0);

    let result =
        create_appointment_wrapper(&mut ctx, provider_id, user_id, "2024-06-10T14:23:00Z", now)
            .await;

    match result.unwrap_err().0 {
        AgendaError::Database(report) => {
            assert!(report.to_string().contains("connection refused"));
        }
        e => panic!("Expected Database error, got: {:?}", e),
    }
}
