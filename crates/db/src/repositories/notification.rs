use crate::models::DbNotification;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Records a notification addressed to `user_id`. Write-only from the
/// booking flow; delivery is someone else's job.
pub async fn create_notification(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    content: &str,
) -> Result<DbNotification> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating notification: id={}, user_id={}", id, user_id);

    let notification = sqlx::query_as::<_, DbNotification>(
        r#"
        INSERT INTO notifications (id, content, user_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, content, user_id, created_at
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(notification)
}
