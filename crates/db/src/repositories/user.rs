use crate::models::DbUser;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    provider: bool,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating user: id={}, name={}, provider={}",
        id,
        name,
        provider
    );

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, provider, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, provider, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(provider)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    tracing::debug!("Getting user by id: {}", id);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, provider, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Looks a user up by id, keeping only rows flagged as providers. A plain
/// user with that id yields `None`.
pub async fn find_provider_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    tracing::debug!("Looking up provider: {}", id);

    let provider = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, provider, created_at
        FROM users
        WHERE id = $1 AND provider = TRUE
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(provider)
}
