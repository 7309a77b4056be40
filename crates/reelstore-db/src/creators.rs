//! Database operations for the `creators` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: i64,
    pub name: String,
    pub instagram_handle: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}

/// Returns the creator with the given Instagram handle, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_creator_by_handle(
    pool: &PgPool,
    handle: &str,
) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(
        "SELECT id, name, instagram_handle, tier, created_at \
         FROM creators \
         WHERE instagram_handle = $1",
    )
    .bind(handle)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates a new creator row and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails (including a unique
/// violation on the handle).
pub async fn create_creator(
    pool: &PgPool,
    name: &str,
    handle: &str,
    tier: &str,
) -> Result<CreatorRow, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(
        "INSERT INTO creators (name, instagram_handle, tier) \
         VALUES ($1, $2, $3) \
         RETURNING id, name, instagram_handle, tier, created_at",
    )
    .bind(name)
    .bind(handle)
    .bind(tier)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Looks up a creator by handle, creating it with the given tier when absent.
///
/// Existing creator metadata is never touched on a repeat sync; only the
/// first sync of a handle writes anything.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn ensure_creator(pool: &PgPool, handle: &str, tier: &str) -> Result<CreatorRow, DbError> {
    if let Some(existing) = find_creator_by_handle(pool, handle).await? {
        return Ok(existing);
    }

    // Two concurrent first syncs can both miss the lookup; the unique
    // handle constraint makes the second insert fail, so re-read on
    // conflict instead of surfacing it.
    match create_creator(pool, handle, handle, tier).await {
        Ok(row) => Ok(row),
        Err(DbError::Sqlx(sqlx::Error::Database(db_err)))
            if db_err.code().as_deref() == Some("23505") =>
        {
            find_creator_by_handle(pool, handle)
                .await?
                .ok_or(DbError::NotFound)
        }
        Err(e) => Err(e),
    }
}
