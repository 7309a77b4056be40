//! Database operations for the `reels` table: the storefront catalog.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `reels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReelRow {
    pub id: i64,
    pub creator_id: Option<i64>,
    pub caption: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub instagram_video_url: Option<String>,
    pub product_name: String,
    pub affiliate_link: String,
    pub tags: Option<String>,
    pub show_on_website: bool,
    pub created_at: DateTime<Utc>,
    pub post_date: Option<DateTime<Utc>>,
}

/// A visible reel joined with its creator's identity, as served to the
/// storefront.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisibleReelRow {
    pub id: i64,
    pub caption: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub instagram_video_url: Option<String>,
    pub product_name: String,
    pub affiliate_link: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub post_date: Option<DateTime<Utc>>,
    pub creator_name: Option<String>,
    pub creator_handle: Option<String>,
}

/// A reel waiting to be inserted; produced by the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct NewReel {
    pub creator_id: i64,
    pub caption: String,
    pub thumbnail_image_url: String,
    pub instagram_video_url: String,
    pub product_name: String,
    pub affiliate_link: String,
    pub tags: String,
    pub show_on_website: bool,
    pub post_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all reels flagged for the website, newest post first, joined
/// with creator identity where a creator is still attached.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_visible_reels(pool: &PgPool) -> Result<Vec<VisibleReelRow>, DbError> {
    let rows = sqlx::query_as::<_, VisibleReelRow>(
        "SELECT r.id, r.caption, r.thumbnail_image_url, r.instagram_video_url, \
                r.product_name, r.affiliate_link, r.tags, r.created_at, r.post_date, \
                c.name AS creator_name, c.instagram_handle AS creator_handle \
         FROM reels r \
         LEFT JOIN creators c ON c.id = r.creator_id \
         WHERE r.show_on_website = TRUE \
         ORDER BY r.post_date DESC NULLS LAST, r.id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns true when a reel with this exact video URL is already stored.
///
/// This is the dedup pre-check; the unique constraint on the column is the
/// backstop for syncs racing each other.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn video_url_exists(pool: &PgPool, video_url: &str) -> Result<bool, DbError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reels WHERE instagram_video_url = $1)")
            .bind(video_url)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Inserts a batch of reels inside one transaction and returns the rows
/// that actually landed.
///
/// A conflicting video URL (already ingested by a concurrent sync) is
/// skipped rather than treated as a failure; any other error rolls back
/// the whole batch.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_reels(pool: &PgPool, reels: &[NewReel]) -> Result<Vec<ReelRow>, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = Vec::with_capacity(reels.len());

    for reel in reels {
        let row = sqlx::query_as::<_, ReelRow>(
            "INSERT INTO reels (creator_id, caption, thumbnail_image_url, instagram_video_url, \
                                product_name, affiliate_link, tags, show_on_website, post_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (instagram_video_url) DO NOTHING \
             RETURNING id, creator_id, caption, thumbnail_image_url, instagram_video_url, \
                       product_name, affiliate_link, tags, show_on_website, created_at, post_date",
        )
        .bind(reel.creator_id)
        .bind(&reel.caption)
        .bind(&reel.thumbnail_image_url)
        .bind(&reel.instagram_video_url)
        .bind(&reel.product_name)
        .bind(&reel.affiliate_link)
        .bind(&reel.tags)
        .bind(reel.show_on_website)
        .bind(reel.post_date)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = row {
            inserted.push(row);
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Deletes a reel by id. Immediate and unconditional; no soft delete.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no reel has that id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn delete_reel(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM reels WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
