//! The ingestion orchestrator: profile handle in, new catalog rows out.
//!
//! One sync runs to completion before returning. Candidates are processed
//! sequentially in enumeration order; a bad candidate is skipped, a store
//! failure aborts the whole sync.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use reelstore_db::NewReel;

use crate::caption::analyze;
use crate::error::IngestError;
use crate::extract::{canonical_post_url, extract_post_id};
use crate::media::InstagramGraph;
use crate::resolver::{FixtureResolver, IngestionCandidate, SourceResolver};

/// Captions are length-capped before persistence.
const MAX_CAPTION_CHARS: usize = 500;

/// Name attached to a reel when no product trigger matched its caption.
const FALLBACK_PRODUCT_NAME: &str = "Featured Product";

/// Tier assigned to creators created lazily on first sync.
const DEFAULT_CREATOR_TIER: &str = "Free";

/// Outcome of one profile sync. Zero new reels is success, not failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub new_reels: usize,
    pub message: String,
}

/// Orchestrator options beyond the store and resolver themselves.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// When true, an unresolvable profile falls back to deterministic demo
    /// content instead of failing. Opt-in; off means a hard not-found.
    pub demo_mode: bool,
    /// Placeholder purchase link until an admin curates a real one.
    pub default_affiliate_link: String,
}

/// Drives the pipeline: resolve creator, enumerate candidates, extract and
/// analyze each, dedup against the store, persist survivors.
pub struct ReelSync {
    pool: PgPool,
    resolver: Arc<dyn SourceResolver>,
    options: SyncOptions,
}

impl ReelSync {
    #[must_use]
    pub fn new(pool: PgPool, resolver: Arc<dyn SourceResolver>, options: SyncOptions) -> Self {
        Self {
            pool,
            resolver,
            options,
        }
    }

    /// Syncs recent posts for a profile handle into the catalog.
    ///
    /// Re-running with an unchanged candidate list inserts nothing new:
    /// already-ingested posts are filtered by the dedup gate, and the
    /// creator row is created at most once.
    ///
    /// # Errors
    ///
    /// - [`IngestError::ProfileNotFound`] — profile unresolvable and demo
    ///   mode is off.
    /// - [`IngestError::Persistence`] — store read/write failure; nothing
    ///   from this sync is committed.
    /// - Transport errors from the live resolver.
    pub async fn sync_profile(&self, handle: &str) -> Result<SyncOutcome, IngestError> {
        let creator = reelstore_db::ensure_creator(&self.pool, handle, DEFAULT_CREATOR_TIER).await?;
        tracing::info!(handle, creator_id = creator.id, "starting profile sync");

        let (post_urls, resolver) = self.enumerate_candidates(handle).await?;

        let mut survivors: Vec<NewReel> = Vec::new();
        for url in post_urls {
            let Some(candidate) = self.extract_candidate(resolver.as_ref(), &url).await else {
                continue;
            };

            // Dedup gate: checked per candidate immediately before it joins
            // the insert batch.
            if reelstore_db::video_url_exists(&self.pool, &candidate.source_url).await? {
                tracing::debug!(post_id = %candidate.post_id, "skipping already-ingested post");
                continue;
            }

            survivors.push(self.build_reel(
                creator.id,
                &candidate.caption,
                candidate.thumbnail_url.clone(),
                candidate.source_url.clone(),
                Utc::now(),
            ));
        }

        let inserted = reelstore_db::insert_reels(&self.pool, &survivors).await?;
        let new_reels = inserted.len();
        tracing::info!(handle, new_reels, "profile sync complete");

        Ok(SyncOutcome {
            new_reels,
            message: sync_message(new_reels, handle),
        })
    }

    /// Syncs the authenticated account's video posts using an OAuth access
    /// token, via the Graph API instead of profile scraping. Same analyze,
    /// dedup, and persist path as [`Self::sync_profile`].
    ///
    /// # Errors
    ///
    /// - [`IngestError::UnexpectedStatus`] — token rejected upstream.
    /// - [`IngestError::Persistence`] — store failure, nothing committed.
    /// - Transport/deserialization errors from the Graph API.
    pub async fn sync_media(
        &self,
        graph: &InstagramGraph,
        access_token: &str,
    ) -> Result<SyncOutcome, IngestError> {
        let profile = graph.fetch_profile(access_token).await?;
        let creator =
            reelstore_db::ensure_creator(&self.pool, &profile.username, DEFAULT_CREATOR_TIER)
                .await?;
        tracing::info!(handle = %profile.username, creator_id = creator.id, "starting media sync");

        let media = graph.fetch_media(access_token).await?;

        let mut survivors: Vec<NewReel> = Vec::new();
        for item in media {
            // Reels are video posts; images and carousels are not catalog
            // material.
            if item.media_type != "VIDEO" {
                continue;
            }
            let Some(permalink) = item.permalink.clone() else {
                tracing::warn!(media_id = %item.id, "skipping video without permalink");
                continue;
            };

            if reelstore_db::video_url_exists(&self.pool, &permalink).await? {
                continue;
            }

            let caption = item.caption.clone().unwrap_or_default();
            let thumbnail = item.thumbnail().unwrap_or_default().to_string();
            let post_date = item.post_date().unwrap_or_else(Utc::now);
            survivors.push(self.build_reel(creator.id, &caption, thumbnail, permalink, post_date));
        }

        let inserted = reelstore_db::insert_reels(&self.pool, &survivors).await?;
        let new_reels = inserted.len();
        tracing::info!(handle = %profile.username, new_reels, "media sync complete");

        Ok(SyncOutcome {
            new_reels,
            message: sync_message(new_reels, &profile.username),
        })
    }

    /// Enumerates candidate post URLs, applying the opt-in demo fallback
    /// when the profile cannot be resolved.
    async fn enumerate_candidates(
        &self,
        handle: &str,
    ) -> Result<(Vec<String>, Arc<dyn SourceResolver>), IngestError> {
        match self.resolver.recent_posts(handle).await {
            Ok(urls) => Ok((urls, Arc::clone(&self.resolver))),
            Err(IngestError::ProfileNotFound { .. }) if self.options.demo_mode => {
                tracing::warn!(handle, "profile unresolvable; demo mode fallback engaged");
                let fixture: Arc<dyn SourceResolver> = Arc::new(FixtureResolver::new());
                Ok((FixtureResolver::demo_post_urls(), fixture))
            }
            Err(e) => Err(e),
        }
    }

    /// Runs extractor + resolver for one post URL. Per-candidate failures
    /// are logged and swallowed; one bad post never aborts the batch.
    async fn extract_candidate(
        &self,
        resolver: &dyn SourceResolver,
        url: &str,
    ) -> Option<IngestionCandidate> {
        let post_id = match extract_post_id(url) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(url, error = %e, "skipping candidate with invalid URL");
                return None;
            }
        };

        match resolver.resolve(&post_id).await {
            Ok(post) => Some(IngestionCandidate {
                source_url: canonical_post_url(&post_id),
                post_id,
                caption: post.caption,
                thumbnail_url: post.thumbnail_url,
            }),
            Err(e) => {
                tracing::warn!(post_id, error = %e, "skipping unresolvable candidate");
                None
            }
        }
    }

    fn build_reel(
        &self,
        creator_id: i64,
        caption: &str,
        thumbnail_image_url: String,
        instagram_video_url: String,
        post_date: chrono::DateTime<Utc>,
    ) -> NewReel {
        let analysis = analyze(caption);

        NewReel {
            creator_id,
            caption: truncate_chars(caption, MAX_CAPTION_CHARS),
            thumbnail_image_url,
            instagram_video_url,
            product_name: analysis
                .product_name
                .unwrap_or_else(|| FALLBACK_PRODUCT_NAME.to_string()),
            affiliate_link: self.options.default_affiliate_link.clone(),
            tags: analysis.tags.join(", "),
            show_on_website: true,
            post_date,
        }
    }
}

fn sync_message(new_reels: usize, handle: &str) -> String {
    if new_reels == 0 {
        format!("No new reels found for @{handle}")
    } else {
        format!("Successfully synced {new_reels} new reels from @{handle}")
    }
}

/// Truncates to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_message_zero_is_no_new_reels() {
        assert_eq!(sync_message(0, "newuser"), "No new reels found for @newuser");
    }

    #[test]
    fn sync_message_counts_inserted_reels() {
        assert_eq!(
            sync_message(3, "newuser"),
            "Successfully synced 3 new reels from @newuser"
        );
    }

    #[test]
    fn truncate_chars_caps_long_captions() {
        let long = "x".repeat(900);
        assert_eq!(truncate_chars(&long, MAX_CAPTION_CHARS).chars().count(), 500);
    }

    #[test]
    fn truncate_chars_keeps_short_captions_intact() {
        assert_eq!(truncate_chars("short ☕ caption", 500), "short ☕ caption");
    }

    #[test]
    fn truncate_chars_is_char_boundary_safe() {
        let s = "ééééé";
        assert_eq!(truncate_chars(s, 3), "ééé");
    }
}
