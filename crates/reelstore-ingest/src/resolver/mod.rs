//! Source resolution: turning a profile handle into candidate posts and a
//! post shortcode into caption/thumbnail content.
//!
//! The rest of the pipeline is agnostic to how content is resolved; the
//! [`SourceResolver`] capability has a live variant that fetches from the
//! platform and a fixture variant with deterministic demo content, selected
//! by configuration.

mod fixture;
mod live;

use async_trait::async_trait;

pub use fixture::FixtureResolver;
pub use live::LiveResolver;

use crate::error::IngestError;

/// Caption and thumbnail content for a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub caption: String,
    pub thumbnail_url: String,
}

/// A not-yet-persisted extraction of a source post, awaiting tagging and
/// the dedup check. Discarded once it becomes a catalog row or is filtered.
#[derive(Debug, Clone)]
pub struct IngestionCandidate {
    pub post_id: String,
    pub caption: String,
    pub thumbnail_url: String,
    pub source_url: String,
}

/// Capability for enumerating and resolving source posts.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Returns a bounded list of recent post URLs for a profile handle.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ProfileNotFound`] when the profile cannot be
    /// resolved or parsed, or a transport-level error.
    async fn recent_posts(&self, handle: &str) -> Result<Vec<String>, IngestError>;

    /// Resolves caption and thumbnail content for a post shortcode.
    ///
    /// Implementations must be deterministic on a content miss (a fixed
    /// default entry) so the pipeline never aborts over one unresolvable
    /// post.
    ///
    /// # Errors
    ///
    /// Returns a transport-level error when the upstream fetch itself fails.
    async fn resolve(&self, post_id: &str) -> Result<ResolvedPost, IngestError>;
}
