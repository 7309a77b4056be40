pub mod caption;
pub mod error;
pub mod extract;
pub mod media;
pub mod oauth;
pub mod resolver;
pub mod sync;

pub use caption::{analyze, CaptionAnalysis};
pub use error::IngestError;
pub use extract::{canonical_post_url, extract_post_id};
pub use media::{InstagramGraph, MediaItem, MediaProfile};
pub use oauth::{InstagramOAuth, OAuthSettings, TokenExchange};
pub use resolver::{FixtureResolver, IngestionCandidate, LiveResolver, ResolvedPost, SourceResolver};
pub use sync::{ReelSync, SyncOptions, SyncOutcome};
