//! Graph API client for token-based media sync: the authenticated
//! profile and its media list.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::IngestError;

/// The authenticated account behind an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaProfile {
    pub id: String,
    pub username: String,
}

/// One media item from the account's feed. Only `VIDEO` items become
/// ingestion candidates.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub caption: Option<String>,
    pub media_type: String,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub timestamp: Option<String>,
    pub permalink: Option<String>,
}

impl MediaItem {
    /// Best thumbnail available: the dedicated thumbnail when present,
    /// otherwise the media URL itself.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url.as_deref().or(self.media_url.as_deref())
    }

    /// The item's post timestamp, or `None` when absent/unparseable.
    /// The platform emits RFC 3339 with a colon-less offset (`+0000`),
    /// which strict RFC 3339 parsing rejects.
    #[must_use]
    pub fn post_date(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Deserialize)]
struct MediaListResponse {
    #[serde(default)]
    data: Vec<MediaItem>,
}

/// Graph API client. Base URL injectable for tests.
pub struct InstagramGraph {
    client: Client,
    base_url: String,
}

impl InstagramGraph {
    /// Creates a client against the real Graph API.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, IngestError> {
        Self::with_base_url(timeout_secs, "https://graph.instagram.com")
    }

    /// Creates a client with an explicit base URL (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        timeout_secs: u64,
        base_url: impl Into<String>,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the authenticated profile for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnexpectedStatus`] on a rejected token,
    /// [`IngestError::Deserialize`] on a malformed payload, or
    /// [`IngestError::Http`] on transport failure.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<MediaProfile, IngestError> {
        let url = format!(
            "{}/me?fields=id,username&access_token={access_token}",
            self.base_url
        );
        self.get_json(&url, "profile response").await
    }

    /// Fetches the account's media list, newest first as served upstream.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_profile`].
    pub async fn fetch_media(&self, access_token: &str) -> Result<Vec<MediaItem>, IngestError> {
        let url = format!(
            "{}/me/media?fields=id,caption,media_type,media_url,thumbnail_url,timestamp,permalink&access_token={access_token}",
            self.base_url
        );
        let response: MediaListResponse = self.get_json(&url, "media list response").await?;
        Ok(response.data)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_token(url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| IngestError::Deserialize {
            context: context.to_string(),
            source,
        })
    }
}

/// Strips the access token from a URL before it lands in an error message.
fn redact_token(url: &str) -> String {
    match url.split_once("access_token=") {
        Some((prefix, _)) => format!("{prefix}access_token=[redacted]"),
        None => url.to_string(),
    }
}
