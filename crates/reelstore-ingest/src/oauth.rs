//! Instagram OAuth: authorization URL construction and code-for-token
//! exchange, including the upgrade to a long-lived token.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;

use crate::error::IngestError;

const OAUTH_SCOPES: &str = "user_profile,user_media";

/// Credentials for the OAuth flow. All three are required before any OAuth
/// operation; absence surfaces immediately as `MissingConfiguration`.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub app_id: String,
    pub app_secret: String,
    pub redirect_uri: String,
}

impl OAuthSettings {
    /// Builds settings from the optional credential fields of the app
    /// config.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingConfiguration`] naming the first
    /// absent credential.
    pub fn from_app_config(config: &reelstore_core::AppConfig) -> Result<Self, IngestError> {
        let app_id = config
            .instagram_app_id
            .clone()
            .ok_or(IngestError::MissingConfiguration {
                name: "INSTAGRAM_APP_ID",
            })?;
        let app_secret =
            config
                .instagram_app_secret
                .clone()
                .ok_or(IngestError::MissingConfiguration {
                    name: "INSTAGRAM_APP_SECRET",
                })?;
        let redirect_uri =
            config
                .instagram_redirect_uri
                .clone()
                .ok_or(IngestError::MissingConfiguration {
                    name: "INSTAGRAM_REDIRECT_URI",
                })?;

        Ok(Self {
            app_id,
            app_secret,
            redirect_uri,
        })
    }
}

/// Result of a completed code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExchange {
    pub access_token: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ShortLivedTokenResponse {
    access_token: String,
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LongLivedTokenResponse {
    access_token: Option<String>,
}

/// OAuth client. Base URLs are injectable so tests can point at a mock
/// server; production uses the platform defaults.
pub struct InstagramOAuth {
    client: Client,
    settings: OAuthSettings,
    oauth_base: String,
    graph_base: String,
}

impl InstagramOAuth {
    /// Creates an OAuth client against the platform's real endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: OAuthSettings, timeout_secs: u64) -> Result<Self, IngestError> {
        Self::with_base_urls(
            settings,
            timeout_secs,
            "https://api.instagram.com",
            "https://graph.instagram.com",
        )
    }

    /// Creates an OAuth client with explicit base URLs (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the HTTP client cannot be built.
    pub fn with_base_urls(
        settings: OAuthSettings,
        timeout_secs: u64,
        oauth_base: impl Into<String>,
        graph_base: impl Into<String>,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            settings,
            oauth_base: oauth_base.into().trim_end_matches('/').to_string(),
            graph_base: graph_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// The URL the admin UI sends the user to for consent.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        let redirect = utf8_percent_encode(&self.settings.redirect_uri, NON_ALPHANUMERIC);
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&scope={}&response_type=code",
            self.oauth_base, self.settings.app_id, redirect, OAUTH_SCOPES
        )
    }

    /// Exchanges an authorization code for an access token, then upgrades
    /// it to a long-lived token. If the upgrade yields nothing usable the
    /// short-lived token is returned instead of failing the whole exchange.
    ///
    /// # Errors
    ///
    /// - [`IngestError::UnexpectedStatus`] — the code exchange itself was
    ///   rejected.
    /// - [`IngestError::Deserialize`] — unparseable token payload.
    /// - [`IngestError::Http`] — transport failure.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange, IngestError> {
        let url = format!("{}/oauth/access_token", self.oauth_base);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("client_id", self.settings.app_id.as_str()),
                ("client_secret", self.settings.app_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let short: ShortLivedTokenResponse =
            serde_json::from_str(&body).map_err(|source| IngestError::Deserialize {
                context: "short-lived token response".to_string(),
                source,
            })?;

        let access_token = self
            .upgrade_to_long_lived(&short.access_token)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "long-lived upgrade failed; using short-lived token");
                short.access_token.clone()
            });

        Ok(TokenExchange {
            access_token,
            user_id: short.user_id,
        })
    }

    /// Trades a short-lived token for a long-lived one. Falls back to the
    /// input token when the response carries no token.
    async fn upgrade_to_long_lived(&self, short_token: &str) -> Result<String, IngestError> {
        let url = format!(
            "{}/access_token?grant_type=ig_exchange_token&client_secret={}&access_token={}",
            self.graph_base, self.settings.app_secret, short_token
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: format!("{}/access_token", self.graph_base),
            });
        }

        let body = response.text().await?;
        let long: LongLivedTokenResponse =
            serde_json::from_str(&body).map_err(|source| IngestError::Deserialize {
                context: "long-lived token response".to_string(),
                source,
            })?;

        Ok(long
            .access_token
            .unwrap_or_else(|| short_token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> OAuthSettings {
        OAuthSettings {
            app_id: "app-123".to_string(),
            app_secret: "secret-456".to_string(),
            redirect_uri: "https://example.com/auth/callback".to_string(),
        }
    }

    #[test]
    fn authorization_url_carries_client_id_and_encoded_redirect() {
        let oauth = InstagramOAuth::new(settings(), 5).unwrap();
        let url = oauth.authorization_url();
        assert!(url.starts_with("https://api.instagram.com/oauth/authorize?"));
        assert!(url.contains("client_id=app-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample%2Ecom%2Fauth%2Fcallback"));
        assert!(url.contains("scope=user_profile,user_media"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn settings_require_all_three_credentials() {
        let config = reelstore_core::AppConfig {
            database_url: "postgres://example".to_string(),
            env: reelstore_core::Environment::Test,
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            db_max_connections: 10,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            ingest_request_timeout_secs: 30,
            ingest_user_agent: "ua".to_string(),
            ingest_max_posts: 6,
            demo_mode: false,
            default_affiliate_link: "https://example.com/buy".to_string(),
            instagram_app_id: Some("app".to_string()),
            instagram_app_secret: None,
            instagram_redirect_uri: Some("https://example.com/cb".to_string()),
        };

        let result = OAuthSettings::from_app_config(&config);
        assert!(
            matches!(
                result,
                Err(IngestError::MissingConfiguration {
                    name: "INSTAGRAM_APP_SECRET"
                })
            ),
            "expected MissingConfiguration(INSTAGRAM_APP_SECRET), got: {result:?}"
        );
    }
}
