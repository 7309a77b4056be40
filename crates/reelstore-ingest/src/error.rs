use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid post URL \"{url}\": no /p/<shortcode> segment")]
    InvalidUrl { url: String },

    #[error("profile not found: @{handle}")]
    ProfileNotFound { handle: String },

    #[error("missing configuration: {name}")]
    MissingConfiguration { name: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Persistence(#[from] reelstore_db::DbError),
}
