use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Per-request timeout for every upstream Instagram fetch. There is no
    /// retry layer, so this is the only guard against a hung upstream.
    pub ingest_request_timeout_secs: u64,
    pub ingest_user_agent: String,
    /// Maximum number of recent posts enumerated per profile sync.
    pub ingest_max_posts: usize,
    /// When true, a profile that cannot be resolved falls back to
    /// deterministic demo content instead of failing with not-found.
    /// Off by default so production never fabricates data.
    pub demo_mode: bool,
    /// Placeholder purchase link attached to reels until an admin curates one.
    pub default_affiliate_link: String,
    pub instagram_app_id: Option<String>,
    pub instagram_app_secret: Option<String>,
    pub instagram_redirect_uri: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "ingest_request_timeout_secs",
                &self.ingest_request_timeout_secs,
            )
            .field("ingest_user_agent", &self.ingest_user_agent)
            .field("ingest_max_posts", &self.ingest_max_posts)
            .field("demo_mode", &self.demo_mode)
            .field("default_affiliate_link", &self.default_affiliate_link)
            .field("instagram_app_id", &self.instagram_app_id)
            .field(
                "instagram_app_secret",
                &self.instagram_app_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("instagram_redirect_uri", &self.instagram_redirect_uri)
            .finish()
    }
}
