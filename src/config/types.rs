use serde::Deserialize;

/// Address the backend listens on when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Fixed delay between status polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Main configuration structure for Crawl-Watch
///
/// Every section is optional; missing sections and keys fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub poller: PollerConfig,
}

/// Crawl backend connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the crawl service (e.g. "http://127.0.0.1:8000")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("crawl-watch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Status polling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Delay between status requests (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Give up after this many non-terminal polls (0 = never)
    #[serde(rename = "max-polls")]
    pub max_polls: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: 0,
        }
    }
}
