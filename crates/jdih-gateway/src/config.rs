use serde::Deserialize;

/// HTTP settings for the regulation site, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Site root; search lives at `{base_url}/peraturan/index`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for the first attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for the retry attempt.
    #[serde(default = "default_retry_timeout_secs")]
    pub retry_timeout_secs: u64,
    /// Jitter before each search request, `[min, max]` milliseconds.
    #[serde(default = "default_search_jitter_ms")]
    pub search_jitter_ms: [u64; 2],
    /// Jitter before each detail request.
    #[serde(default = "default_detail_jitter_ms")]
    pub detail_jitter_ms: [u64; 2],
    /// Backoff before the single retry of a transient failure.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: [u64; 2],
}

fn default_base_url() -> String {
    "https://jdih.dephub.go.id".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_retry_timeout_secs() -> u64 {
    45
}
fn default_search_jitter_ms() -> [u64; 2] {
    [500, 1500]
}
fn default_detail_jitter_ms() -> [u64; 2] {
    [300, 1000]
}
fn default_retry_backoff_ms() -> [u64; 2] {
    [2000, 5000]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry_timeout_secs: default_retry_timeout_secs(),
            search_jitter_ms: default_search_jitter_ms(),
            detail_jitter_ms: default_detail_jitter_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl GatewayConfig {
    /// Config pointed at `base_url` with every delay disabled (tests, local mirrors).
    pub fn without_delays(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            retry_timeout_secs: 5,
            search_jitter_ms: [0, 0],
            detail_jitter_ms: [0, 0],
            retry_backoff_ms: [0, 0],
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}/peraturan/index", self.base_url.trim_end_matches('/'))
    }
}
