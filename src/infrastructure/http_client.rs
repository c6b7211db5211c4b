//! Outbound HTTP Client
//!
//! Builds the single reqwest client shared by every provider adapter.
//! reqwest clients pool connections internally and are cheap to clone.

use std::time::Duration;

/// User-Agent sent to providers.
pub const USER_AGENT: &str = concat!("geocoder-proxy/", env!("CARGO_PKG_VERSION"));

/// Outbound client settings.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout for a provider call
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(10)),
        }
    }
}

/// Build the shared provider client.
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
}
