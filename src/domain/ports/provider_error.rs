//! Provider Error
//!
//! Failures talking to a remote provider. These are transport-level
//! problems, distinct from a provider answering "no match".

/// Error returned by outbound provider ports.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network failure, timeout, TLS, or body read error.
    #[error("request failed: {0}")]
    Transport(String),
    /// Provider answered with a non-success HTTP status.
    #[error("provider returned status {0}")]
    Status(u16),
    /// Response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Provider returned an explicit error object.
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if err.is_decode() => Self::Malformed(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}
