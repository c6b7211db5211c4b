//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod http_client;
pub mod shutdown;

pub use http_client::{build_http_client, HttpClientConfig, USER_AGENT};
pub use shutdown::shutdown_signal;
