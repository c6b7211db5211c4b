//! Address Normalizer
//!
//! Collapses whitespace and stray punctuation in free-text addresses
//! before they are sent to any provider.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of whitespace, double quotes, forward or back slashes.
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s"/\\]+"#).expect("separator pattern is valid"));

/// Normalize a raw address string.
///
/// Every run of whitespace (spaces, tabs, newlines), `"`, `/` and `\`
/// becomes a single space, then the ends are trimmed. The function is
/// idempotent.
pub fn normalize_address(raw: &str) -> String {
    SEPARATOR_RUN.replace_all(raw, " ").trim().to_string()
}
