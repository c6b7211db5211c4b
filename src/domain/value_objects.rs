//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::services::normalize_address;
use serde::Serialize;
use std::fmt;

/// An address that has been through whitespace/punctuation normalization.
///
/// The only way to build one is [`Address::normalize`], so every address
/// handed to a provider is guaranteed normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Normalize a raw address string.
    ///
    /// # Examples
    /// ```
    /// use geocoder_proxy::domain::value_objects::Address;
    ///
    /// let addr = Address::normalize("  Moscow,\t\"Tverskaya\"  1 ");
    /// assert_eq!(addr.as_str(), "Moscow, Tverskaya 1");
    /// ```
    pub fn normalize(raw: &str) -> Self {
        Self(normalize_address(raw))
    }

    /// Borrow the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Caller-supplied provider credentials, scoped to a single request.
///
/// `Debug` never prints the secret material so credentials can sit inside
/// structs that get logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    secret: Option<String>,
}

impl Credentials {
    /// Token-only credentials (Yandex).
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
        }
    }

    /// Token plus secret pair (Dadata).
    pub fn with_secret(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: Some(secret.into()),
        }
    }

    pub fn api_token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse a pair of decimal strings as returned by the providers.
    ///
    /// Returns `None` if either side is not a finite number.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        if lat.is_finite() && lon.is_finite() {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Parse a `"lon lat"` point string.
    ///
    /// Longitude is the first token and latitude the last.
    ///
    /// # Examples
    /// ```
    /// use geocoder_proxy::domain::value_objects::Coordinates;
    ///
    /// let c = Coordinates::from_position("37.617698 55.755864").unwrap();
    /// assert_eq!(c.lat, 55.755864);
    /// assert_eq!(c.lon, 37.617698);
    /// ```
    pub fn from_position(pos: &str) -> Option<Self> {
        let mut tokens = pos.split_whitespace();
        let lon = tokens.next()?;
        let lat = tokens.last()?;
        Self::parse(lat, lon)
    }

    /// Round both sides to `places` decimal places.
    ///
    /// Rounds the exact binary value through its decimal expansion, so
    /// `34.0564945` (stored as `34.05649449999...`) becomes `34.056494`.
    pub fn rounded(self, places: u32) -> Self {
        Self {
            lat: round_decimal(self.lat, places),
            lon: round_decimal(self.lon, places),
        }
    }
}

fn round_decimal(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

/// A latitude/longitude pair exactly as the provider reported it.
///
/// Used where the provider's own text (precision, trailing zeros) is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCoordinates {
    pub lat: String,
    pub lon: String,
}

impl RawCoordinates {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}
