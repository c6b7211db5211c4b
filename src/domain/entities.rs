//! Domain Entities - Core business objects
//!
//! Everything here lives for a single request/response cycle. Nothing is
//! persisted and nothing is shared between requests.

use crate::domain::value_objects::{Address, Coordinates, RawCoordinates};
use serde::Deserialize;

/// Status reported for addresses no provider could resolve.
pub const UNRESOLVED_STATUS: u16 = 400;

/// Result of one geocoding request.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// The provider produced an acceptable location.
    Located(Coordinates),
    /// The provider produced a location that is passed through as text.
    Reported(RawCoordinates),
    /// No match, or a match that failed the confidence gate.
    Unresolved(Address),
}

impl GeocodeOutcome {
    pub fn is_located(&self) -> bool {
        matches!(self, Self::Located(_) | Self::Reported(_))
    }

    /// Status indicator carried in the response body.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Located(_) | Self::Reported(_) => 200,
            Self::Unresolved(_) => UNRESOLVED_STATUS,
        }
    }

    /// Error message for the failure variant.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Located(_) | Self::Reported(_) => None,
            Self::Unresolved(address) => Some(format!("Cannot geocode: {}", address)),
        }
    }
}

/// Best match returned by the ArcGIS geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcgisCandidate {
    /// Formatted address the provider matched against
    pub address: String,
    pub location: Coordinates,
}

/// Subset of the Dadata "clean address" record this service reads.
///
/// Coordinates arrive as decimal strings or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CleanedAddress {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub geo_lat: Option<String>,
    #[serde(default)]
    pub geo_lon: Option<String>,
}

impl CleanedAddress {
    /// Coordinates as reported, if both sides are present and non-empty.
    ///
    /// The text is not parsed; whatever the provider sent is kept.
    pub fn coordinates(&self) -> Option<RawCoordinates> {
        let lat = self.geo_lat.as_deref().filter(|s| !s.is_empty())?;
        let lon = self.geo_lon.as_deref().filter(|s| !s.is_empty())?;
        Some(RawCoordinates::new(lat, lon))
    }
}
