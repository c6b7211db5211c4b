//! ArcGIS HTTP Geocoder
//!
//! Implements ArcgisGeocoder using the anonymous World GeocodeServer
//! `findAddressCandidates` operation.

use crate::domain::entities::ArcgisCandidate;
use crate::domain::ports::{ArcgisGeocoder, ProviderError};
use crate::domain::value_objects::{Address, Coordinates};
use async_trait::async_trait;
use serde::Deserialize;

/// Public ArcGIS World geocoder endpoint.
pub const DEFAULT_ARCGIS_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    address: String,
    location: Location,
}

/// WGS84 point: x is longitude, y latitude.
#[derive(Debug, Deserialize)]
struct Location {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl FindResponse {
    fn into_best(self) -> Result<Option<ArcgisCandidate>, ProviderError> {
        if let Some(err) = self.error {
            let code = err.code.map(|c| format!(" ({})", c)).unwrap_or_default();
            return Err(ProviderError::Rejected(format!("{}{}", err.message, code)));
        }
        Ok(self.candidates.into_iter().next().map(|c| ArcgisCandidate {
            address: c.address,
            location: Coordinates::new(c.location.y, c.location.x),
        }))
    }
}

/// ArcGIS geocoder over HTTP. Constructed once at startup.
pub struct ArcgisHttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl ArcgisHttpGeocoder {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ArcgisGeocoder for ArcgisHttpGeocoder {
    async fn geocode(&self, address: &Address) -> Result<Option<ArcgisCandidate>, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("singleLine", address.as_str()),
                ("f", "json"),
                ("outFields", "*"),
                ("maxLocations", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("arcgis geocoder returned {}", status);
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: FindResponse = response.json().await?;
        body.into_best()
    }
}
