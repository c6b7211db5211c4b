//! Geocode Service - Main application use cases
//!
//! One use case per provider: normalize the address, make exactly one
//! outbound call, and reduce the answer to a [`GeocodeOutcome`].

use crate::domain::entities::GeocodeOutcome;
use crate::domain::ports::{AddressCleanerFactory, ArcgisGeocoder, ProviderError, YandexGeocoder};
use crate::domain::services::BigramCosine;
use crate::domain::value_objects::{Address, Coordinates, Credentials};
use std::sync::Arc;

/// Minimum similarity between the requested and matched address for an
/// ArcGIS result to be accepted.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.4;

/// Decimal places kept on ArcGIS coordinates.
pub const ARCGIS_PRECISION: u32 = 6;

/// Geocode service.
///
/// Holds only read-only, process-wide collaborators, so one instance is
/// shared by every in-flight request.
pub struct GeocodeService {
    yandex: Arc<dyn YandexGeocoder>,
    arcgis: Arc<dyn ArcgisGeocoder>,
    dadata: Arc<dyn AddressCleanerFactory>,
    scorer: BigramCosine,
    similarity_threshold: f64,
}

impl GeocodeService {
    /// Create a new geocode service.
    pub fn new(
        yandex: Arc<dyn YandexGeocoder>,
        arcgis: Arc<dyn ArcgisGeocoder>,
        dadata: Arc<dyn AddressCleanerFactory>,
    ) -> Self {
        Self {
            yandex,
            arcgis,
            dadata,
            scorer: BigramCosine::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Override the ArcGIS acceptance threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Geocode through Yandex.
    ///
    /// The first feature's `"lon lat"` point is returned as-is, without
    /// rounding.
    pub async fn geocode_yandex(
        &self,
        credentials: &Credentials,
        raw_address: &str,
    ) -> Result<GeocodeOutcome, ProviderError> {
        let address = Address::normalize(raw_address);
        let Some(pos) = self.yandex.first_position(credentials, &address).await? else {
            tracing::debug!(address = %address, "yandex: empty feature collection");
            return Ok(GeocodeOutcome::Unresolved(address));
        };

        let coords = Coordinates::from_position(&pos)
            .ok_or_else(|| ProviderError::Malformed(format!("unparseable point {:?}", pos)))?;
        Ok(GeocodeOutcome::Located(coords))
    }

    /// Geocode through ArcGIS.
    ///
    /// A candidate is accepted only if its formatted address is lexically
    /// close enough to the requested one. Accepted coordinates are rounded
    /// to six decimal places.
    pub async fn geocode_arcgis(&self, raw_address: &str) -> Result<GeocodeOutcome, ProviderError> {
        let address = Address::normalize(raw_address);
        let Some(candidate) = self.arcgis.geocode(&address).await? else {
            tracing::debug!(address = %address, "arcgis: no candidates");
            return Ok(GeocodeOutcome::Unresolved(address));
        };

        let similarity = self.scorer.similarity(address.as_str(), &candidate.address);

        if similarity >= self.similarity_threshold {
            Ok(GeocodeOutcome::Located(
                candidate.location.rounded(ARCGIS_PRECISION),
            ))
        } else {
            tracing::debug!(
                address = %address,
                matched = %candidate.address,
                similarity,
                "arcgis: match rejected below threshold"
            );
            Ok(GeocodeOutcome::Unresolved(address))
        }
    }

    /// Geocode through Dadata's address cleaner.
    ///
    /// A cleaner is built for this call from the caller's credentials and
    /// dropped when the call returns. Coordinates are returned as the
    /// provider's text.
    pub async fn geocode_dadata(
        &self,
        credentials: Credentials,
        raw_address: &str,
    ) -> Result<GeocodeOutcome, ProviderError> {
        let address = Address::normalize(raw_address);
        let cleaner = self.dadata.connect(credentials);

        let coords = cleaner
            .clean(&address)
            .await?
            .and_then(|cleaned| cleaned.coordinates());

        match coords {
            Some(coords) => Ok(GeocodeOutcome::Reported(coords)),
            None => {
                tracing::debug!(address = %address, "dadata: no coordinates in cleaned record");
                Ok(GeocodeOutcome::Unresolved(address))
            }
        }
    }
}
