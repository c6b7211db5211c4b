//! Yandex Geocoder Port
//!
//! Defines the interface to the commercial mapping API geocoder.

use crate::domain::ports::ProviderError;
use crate::domain::value_objects::{Address, Credentials};
use async_trait::async_trait;

/// Forward geocoder authenticated by a caller-supplied API key.
///
/// This is an outbound port. The adapter is process-wide and stateless;
/// the key travels with every call.
#[async_trait]
pub trait YandexGeocoder: Send + Sync {
    /// Geocode an address.
    ///
    /// Returns the `"lon lat"` point string of the first feature, or
    /// `None` if the feature collection is empty.
    async fn first_position(
        &self,
        credentials: &Credentials,
        address: &Address,
    ) -> Result<Option<String>, ProviderError>;
}
