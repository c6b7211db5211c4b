//! ArcGIS Geocoder Port
//!
//! Defines the interface to the anonymous ArcGIS world geocoder.

use crate::domain::entities::ArcgisCandidate;
use crate::domain::ports::ProviderError;
use crate::domain::value_objects::Address;
use async_trait::async_trait;

/// Forward geocoder returning the single best candidate.
#[async_trait]
pub trait ArcgisGeocoder: Send + Sync {
    /// Returns `None` when the provider has no candidate for the address.
    async fn geocode(&self, address: &Address) -> Result<Option<ArcgisCandidate>, ProviderError>;
}
