//! Address Cleaner Port
//!
//! Defines the interface to the regional address-cleaning service.
//! Unlike the geocoders, a cleaner is bound to one set of caller
//! credentials and must not outlive the request it was created for.

use crate::domain::entities::CleanedAddress;
use crate::domain::ports::ProviderError;
use crate::domain::value_objects::{Address, Credentials};
use async_trait::async_trait;

/// A credentialed address-cleaning client.
#[async_trait]
pub trait AddressCleaner: Send + Sync {
    /// Clean one address. `None` means the provider returned no record.
    async fn clean(&self, address: &Address) -> Result<Option<CleanedAddress>, ProviderError>;
}

/// Builds a fresh [`AddressCleaner`] per request.
///
/// Implementations may share a connection pool but never credentials.
pub trait AddressCleanerFactory: Send + Sync {
    fn connect(&self, credentials: Credentials) -> Box<dyn AddressCleaner>;
}
