//! Dadata Address Cleaner
//!
//! Implements AddressCleaner with the Dadata "clean address" API. A
//! cleaner is bound to the caller's token/secret pair and is built fresh
//! for each request by [`DadataCleanerFactory`].

use crate::domain::entities::CleanedAddress;
use crate::domain::ports::{AddressCleaner, AddressCleanerFactory, ProviderError};
use crate::domain::value_objects::{Address, Credentials};
use async_trait::async_trait;

/// Public Dadata clean-address endpoint.
pub const DEFAULT_DADATA_URL: &str = "https://cleaner.dadata.ru/api/v1/clean/address";

/// Credentialed Dadata client for a single request.
pub struct DadataCleaner {
    client: reqwest::Client,
    url: String,
    credentials: Credentials,
}

impl DadataCleaner {
    pub fn new(client: reqwest::Client, url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client,
            url: url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl AddressCleaner for DadataCleaner {
    async fn clean(&self, address: &Address) -> Result<Option<CleanedAddress>, ProviderError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Token {}", self.credentials.api_token()))
            .json(&[address.as_str()]);
        if let Some(secret) = self.credentials.secret() {
            request = request.header("X-Secret", secret);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("dadata cleaner returned {}", status);
            return Err(ProviderError::Status(status.as_u16()));
        }

        let records: Vec<CleanedAddress> = response.json().await?;
        Ok(records.into_iter().next())
    }
}

/// Builds [`DadataCleaner`]s that share one connection pool.
#[derive(Clone)]
pub struct DadataCleanerFactory {
    client: reqwest::Client,
    url: String,
}

impl DadataCleanerFactory {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl AddressCleanerFactory for DadataCleanerFactory {
    fn connect(&self, credentials: Credentials) -> Box<dyn AddressCleaner> {
        Box::new(DadataCleaner::new(
            self.client.clone(),
            self.url.clone(),
            credentials,
        ))
    }
}
