//! geocoder-proxy Library
//!
//! This module exposes the geocoding proxy components for use in
//! integration tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::GeocodeService;
pub use config::load_config;
pub use domain::entities::{ArcgisCandidate, CleanedAddress, GeocodeOutcome};
pub use domain::ports::{
    AddressCleaner, AddressCleanerFactory, ArcgisGeocoder, ProviderError, YandexGeocoder,
};
pub use domain::services::{normalize_address, BigramCosine};
pub use domain::value_objects::{Address, Coordinates, Credentials, RawCoordinates};
