//! Application Layer
//!
//! Use cases that orchestrate domain logic through the outbound ports.

mod geocode_service;

pub use geocode_service::{GeocodeService, ARCGIS_PRECISION, DEFAULT_SIMILARITY_THRESHOLD};
