//! geocoder-proxy - address geocoding over three third-party providers
//!
//! This is the composition root that wires together all the components.

use geocoder_proxy::adapters::inbound::ApiServer;
use geocoder_proxy::adapters::outbound::{
    ArcgisHttpGeocoder, DadataCleanerFactory, YandexHttpGeocoder,
};
use geocoder_proxy::application::GeocodeService;
use geocoder_proxy::config::load_config;
use geocoder_proxy::infrastructure::{build_http_client, HttpClientConfig};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    tracing::info!(
        "starting geocoder-proxy listen={} timeout={}s threshold={}",
        cfg.listen_addr,
        cfg.request_timeout_secs,
        cfg.similarity_threshold
    );
    tracing::warn!("provider credentials arrive as plain query parameters; do not expose this service without TLS termination in front");

    // ===== COMPOSITION ROOT =====

    // 1. Shared outbound HTTP client (connection pool only, no credentials)
    let http = build_http_client(&HttpClientConfig::with_timeout(Duration::from_secs(
        cfg.request_timeout_secs,
    )))?;

    // 2. Outbound adapters
    let yandex = Arc::new(YandexHttpGeocoder::new(http.clone(), cfg.yandex_url.clone()));
    let arcgis = Arc::new(ArcgisHttpGeocoder::new(http.clone(), cfg.arcgis_url.clone()));
    let dadata = Arc::new(DadataCleanerFactory::new(http, cfg.dadata_url.clone()));

    // 3. Application service
    let service = Arc::new(
        GeocodeService::new(yandex, arcgis, dadata)
            .with_similarity_threshold(cfg.similarity_threshold),
    );

    // 4. Inbound adapter
    let server = ApiServer::new(cfg.listen_addr, service);

    server.run().await
}
