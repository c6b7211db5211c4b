use crate::adapters::outbound::{DEFAULT_ARCGIS_URL, DEFAULT_DADATA_URL, DEFAULT_YANDEX_URL};
use crate::application::DEFAULT_SIMILARITY_THRESHOLD;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP API
    pub listen_addr: String,
    pub debug: bool,

    // Provider endpoints
    pub yandex_url: String,
    pub arcgis_url: String,
    pub dadata_url: String,

    // Outbound calls
    pub request_timeout_secs: u64,

    // ArcGIS confidence gate
    pub similarity_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5001".to_string(),
            debug: false,
            yandex_url: DEFAULT_YANDEX_URL.to_string(),
            arcgis_url: DEFAULT_ARCGIS_URL.to_string(),
            dadata_url: DEFAULT_DADATA_URL.to_string(),
            request_timeout_secs: 30,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let defaults = Config::default();

    let listen_addr = std::env::var("GEOCODER_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

    // presence flag: any value, even "0", turns debug logging on
    let debug = std::env::var("DEBUG").is_ok();

    let yandex_url = std::env::var("GEOCODER_YANDEX_URL").unwrap_or(defaults.yandex_url);
    let arcgis_url = std::env::var("GEOCODER_ARCGIS_URL").unwrap_or(defaults.arcgis_url);
    let dadata_url = std::env::var("GEOCODER_DADATA_URL").unwrap_or(defaults.dadata_url);

    let request_timeout_secs = std::env::var("GEOCODER_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&secs: &u64| secs > 0)
        .unwrap_or(defaults.request_timeout_secs);

    let similarity_threshold = std::env::var("GEOCODER_SIMILARITY_THRESHOLD")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|t: &f64| (0.0..=1.0).contains(t))
        .unwrap_or(defaults.similarity_threshold);

    Ok(Config {
        listen_addr,
        debug,
        yandex_url,
        arcgis_url,
        dadata_url,
        request_timeout_secs,
        similarity_threshold,
    })
}
