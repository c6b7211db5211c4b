mod arcgis_http_geocoder;
mod dadata_cleaner;
mod yandex_http_geocoder;

pub use arcgis_http_geocoder::{ArcgisHttpGeocoder, DEFAULT_ARCGIS_URL};
pub use dadata_cleaner::{DadataCleaner, DadataCleanerFactory, DEFAULT_DADATA_URL};
pub use yandex_http_geocoder::{YandexHttpGeocoder, DEFAULT_YANDEX_URL};
