mod address_cleaner;
mod arcgis_geocoder;
mod provider_error;
mod yandex_geocoder;

pub use address_cleaner::{AddressCleaner, AddressCleanerFactory};
pub use arcgis_geocoder::ArcgisGeocoder;
pub use provider_error::ProviderError;
pub use yandex_geocoder::YandexGeocoder;
