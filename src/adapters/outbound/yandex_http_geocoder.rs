//! Yandex HTTP Geocoder
//!
//! Implements YandexGeocoder against the Yandex Geocoder HTTP API
//! (`/1.x/?apikey=..&geocode=..&format=json`).

use crate::domain::ports::{ProviderError, YandexGeocoder};
use crate::domain::value_objects::{Address, Credentials};
use async_trait::async_trait;
use serde::Deserialize;

/// Public Yandex geocoder endpoint.
pub const DEFAULT_YANDEX_URL: &str = "https://geocode-maps.yandex.ru/1.x/";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: FeatureCollection,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

/// Yandex geocoder over HTTP.
///
/// Holds no credentials; the caller's API key is attached per call.
pub struct YandexHttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl YandexHttpGeocoder {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl YandexGeocoder for YandexHttpGeocoder {
    async fn first_position(
        &self,
        credentials: &Credentials,
        address: &Address,
    ) -> Result<Option<String>, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("apikey", credentials.api_token()),
                ("geocode", address.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("yandex geocoder returned {}", status);
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: GeocodeResponse = response.json().await?;
        Ok(body
            .response
            .collection
            .members
            .into_iter()
            .next()
            .map(|member| member.geo_object.point.pos))
    }
}
