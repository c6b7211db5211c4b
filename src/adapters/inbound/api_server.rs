//! Geocoding API Server
//!
//! HTTP surface of the service: three GET endpoints, one per provider,
//! plus a health check. Query parameters are validated here; a request
//! with missing or blank required fields never reaches a provider.

use crate::application::GeocodeService;
use crate::domain::entities::GeocodeOutcome;
use crate::domain::ports::ProviderError;
use crate::domain::value_objects::{Address, Credentials};
use crate::infrastructure::shutdown_signal;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

const MISSING_FIELD: &str = "Missing data for required field.";
const BLANK_FIELD: &str = "Field may not be blank.";

/// Query parameters of `GET /yandex`.
#[derive(Debug, Default, Deserialize)]
pub struct YandexQuery {
    pub token: Option<String>,
    pub address: Option<String>,
}

/// Query parameters of `GET /arcgis`.
#[derive(Debug, Default, Deserialize)]
pub struct ArcgisQuery {
    pub address: Option<String>,
}

/// Query parameters of `GET /dadata`.
#[derive(Debug, Default, Deserialize)]
pub struct DadataQuery {
    pub token: Option<String>,
    pub secret: Option<String>,
    pub address: Option<String>,
}

/// Field-level validation errors for the query string.
///
/// Rendered as `422 {"errors": {"query": {"<field>": ["<message>"]}}}`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Take a required free-text field, recording an error if absent or blank.
    fn require(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.add(field, MISSING_FIELD);
                None
            }
            Some(v) if v.trim().is_empty() => {
                self.add(field, BLANK_FIELD);
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Take the address field; blank means nothing survives normalization.
    fn require_address(&mut self, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.add("address", MISSING_FIELD);
                None
            }
            Some(v) if Address::normalize(&v).is_empty() => {
                self.add("address", BLANK_FIELD);
                None
            }
            Some(v) => Some(v),
        }
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(v) if self.is_empty() => Ok(v),
            _ => Err(self),
        }
    }
}

impl From<QueryRejection> for ValidationErrors {
    fn from(rejection: QueryRejection) -> Self {
        let mut errors = Self::default();
        errors.add("_schema", &rejection.body_text());
        errors
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "errors": { "query": self.fields }
        });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

impl YandexQuery {
    pub fn validate(self) -> Result<(Credentials, String), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let token = errors.require("token", self.token);
        let address = errors.require_address(self.address);
        let pair = token.zip(address).map(|(t, a)| (Credentials::token(t), a));
        errors.into_result(pair)
    }
}

impl ArcgisQuery {
    pub fn validate(self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let address = errors.require_address(self.address);
        errors.into_result(address)
    }
}

impl DadataQuery {
    pub fn validate(self) -> Result<(Credentials, String), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let token = errors.require("token", self.token);
        let secret = errors.require("secret", self.secret);
        let address = errors.require_address(self.address);
        let triple = match (token, secret, address) {
            (Some(t), Some(s), Some(a)) => Some((Credentials::with_secret(t, s), a)),
            _ => None,
        };
        errors.into_result(triple)
    }
}

/// Response body shared by all geocoding endpoints.
///
/// `status_code` is always an integer and always equals the HTTP status.
/// Coordinates are JSON numbers, except where the provider's text is
/// passed through, in which case they are JSON strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeocodeResponse {
    Located { status_code: u16, lat: f64, lon: f64 },
    Reported { status_code: u16, lat: String, lon: String },
    Failed { status_code: u16, error: String },
}

impl GeocodeResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Located { status_code, .. }
            | Self::Reported { status_code, .. }
            | Self::Failed { status_code, .. } => *status_code,
        }
    }

    fn provider_failure(err: &ProviderError) -> Self {
        Self::Failed {
            status_code: StatusCode::BAD_GATEWAY.as_u16(),
            error: format!("Provider error: {}", err),
        }
    }
}

impl From<GeocodeOutcome> for GeocodeResponse {
    fn from(outcome: GeocodeOutcome) -> Self {
        let status_code = outcome.status_code();
        match outcome {
            GeocodeOutcome::Located(coords) => Self::Located {
                status_code,
                lat: coords.lat,
                lon: coords.lon,
            },
            GeocodeOutcome::Reported(coords) => Self::Reported {
                status_code,
                lat: coords.lat,
                lon: coords.lon,
            },
            unresolved => Self::Failed {
                status_code,
                error: unresolved.error_message().unwrap_or_default(),
            },
        }
    }
}

impl IntoResponse for GeocodeResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<GeocodeService>,
}

impl ApiState {
    pub fn new(service: Arc<GeocodeService>) -> Self {
        Self { service }
    }
}

/// Build the HTTP router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/yandex", get(yandex_handler))
        .route("/arcgis", get(arcgis_handler))
        .route("/dadata", get(dadata_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Geocoding API server.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<GeocodeService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
        }
    }

    /// Run the API server until a shutdown signal arrives.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("geocoding API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("geocoding API stopped");
        Ok(())
    }
}

fn respond(provider: &str, result: Result<GeocodeOutcome, ProviderError>) -> GeocodeResponse {
    match result {
        Ok(outcome) => {
            tracing::info!(provider, located = outcome.is_located(), "geocode finished");
            outcome.into()
        }
        Err(err) => {
            tracing::warn!(provider, "geocode failed: {}", err);
            GeocodeResponse::provider_failure(&err)
        }
    }
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn yandex_handler(
    State(state): State<ApiState>,
    query: Result<Query<YandexQuery>, QueryRejection>,
) -> Result<GeocodeResponse, ValidationErrors> {
    let Query(query) = query?;
    let (credentials, address) = query.validate()?;
    let result = state.service.geocode_yandex(&credentials, &address).await;
    Ok(respond("yandex", result))
}

async fn arcgis_handler(
    State(state): State<ApiState>,
    query: Result<Query<ArcgisQuery>, QueryRejection>,
) -> Result<GeocodeResponse, ValidationErrors> {
    let Query(query) = query?;
    let address = query.validate()?;
    let result = state.service.geocode_arcgis(&address).await;
    Ok(respond("arcgis", result))
}

async fn dadata_handler(
    State(state): State<ApiState>,
    query: Result<Query<DadataQuery>, QueryRejection>,
) -> Result<GeocodeResponse, ValidationErrors> {
    let Query(query) = query?;
    let (credentials, address) = query.validate()?;
    let result = state.service.geocode_dadata(credentials, &address).await;
    Ok(respond("dadata", result))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::entities::{ArcgisCandidate, CleanedAddress};
    use crate::domain::ports::{
        AddressCleaner, AddressCleanerFactory, ArcgisGeocoder, YandexGeocoder,
    };
    use crate::domain::value_objects::{Coordinates, RawCoordinates};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    // ===== Mock Implementations =====

    #[derive(Default)]
    struct MockYandex {
        position: Option<String>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl YandexGeocoder for MockYandex {
        async fn first_position(
            &self,
            _credentials: &Credentials,
            _address: &Address,
        ) -> Result<Option<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status(403));
            }
            Ok(self.position.clone())
        }
    }

    #[derive(Default)]
    struct MockArcgis {
        candidate: Option<ArcgisCandidate>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArcgisGeocoder for MockArcgis {
        async fn geocode(
            &self,
            _address: &Address,
        ) -> Result<Option<ArcgisCandidate>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidate.clone())
        }
    }

    struct MockCleaner {
        record: Option<CleanedAddress>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AddressCleaner for MockCleaner {
        async fn clean(&self, _address: &Address) -> Result<Option<CleanedAddress>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    #[derive(Default)]
    struct MockCleanerFactory {
        record: Option<CleanedAddress>,
        connects: AtomicUsize,
        calls: Arc<AtomicUsize>,
    }

    impl AddressCleanerFactory for MockCleanerFactory {
        fn connect(&self, _credentials: Credentials) -> Box<dyn AddressCleaner> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Box::new(MockCleaner {
                record: self.record.clone(),
                calls: self.calls.clone(),
            })
        }
    }

    struct Mocks {
        yandex: Arc<MockYandex>,
        arcgis: Arc<MockArcgis>,
        dadata: Arc<MockCleanerFactory>,
    }

    impl Default for Mocks {
        fn default() -> Self {
            Self {
                yandex: Arc::new(MockYandex::default()),
                arcgis: Arc::new(MockArcgis::default()),
                dadata: Arc::new(MockCleanerFactory::default()),
            }
        }
    }

    impl Mocks {
        fn app(&self) -> Router {
            let service = GeocodeService::new(
                self.yandex.clone(),
                self.arcgis.clone(),
                self.dadata.clone(),
            );
            router(ApiState::new(Arc::new(service)))
        }

        fn total_calls(&self) -> usize {
            self.yandex.calls.load(Ordering::SeqCst)
                + self.arcgis.calls.load(Ordering::SeqCst)
                + self.dadata.connects.load(Ordering::SeqCst)
                + self.dadata.calls.load(Ordering::SeqCst)
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    // ===== Health =====

    #[tokio::test]
    async fn test_health_handler() {
        let (status, body) = get_json(Mocks::default().app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    // ===== Validation =====

    #[tokio::test]
    async fn test_yandex_missing_token_is_validation_error() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/yandex?address=Moscow").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"errors": {"query": {"token": ["Missing data for required field."]}}})
        );
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_yandex_missing_everything_lists_all_fields() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/yandex").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["query"]["token"].is_array());
        assert!(body["errors"]["query"]["address"].is_array());
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_arcgis_missing_address_is_validation_error() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/arcgis").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["errors"]["query"]["address"][0],
            "Missing data for required field."
        );
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_dadata_missing_secret_is_validation_error() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/dadata?token=t&address=Moscow").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"errors": {"query": {"secret": ["Missing data for required field."]}}})
        );
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_address_is_validation_error() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/arcgis?address=%20%22%2F%20").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["errors"]["query"]["address"][0],
            "Field may not be blank."
        );
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_token_is_validation_error() {
        let mocks = Mocks::default();
        let (status, body) = get_json(mocks.app(), "/yandex?token=&address=Moscow").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["query"]["token"][0], "Field may not be blank.");
        assert_eq!(mocks.total_calls(), 0);
    }

    #[test]
    fn test_dadata_query_validate() {
        let query = DadataQuery {
            token: Some("t".to_string()),
            secret: Some("s".to_string()),
            address: Some("a".to_string()),
        };
        let (creds, address) = query.validate().unwrap();
        assert_eq!(creds, Credentials::with_secret("t", "s"));
        assert_eq!(address, "a");

        let errors = DadataQuery::default().validate().unwrap_err();
        assert_eq!(errors.messages("token").unwrap().len(), 1);
        assert_eq!(errors.messages("secret").unwrap().len(), 1);
        assert_eq!(errors.messages("address").unwrap().len(), 1);
    }

    // ===== Yandex =====

    #[tokio::test]
    async fn test_yandex_success() {
        let mocks = Mocks {
            yandex: Arc::new(MockYandex {
                position: Some("37.617698 55.755864".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) = get_json(mocks.app(), "/yandex?token=k&address=Moscow").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status_code": 200, "lat": 55.755864, "lon": 37.617698})
        );
        assert_eq!(mocks.yandex.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_yandex_no_features() {
        let mocks = Mocks::default();
        let (status, body) =
            get_json(mocks.app(), "/yandex?token=k&address=%20Nowhere%20%20land%0A").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"status_code": 400, "error": "Cannot geocode: Nowhere land"})
        );
    }

    #[tokio::test]
    async fn test_yandex_provider_failure_is_bad_gateway() {
        let mocks = Mocks {
            yandex: Arc::new(MockYandex {
                fail: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) = get_json(mocks.app(), "/yandex?token=bad&address=Moscow").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status_code"], 502);
        assert_eq!(body["error"], "Provider error: provider returned status 403");
    }

    // ===== ArcGIS =====

    #[tokio::test]
    async fn test_arcgis_success_rounded() {
        let mocks = Mocks {
            arcgis: Arc::new(MockArcgis {
                candidate: Some(ArcgisCandidate {
                    address: "Moscow, Russia".to_string(),
                    location: Coordinates::new(55.1234567, 37.7654321),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) = get_json(mocks.app(), "/arcgis?address=Moscow").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status_code": 200, "lat": 55.123457, "lon": 37.765432})
        );
    }

    #[tokio::test]
    async fn test_arcgis_low_similarity() {
        let mocks = Mocks {
            arcgis: Arc::new(MockArcgis {
                candidate: Some(ArcgisCandidate {
                    address: "Qwxz Jkvq Plaza".to_string(),
                    location: Coordinates::new(1.0, 2.0),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) =
            get_json(mocks.app(), "/arcgis?address=Moscow,%20Tverskaya%201").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"status_code": 400, "error": "Cannot geocode: Moscow, Tverskaya 1"})
        );
    }

    // ===== Dadata =====

    #[tokio::test]
    async fn test_dadata_success() {
        let mocks = Mocks {
            dadata: Arc::new(MockCleanerFactory {
                record: Some(CleanedAddress {
                    result: None,
                    geo_lat: Some("55.8782557".to_string()),
                    geo_lon: Some("37.65372".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) =
            get_json(mocks.app(), "/dadata?token=t&secret=s&address=Moscow").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status_code": 200, "lat": "55.8782557", "lon": "37.65372"})
        );
        assert_eq!(mocks.dadata.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dadata_coordinates_returned_verbatim() {
        let mocks = Mocks {
            dadata: Arc::new(MockCleanerFactory {
                record: Some(CleanedAddress {
                    result: None,
                    geo_lat: Some("55.70".to_string()),
                    geo_lon: Some("37.600000".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) =
            get_json(mocks.app(), "/dadata?token=t&secret=s&address=Moscow").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status_code": 200, "lat": "55.70", "lon": "37.600000"})
        );
    }

    #[tokio::test]
    async fn test_dadata_null_coordinates() {
        let mocks = Mocks {
            dadata: Arc::new(MockCleanerFactory {
                record: Some(CleanedAddress::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (status, body) =
            get_json(mocks.app(), "/dadata?token=t&secret=s&address=nowhere").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"status_code": 400, "error": "Cannot geocode: nowhere"})
        );
    }

    // ===== Response shape =====

    #[test]
    fn test_response_from_outcome() {
        let located: GeocodeResponse =
            GeocodeOutcome::Located(Coordinates::new(1.5, 2.5)).into();
        assert_eq!(
            serde_json::to_value(&located).unwrap(),
            json!({"status_code": 200, "lat": 1.5, "lon": 2.5})
        );

        let reported: GeocodeResponse =
            GeocodeOutcome::Reported(RawCoordinates::new("1.50", "2.5")).into();
        assert_eq!(reported.status_code(), 200);
        assert_eq!(
            serde_json::to_value(&reported).unwrap(),
            json!({"status_code": 200, "lat": "1.50", "lon": "2.5"})
        );

        let failed: GeocodeResponse =
            GeocodeOutcome::Unresolved(Address::normalize("x")).into();
        assert_eq!(failed.status_code(), 400);
    }

    #[test]
    fn test_provider_failure_response() {
        let resp = GeocodeResponse::provider_failure(&ProviderError::Transport("timeout".into()));
        assert_eq!(resp.status_code(), 502);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"status_code": 502, "error": "Provider error: request failed: timeout"})
        );
    }
}
