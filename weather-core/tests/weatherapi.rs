//! Integration tests for `WeatherApiClient` against a mock HTTP server,
//! including the credential-redaction invariant on recorded span fields.

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use weather_core::resolver::{ResolveError, WeatherApiClient, WeatherResolver};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "super-secret-key";

fn client(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::new(API_KEY.to_owned(), server.uri())
}

/// Collects every span/event field value recorded while it is installed.
#[derive(Clone, Default)]
struct RecordingLayer {
    values: Arc<Mutex<Vec<String>>>,
}

impl RecordingLayer {
    fn joined(&self) -> String {
        self.values.lock().expect("recording lock must not be poisoned").join("\n")
    }
}

struct Collector<'a> {
    out: &'a Mutex<Vec<String>>,
}

impl Visit for Collector<'_> {
    fn record_debug(&mut self, _field: &Field, value: &dyn std::fmt::Debug) {
        self.out.lock().expect("recording lock must not be poisoned").push(format!("{value:?}"));
    }

    fn record_str(&mut self, _field: &Field, value: &str) {
        self.out.lock().expect("recording lock must not be poisoned").push(value.to_owned());
    }
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        attrs.record(&mut Collector { out: &self.values });
    }

    fn on_record(
        &self,
        _id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: Context<'_, S>,
    ) {
        values.record(&mut Collector { out: &self.values });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        event.record(&mut Collector { out: &self.values });
    }
}

fn install_recorder() -> (RecordingLayer, tracing::subscriber::DefaultGuard) {
    let layer = RecordingLayer::default();
    let guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(layer.clone()));
    (layer, guard)
}

#[tokio::test]
async fn resolves_city_to_current_weather() {
    let server = MockServer::start().await;

    // The real network request must carry the unredacted key.
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", API_KEY))
        .and(query_param("q", "São Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": { "temp_c": 25.5, "temp_f": 77.9 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let weather = client(&server).resolve("São Paulo").await.expect("lookup must succeed");
    assert_eq!(weather.temp_c, 25.5);
    assert_eq!(weather.temp_f, 77.9);
}

#[tokio::test]
async fn non_ok_status_is_not_found() {
    for status in [400, 403, 500] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client(&server).resolve("São Paulo").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound, "status: {status}");
    }
}

#[tokio::test]
async fn undecodable_payload_is_internal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).resolve("São Paulo").await.unwrap_err();
    assert_eq!(err, ResolveError::Internal);
}

#[tokio::test]
async fn transport_failure_is_internal() {
    let client = WeatherApiClient::new(API_KEY.to_owned(), "http://127.0.0.1:1");
    let err = client.resolve("São Paulo").await.unwrap_err();
    assert_eq!(err, ResolveError::Internal);
}

#[tokio::test]
async fn recorded_fields_never_contain_the_api_key_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": { "temp_c": 19.0, "temp_f": 66.2 },
        })))
        .mount(&server)
        .await;

    let (recorder, _guard) = install_recorder();
    client(&server).resolve("Curitiba").await.expect("lookup must succeed");

    let recorded = recorder.joined();
    assert!(!recorded.contains(API_KEY), "recorded fields leak the key:\n{recorded}");
    assert!(recorded.contains("key=***"), "masked URL missing from fields:\n{recorded}");
}

#[tokio::test]
async fn recorded_fields_never_contain_the_api_key_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (recorder, _guard) = install_recorder();
    let err = client(&server).resolve("Curitiba").await.unwrap_err();
    assert_eq!(err, ResolveError::NotFound);

    let recorded = recorder.joined();
    assert!(!recorded.contains(API_KEY), "recorded fields leak the key:\n{recorded}");
    assert!(recorded.contains("key=***"), "masked URL missing from fields:\n{recorded}");
}
