use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::Instrument;

use crate::model::CurrentWeather;
use crate::transport::{HttpSend, instrumented_sender};

use super::{ResolveError, WeatherResolver};

pub const DEFAULT_WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the WeatherAPI.com current-conditions endpoint.
///
/// The API key travels as a query parameter; the transport stack masks it
/// before anything is recorded on a span, so the literal value never shows
/// up in trace attributes or log lines.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
    transport: Arc<dyn HttpSend>,
}

#[derive(Debug, Deserialize)]
struct WeatherApiPayload {
    current: CurrentPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    temp_c: f64,
    temp_f: f64,
}

impl WeatherApiClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http.clone(),
            transport: instrumented_sender(http),
        }
    }
}

#[async_trait]
impl WeatherResolver for WeatherApiClient {
    async fn resolve(&self, city: &str) -> Result<CurrentWeather, ResolveError> {
        let span = tracing::info_span!("find_temperature_by_city", city.name = %city);

        async {
            let url = format!("{}/current.json", self.base_url);

            let request = self
                .http
                .get(&url)
                .query(&[("key", self.api_key.as_str()), ("q", city)])
                .build()
                .map_err(|error| {
                    tracing::error!(error = %error.without_url(), "failed to build WeatherAPI request");
                    ResolveError::Internal
                })?;

            let response = self.transport.send(request).await.map_err(|error| {
                tracing::error!(error = %error.without_url(), "error requesting from WeatherAPI");
                ResolveError::Internal
            })?;

            let status = response.status();
            if !status.is_success() {
                // Every non-2xx maps to not-found, rate limits and upstream
                // 5xx included.
                tracing::warn!(status = %status, "WeatherAPI returned non-OK status");
                return Err(ResolveError::NotFound);
            }

            let payload: WeatherApiPayload = response.json().await.map_err(|error| {
                tracing::error!(error = %error.without_url(), "error decoding WeatherAPI response");
                ResolveError::Internal
            })?;

            Ok(CurrentWeather {
                temp_c: payload.current.temp_c,
                temp_f: payload.current.temp_f,
            })
        }
        .instrument(span)
        .await
    }
}
