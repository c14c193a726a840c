use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::Instrument;

use weather_core::cep::Cep;
use weather_core::model::WeatherReport;
use weather_core::transport::{HttpSend, header_logging_sender};

/// Overall bound on the outbound client; wraps the per-call timeout below.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure classes of a forwarded lookup, from the edge's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    #[error("can not find zipcode")]
    NotFound,
    #[error("error on find weather in orchestrator service")]
    Upstream(StatusCode),
    #[error("internal forwarding error")]
    Internal,
}

/// Client for the orchestrator's weather-by-CEP endpoint.
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    base_url: String,
    http: Client,
    transport: Arc<dyn HttpSend>,
}

impl OrchestratorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http.clone(),
            transport: header_logging_sender(http),
        }
    }

    /// Forwards the lookup and translates the downstream status: 404 stays
    /// not-found, any other ≥400 keeps its status, transport and decode
    /// failures are internal.
    pub async fn fetch_weather(&self, cep: &Cep) -> Result<WeatherReport, ForwardError> {
        let span = tracing::info_span!("fetch_weather_by_cep", cep.value = %cep);

        async {
            let url = format!("{}/get-weather-by-cep", self.base_url);

            let request = self
                .http
                .get(&url)
                .query(&[("cep", cep.as_str())])
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|error| {
                    tracing::error!(error = %error, "failed to build orchestrator request");
                    ForwardError::Internal
                })?;

            let response = self.transport.send(request).await.map_err(|error| {
                tracing::error!(error = %error, "error requesting from orchestrator service");
                ForwardError::Internal
            })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(ForwardError::NotFound);
            }
            if status.is_client_error() || status.is_server_error() {
                tracing::warn!(status = %status, "orchestrator returned error status");
                return Err(ForwardError::Upstream(status));
            }

            response.json().await.map_err(|error| {
                tracing::error!(error = %error, "error decoding orchestrator response");
                ForwardError::Internal
            })
        }
        .instrument(span)
        .await
    }
}
