use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use weather_core::cep::{Cep, CepError};

use crate::client::{ForwardError, OrchestratorClient};

/// Fixed outward message for internal failures; cause detail stays in the
/// logs.
const INTERNAL_ERROR_MESSAGE: &str = "error processing request";

#[derive(Debug)]
pub struct AppState {
    pub orchestrator: OrchestratorClient,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/weather-by-cep", post(weather_by_cep))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherByCepRequest {
    #[serde(default)]
    cep: String,
}

#[tracing::instrument(skip_all)]
async fn weather_by_cep(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WeatherByCepRequest>, JsonRejection>,
) -> Response {
    // Any body problem (absent, malformed, wrong content type) is the
    // caller's fault.
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    let cep = match Cep::parse(&request.cep) {
        Ok(cep) => cep,
        Err(error) => {
            let status = match error {
                CepError::Missing => StatusCode::BAD_REQUEST,
                CepError::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
            };
            return (status, error.to_string()).into_response();
        }
    };

    match state.orchestrator.fetch_weather(&cep).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(ForwardError::NotFound) => {
            (StatusCode::NOT_FOUND, ForwardError::NotFound.to_string()).into_response()
        }
        Err(ForwardError::Upstream(status)) => {
            (status, ForwardError::Upstream(status).to_string()).into_response()
        }
        Err(ForwardError::Internal) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}
