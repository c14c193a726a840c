use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use weather_core::cep::{Cep, CepError};
use weather_core::model::WeatherReport;
use weather_core::resolver::{AddressResolver, ResolveError, WeatherResolver};

/// Fixed outward message for every internal failure; cause detail stays in
/// the logs.
const INTERNAL_ERROR_MESSAGE: &str = "error processing request";

const NOT_FOUND_MESSAGE: &str = "can not find zipcode";

/// Shared handler state: the two resolver seams, injected at startup.
#[derive(Debug)]
pub struct AppState {
    pub address: Arc<dyn AddressResolver>,
    pub weather: Arc<dyn WeatherResolver>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-weather-by-cep", get(get_weather_by_cep))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    cep: Option<String>,
}

#[tracing::instrument(skip_all)]
async fn get_weather_by_cep(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Response {
    let cep = match Cep::parse(query.cep.as_deref().unwrap_or_default()) {
        Ok(cep) => cep,
        Err(error) => {
            let status = match error {
                CepError::Missing => StatusCode::BAD_REQUEST,
                CepError::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
            };
            return (status, error.to_string()).into_response();
        }
    };

    let address = match state.address.resolve(&cep).await {
        Ok(address) => address,
        Err(ResolveError::NotFound) => {
            return (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response();
        }
        Err(error) => {
            tracing::error!(cep = %cep, error = %error, "address lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response();
        }
    };

    // A resolved city is assumed valid, so every weather-side failure is an
    // internal error rather than a not-found.
    let weather = match state.weather.resolve(&address.city).await {
        Ok(weather) => weather,
        Err(error) => {
            tracing::error!(city = %address.city, error = %error, "temperature lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response();
        }
    };

    let report = WeatherReport::new(address.city, &weather);
    (StatusCode::OK, Json(report)).into_response()
}
