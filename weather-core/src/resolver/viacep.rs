use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::Instrument;

use crate::cep::Cep;
use crate::model::Address;
use crate::transport::{HttpSend, instrumented_sender};

use super::{AddressResolver, ResolveError};

pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the ViaCEP address-lookup API.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    http: Client,
    transport: Arc<dyn HttpSend>,
}

/// Upstream payload. ViaCEP signals an unknown CEP either with a non-2xx
/// status or with a 2xx body carrying `erro: true`; in the latter case the
/// remaining fields are absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepPayload {
    cep: String,
    logradouro: String,
    localidade: String,
    uf: String,
    erro: bool,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http.clone(),
            transport: instrumented_sender(http),
        }
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new(DEFAULT_VIACEP_BASE_URL)
    }
}

#[async_trait]
impl AddressResolver for ViaCepClient {
    async fn resolve(&self, cep: &Cep) -> Result<Address, ResolveError> {
        let span = tracing::info_span!("find_address_by_cep", cep.value = %cep);

        async {
            let url = format!("{}/ws/{}/json/", self.base_url, cep);

            let request = self.http.get(&url).build().map_err(|error| {
                tracing::error!(error = %error, "failed to build ViaCEP request");
                ResolveError::Internal
            })?;

            let response = self.transport.send(request).await.map_err(|error| {
                tracing::error!(error = %error, "error requesting from ViaCEP API");
                ResolveError::Internal
            })?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(status = %status, "ViaCEP API returned non-OK status");
                return Err(ResolveError::NotFound);
            }

            let payload: ViaCepPayload = response.json().await.map_err(|error| {
                tracing::error!(error = %error, "error decoding ViaCEP API response");
                ResolveError::Internal
            })?;

            if payload.erro {
                tracing::warn!("ViaCEP API response indicates CEP not found (erro=true)");
                return Err(ResolveError::NotFound);
            }

            Ok(Address {
                cep: payload.cep,
                street: payload.logradouro,
                city: payload.localidade,
                state: payload.uf,
            })
        }
        .instrument(span)
        .await
    }
}
