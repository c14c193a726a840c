//! Outbound HTTP transport, decorated.
//!
//! [`HttpSend`] is the single capability "send an HTTP request, get a
//! response". [`ReqwestSender`] performs the real network call; the other
//! senders wrap it to add credential redaction, header logging, or span
//! creation. Composition order is fixed: real transport innermost, then
//! redaction, then generic instrumentation outermost.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Request, Response, Url};
use tracing::{Instrument, field};

/// Query parameter holding the upstream credential.
const CREDENTIAL_PARAM: &str = "key";

/// Replacement token recorded in place of the credential value.
const CREDENTIAL_MASK: &str = "***";

#[async_trait]
pub trait HttpSend: Send + Sync + Debug {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error>;
}

/// The real transport.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    http: Client,
}

impl ReqwestSender {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.http.execute(request).await
    }
}

/// Records the outbound URL on the active span, masking the credential query
/// parameter first. The unredacted request is forwarded to the network; only
/// the recorded attribute is sanitized.
#[derive(Debug)]
pub struct RedactSender {
    next: Arc<dyn HttpSend>,
}

impl RedactSender {
    pub fn new(next: Arc<dyn HttpSend>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl HttpSend for RedactSender {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        tracing::Span::current().record("url.full", field::display(sanitized_url(request.url())));
        self.next.send(request).await
    }
}

/// Debug-logs outbound request headers before forwarding.
#[derive(Debug)]
pub struct HeaderLogSender {
    next: Arc<dyn HttpSend>,
}

impl HeaderLogSender {
    pub fn new(next: Arc<dyn HttpSend>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl HttpSend for HeaderLogSender {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        for (name, value) in request.headers() {
            tracing::debug!(header = %name, value = ?value, "outbound request header");
        }
        self.next.send(request).await
    }
}

/// Outermost decorator: one `http_request` span per call, with the response
/// status recorded on completion. The URL attribute is left empty here and
/// filled by [`RedactSender`], so the raw credential never reaches the span.
#[derive(Debug)]
pub struct TraceSender {
    next: Arc<dyn HttpSend>,
}

impl TraceSender {
    pub fn new(next: Arc<dyn HttpSend>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl HttpSend for TraceSender {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        let span = tracing::info_span!(
            "http_request",
            http.request.method = %request.method(),
            server.address = request.url().host_str().unwrap_or_default(),
            url.full = field::Empty,
            http.response.status_code = field::Empty,
        );

        async {
            match self.next.send(request).await {
                Ok(response) => {
                    tracing::Span::current().record(
                        "http.response.status_code",
                        u64::from(response.status().as_u16()),
                    );
                    Ok(response)
                }
                Err(error) => {
                    // reqwest renders the full request URL (credential
                    // included) in its error messages; strip it before the
                    // error is logged or propagated.
                    let error = error.without_url();
                    tracing::error!(error = %error, "outbound request failed");
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Standard sender stack for upstream clients: real transport, redaction,
/// instrumentation.
pub fn instrumented_sender(http: Client) -> Arc<dyn HttpSend> {
    Arc::new(TraceSender::new(Arc::new(RedactSender::new(Arc::new(ReqwestSender::new(http))))))
}

/// Sender stack for the edge's orchestrator client: additionally logs
/// outbound headers between the real transport and the redaction layer.
pub fn header_logging_sender(http: Client) -> Arc<dyn HttpSend> {
    Arc::new(TraceSender::new(Arc::new(RedactSender::new(Arc::new(HeaderLogSender::new(
        Arc::new(ReqwestSender::new(http)),
    ))))))
}

fn sanitized_url(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| name == CREDENTIAL_PARAM) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == CREDENTIAL_PARAM {
                CREDENTIAL_MASK.to_owned()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_param_is_masked() {
        let url = Url::parse("https://api.weatherapi.com/v1/current.json?key=s3cr3t&q=Recife")
            .expect("url must parse");

        let sanitized = sanitized_url(&url);
        assert!(!sanitized.contains("s3cr3t"));
        assert!(sanitized.contains("key=***"));
        assert!(sanitized.contains("q=Recife"));
    }

    #[test]
    fn url_without_credential_is_untouched() {
        let url = Url::parse("https://viacep.com.br/ws/01001-000/json/?foo=bar")
            .expect("url must parse");

        assert_eq!(sanitized_url(&url), url.to_string());
    }

    #[test]
    fn all_credential_occurrences_are_masked() {
        let url = Url::parse("https://api.weatherapi.com/v1/current.json?key=one&q=Natal&key=two")
            .expect("url must parse");

        let sanitized = sanitized_url(&url);
        assert!(!sanitized.contains("one"));
        assert!(!sanitized.contains("two"));
        assert_eq!(sanitized.matches("key=***").count(), 2);
    }
}
