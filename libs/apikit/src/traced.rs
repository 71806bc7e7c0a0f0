//! Traced HTTP client
//!
//! Wraps `reqwest::Client` so every outgoing request gets its own span and a
//! `traceparent` header for correlation on the server side.

use crate::trace_context;
use tracing::{field, Instrument, Level};

/// A `reqwest::Client` wrapper that records an `outgoing_http` span per
/// request and injects trace context headers.
#[derive(Clone, Debug)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = field::Empty,
            error = field::Empty,
            trace_id = field::Empty,
            otel.kind = "client",
        );

        trace_context::inject_traceparent(req.headers_mut());
        if let Some(trace_id) = req
            .headers()
            .get(trace_context::TRACEPARENT)
            .and_then(|v| v.to_str().ok())
            .and_then(trace_context::parse_trace_id)
        {
            span.record("trace_id", trace_id);
        }

        async {
            let response = self.inner.execute(req).await?;

            let status = response.status();
            let span = tracing::Span::current();
            span.record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                span.record("error", true);
            }
            tracing::debug!(status = status.as_u16(), "response received");

            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Convenience method for GET requests
    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let req = self.inner.get(url).build()?;
        self.execute(req).await
    }

    /// Create a request builder; run the built request through [`TracedClient::execute`].
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
