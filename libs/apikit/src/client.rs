use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::traced::TracedClient;

/// Per-request options, merged over the client defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header. A caller header replaces a default with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Generic API client: every call resolves to an [`Envelope`], never an error.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: TracedClient,
    base: Url,
}

impl ApiClient {
    pub fn new(http: TracedClient, base: Url) -> Self {
        Self { http, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint the way `fetch` does: absolute URLs are kept,
    /// `/path` is relative to the origin, anything else to the base path.
    pub fn resolve(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base
            .join(endpoint)
            .map_err(|e| ApiError::invalid_endpoint(endpoint, e))
    }

    /// Issue a request and normalize the outcome.
    ///
    /// The body is parsed as JSON whatever the status code.
    #[instrument(name = "apikit.request", skip_all, fields(endpoint = %endpoint, method = %options.method))]
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Envelope {
        match self.try_request(endpoint, options).await {
            Ok((status, data)) => {
                debug!(status, "request completed");
                Envelope::completed(status, data)
            }
            Err(e) => {
                warn!(error = %e, "request failed");
                Envelope::failed(e.to_string())
            }
        }
    }

    /// POST `data` serialized as JSON.
    pub async fn post<T>(&self, endpoint: &str, data: &T) -> Envelope
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(data) {
            Ok(body) => {
                self.request(endpoint, RequestOptions::new().method(Method::POST).body(body))
                    .await
            }
            Err(e) => Envelope::failed(ApiError::Encode(e).to_string()),
        }
    }

    pub async fn get(&self, endpoint: &str) -> Envelope {
        self.request(endpoint, RequestOptions::new()).await
    }

    async fn try_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<(u16, Value), ApiError> {
        let url = self.resolve(endpoint)?;
        let headers = merge_headers(&options.headers)?;

        let mut builder = self
            .http
            .request(options.method, url.as_str())
            .headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = self.http.execute(builder.build()?).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let data = serde_json::from_slice(&bytes).map_err(ApiError::Decode)?;

        Ok((status, data))
    }
}

/// Default `Content-Type: application/json`, overridden by caller headers.
fn merge_headers(custom: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in custom {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::invalid_header(name.as_str()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ApiError::invalid_header(name.as_str()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(TracedClient::default(), Url::parse(base).unwrap())
    }

    #[test]
    fn resolve_follows_fetch_semantics() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.resolve("/auth/register").unwrap().as_str(),
            "http://localhost:8000/auth/register"
        );
        assert_eq!(
            c.resolve("/projects/").unwrap().as_str(),
            "http://localhost:8000/projects/"
        );
        assert_eq!(
            c.resolve("http://other:9000/x").unwrap().as_str(),
            "http://other:9000/x"
        );

        let nested = client("http://host/app/page");
        assert_eq!(
            nested.resolve("data.json").unwrap().as_str(),
            "http://host/app/data.json"
        );
        assert_eq!(
            nested.resolve("/root").unwrap().as_str(),
            "http://host/root"
        );
    }

    #[test]
    fn merge_headers_defaults_to_json() {
        let headers = merge_headers(&[]).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn merge_headers_caller_wins_case_insensitively() {
        let headers = merge_headers(&[
            ("content-type".to_string(), "text/plain".to_string()),
            ("X-Trace".to_string(), "abc".to_string()),
        ])
        .unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn merge_headers_rejects_invalid_names() {
        let err = merge_headers(&[("bad header".to_string(), "v".to_string())]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { .. }));
    }
}
