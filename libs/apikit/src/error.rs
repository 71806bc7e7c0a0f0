use thiserror::Error;

/// Failures that happen before an HTTP status is available.
///
/// Each of these ends up as the `error` message of a failed [`crate::Envelope`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn invalid_endpoint(endpoint: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn invalid_header(name: impl Into<String>) -> Self {
        Self::InvalidHeader { name: name.into() }
    }
}
