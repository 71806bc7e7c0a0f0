//! # apikit
//!
//! HTTP plumbing for talking to the platform API:
//!
//! - [`TracedClient`]: a `reqwest::Client` wrapper that opens an `outgoing_http`
//!   span per request and injects a W3C `traceparent` header.
//! - [`ApiClient`]: the generic client that normalizes every call into an
//!   [`Envelope`] (`{success, data, status}` or `{success: false, error}`).

pub mod client;
pub mod envelope;
pub mod error;
pub mod trace_context;
pub mod traced;

pub use client::{ApiClient, RequestOptions};
pub use envelope::Envelope;
pub use error::ApiError;
pub use traced::TracedClient;
