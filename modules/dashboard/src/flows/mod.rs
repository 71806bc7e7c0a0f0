//! User-triggered request/response/log cycles.
//!
//! All flows share one path: call the [`apikit::ApiClient`], turn the
//! [`apikit::Envelope`] into a `Result`, and log the outcome. Errors are
//! logged here and returned for inspection; nothing escapes as a panic.

mod listing;
mod register;

use apikit::Envelope;
use serde_json::Value;

use crate::error::FlowError;

pub type FlowResult<T> = Result<T, FlowError>;

pub(crate) const TRANSPORT_ERROR_PREFIX: &str = "💥 Error";

/// Success body, or the tier of failure.
pub(crate) fn interpret(envelope: Envelope) -> FlowResult<Value> {
    match envelope {
        Envelope::Failed { error } => Err(FlowError::transport(error)),
        Envelope::Completed {
            success: false,
            data,
            status,
        } => Err(FlowError::rejected(status, display_field(data.get("detail")))),
        Envelope::Completed { data, .. } => Ok(data),
    }
}

/// Render a possibly missing JSON field for a log line.
///
/// Strings appear bare, absent fields as `undefined`, anything else as compact JSON.
pub(crate) fn display_field(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => with_js_numbers(other).to_string(),
    }
}

/// Largest integer a JS number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Copy of `value` with integral floats turned into integers, so `3.0`
/// renders as `3` the way `JSON.stringify` prints it.
pub(crate) fn with_js_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(with_js_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), with_js_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// JavaScript truthiness of a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
