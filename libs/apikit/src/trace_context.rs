//! Minimal W3C trace context propagation.
//!
//! Header manipulation only; no OpenTelemetry SDK involved.

use http::{HeaderMap, HeaderName, HeaderValue};

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Build a fresh `traceparent` value: version 00, random ids, sampled.
pub fn new_traceparent() -> String {
    let trace_id = rand::random::<u128>().max(1);
    let span_id = rand::random::<u64>().max(1);
    format!("00-{trace_id:032x}-{span_id:016x}-01")
}

/// Insert a `traceparent` header unless the caller already provided one.
pub fn inject_traceparent(headers: &mut HeaderMap) {
    if headers.contains_key(TRACEPARENT) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&new_traceparent()) {
        headers.insert(HeaderName::from_static(TRACEPARENT), value);
    }
}

/// Extract the trace id from a `traceparent` value.
pub fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(span_id), Some(_flags))
            if trace_id.len() == 32 && span_id.len() == 16 =>
        {
            Some(trace_id)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_value_is_well_formed() {
        let tp = new_traceparent();
        assert_eq!(tp.len(), 55);
        assert!(tp.starts_with("00-"));
        assert!(tp.ends_with("-01"));
        assert!(parse_trace_id(&tp).is_some());
    }

    #[test]
    fn inject_keeps_existing_header() {
        let existing = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        let mut headers = HeaderMap::new();
        headers.insert(TRACEPARENT, existing.parse().unwrap());

        inject_traceparent(&mut headers);

        assert_eq!(headers.get(TRACEPARENT).unwrap(), existing);
    }

    #[test]
    fn inject_adds_missing_header() {
        let mut headers = HeaderMap::new();
        inject_traceparent(&mut headers);
        assert!(headers.contains_key(TRACEPARENT));
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert_eq!(parse_trace_id("garbage"), None);
        assert_eq!(parse_trace_id("01-abc-def-01"), None);
        assert_eq!(
            parse_trace_id("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
            Some("4bf92f3577b34da6a3ce929d0e0e4736")
        );
    }
}
