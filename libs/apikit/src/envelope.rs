use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Normalized result of one API call.
///
/// `Completed` means the server answered (whatever the status); `success`
/// tells whether that status was in the 2xx range. `Failed` means the call
/// itself failed: network error, malformed URL, or a body that is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Completed {
        success: bool,
        data: Value,
        status: u16,
    },
    Failed {
        error: String,
    },
}

impl Envelope {
    pub fn completed(status: u16, data: Value) -> Self {
        Self::Completed {
            success: (200..300).contains(&status),
            data,
            status,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { success: true, .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Completed { data, .. } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Completed { status, .. } => Some(*status),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error } => Some(error.as_str()),
        }
    }

    /// JSON shape: `{success, data, status}` or `{success: false, error}`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Completed {
                success,
                data,
                status,
            } => json!({ "success": success, "data": data, "status": status }),
            Self::Failed { error } => json!({ "success": false, "error": error }),
        }
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_follows_status_range() {
        assert!(Envelope::completed(200, json!({})).is_success());
        assert!(Envelope::completed(204, Value::Null).is_success());
        assert!(!Envelope::completed(199, Value::Null).is_success());
        assert!(!Envelope::completed(300, Value::Null).is_success());
        assert!(!Envelope::completed(422, json!({"detail": "x"})).is_success());
    }

    #[test]
    fn failed_envelope_has_no_data_or_status() {
        let env = Envelope::failed("network error");
        assert!(!env.is_success());
        assert_eq!(env.data(), None);
        assert_eq!(env.status(), None);
        assert_eq!(env.error(), Some("network error"));
    }

    #[test]
    fn serializes_to_wire_shapes() {
        let ok = serde_json::to_value(Envelope::completed(201, json!({"user_id": 7}))).unwrap();
        assert_eq!(
            ok,
            json!({"success": true, "data": {"user_id": 7}, "status": 201})
        );

        let failed = serde_json::to_value(Envelope::failed("boom")).unwrap();
        assert_eq!(failed, json!({"success": false, "error": "boom"}));
    }
}
