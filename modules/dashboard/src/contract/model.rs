use serde::Serialize;
use serde_json::Value;

/// Fixed password of synthesized test users.
pub const TEST_PASSWORD: &str = "TestPass123!";
/// Fixed registration secret code.
pub const SECRET_CODE: &str = "1234";

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationPayload {
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub secret_code: String,
}

impl RegistrationPayload {
    /// Derive a fresh test identity from a millisecond timestamp.
    pub fn synthesize(epoch_millis: u64) -> Self {
        let digits = format!("{epoch_millis:07}");
        let tail = |n: usize| &digits[digits.len() - n..];

        Self {
            email: format!("test_{epoch_millis}@example.com"),
            phone: format!("+7999{}", tail(7)),
            username: format!("user_{}", tail(6)),
            password: TEST_PASSWORD.to_string(),
            secret_code: SECRET_CODE.to_string(),
        }
    }
}

/// A completed registration, as shown on the user card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user_id: String,
    pub email: String,
}

/// A completed listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Count as displayed in the log.
    pub count: String,
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_timestamp_tails() {
        let p = RegistrationPayload::synthesize(1_700_000_123_456);
        assert_eq!(p.email, "test_1700000123456@example.com");
        assert_eq!(p.phone, "+79990123456");
        assert_eq!(p.username, "user_123456");
        assert_eq!(p.password, TEST_PASSWORD);
        assert_eq!(p.secret_code, "1234");
    }

    #[test]
    fn short_timestamps_are_zero_padded() {
        let p = RegistrationPayload::synthesize(42);
        assert_eq!(p.email, "test_42@example.com");
        assert_eq!(p.phone, "+79990000042");
        assert_eq!(p.username, "user_000042");
    }

    #[test]
    fn payload_serializes_wire_field_names() {
        let v = serde_json::to_value(RegistrationPayload::synthesize(1)).unwrap();
        let obj = v.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["email", "password", "phone", "secret_code", "username"]
        );
    }
}
