use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{display_field, interpret, FlowResult, TRANSPORT_ERROR_PREFIX};
use crate::contract::model::{Registration, RegistrationPayload};
use crate::dashboard::{Dashboard, REGISTER_ENDPOINT};
use crate::document::ids;
use crate::error::FlowError;

pub const REGISTERED_STATUS_TEXT: &str = "Registered";
pub const REGISTERED_STATUS_CLASS: &str = "badge bg-success";

impl Dashboard {
    /// Register a synthesized test user and show it on the user card.
    #[instrument(name = "dashboard.flow.register", skip(self))]
    pub async fn register(&self) -> FlowResult<Registration> {
        self.logger.record("🔐 Testing registration...");

        let payload = RegistrationPayload::synthesize(self.clock.epoch_millis());
        let result = interpret(self.api.post(REGISTER_ENDPOINT, &payload).await);

        match result {
            Ok(body) => {
                let raw_id = body.get("user_id");
                info!(user_id = %display_field(raw_id), email = %payload.email, "registration succeeded");
                self.logger.record(format!(
                    "✅ Registration succeeded! User ID: {}",
                    display_field(raw_id)
                ));
                // A missing or null id leaves the field empty.
                let user_id = match raw_id {
                    None | Some(Value::Null) => String::new(),
                    Some(id) => display_field(Some(id)),
                };
                self.show_user(&user_id, &payload.email);
                Ok(Registration {
                    user_id,
                    email: payload.email,
                })
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                self.logger.record(match &err {
                    FlowError::Rejected { detail, .. } => {
                        format!("❌ Registration failed: {detail}")
                    }
                    FlowError::Transport { message } => {
                        format!("{TRANSPORT_ERROR_PREFIX}: {message}")
                    }
                });
                Err(err)
            }
        }
    }

    fn show_user(&self, user_id: &str, email: &str) {
        if let Some(e) = self.document.by_id(ids::USER_ID) {
            e.set_text(user_id);
        }
        if let Some(e) = self.document.by_id(ids::USER_EMAIL) {
            e.set_text(email);
        }
        if let Some(e) = self.document.by_id(ids::USER_STATUS) {
            e.set_text(REGISTERED_STATUS_TEXT);
            e.set_class_name(REGISTERED_STATUS_CLASS);
        }
    }
}
