use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    with_js_numbers, display_field, interpret, is_truthy, FlowResult, TRANSPORT_ERROR_PREFIX,
};
use crate::contract::model::Listing;
use crate::dashboard::{Dashboard, PROJECTS_ENDPOINT, WEBINARS_ENDPOINT};
use crate::error::FlowError;

/// Log texts of one listing flow.
struct ListingMessages {
    starting: &'static str,
    received: &'static str,
    failed: &'static str,
}

const PROJECTS: ListingMessages = ListingMessages {
    starting: "📊 Fetching projects...",
    received: "✅ Projects received",
    failed: "❌ Failed to fetch projects",
};

const WEBINARS: ListingMessages = ListingMessages {
    starting: "🎥 Fetching webinar announcements...",
    received: "✅ Webinar announcements received",
    failed: "❌ Failed to fetch webinars",
};

/// `pagination.total`, or the length of a bare list when the total is falsy.
fn project_count(body: &Value) -> String {
    match body.pointer("/pagination/total") {
        Some(total) if is_truthy(total) => display_field(Some(total)),
        _ => match body.as_array() {
            Some(items) => items.len().to_string(),
            None => display_field(None),
        },
    }
}

fn webinar_count(body: &Value) -> String {
    display_field(body.get("count"))
}

impl Dashboard {
    #[instrument(name = "dashboard.flow.fetch_projects", skip(self))]
    pub async fn fetch_projects(&self) -> FlowResult<Listing> {
        self.list(PROJECTS_ENDPOINT, &PROJECTS, project_count).await
    }

    #[instrument(name = "dashboard.flow.fetch_webinars", skip(self))]
    pub async fn fetch_webinars(&self) -> FlowResult<Listing> {
        self.list(WEBINARS_ENDPOINT, &WEBINARS, webinar_count).await
    }

    async fn list(
        &self,
        endpoint: &str,
        messages: &ListingMessages,
        count_of: fn(&Value) -> String,
    ) -> FlowResult<Listing> {
        self.logger.record(messages.starting);

        match interpret(self.api.get(endpoint).await) {
            Ok(body) => {
                let count = count_of(&body);
                info!(endpoint, %count, "listing received");
                self.logger.record(format!("{}: {count}", messages.received));
                self.logger.record(pretty(&body));
                Ok(Listing { count, body })
            }
            Err(err) => {
                warn!(endpoint, error = %err, "listing failed");
                self.logger.record(match &err {
                    FlowError::Rejected { detail, .. } => format!("{}: {detail}", messages.failed),
                    FlowError::Transport { message } => {
                        format!("{TRANSPORT_ERROR_PREFIX}: {message}")
                    }
                });
                Err(err)
            }
        }
    }
}

/// Two-space indented JSON, as `JSON.stringify(v, null, 2)`.
fn pretty(body: &Value) -> String {
    let body = with_js_numbers(body);
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
}
