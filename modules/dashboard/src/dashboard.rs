use apikit::ApiClient;
use std::sync::Arc;

use crate::clock::Clock;
use crate::document::Document;
use crate::logger::ResultLogger;

pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const PROJECTS_ENDPOINT: &str = "/projects/";
pub const WEBINARS_ENDPOINT: &str = "/webinars/announcements";

/// Context of the API test dashboard: the page, the results log, the API
/// client and a clock. The flows live in [`crate::flows`].
#[derive(Clone)]
pub struct Dashboard {
    pub(crate) api: ApiClient,
    pub(crate) document: Arc<Document>,
    pub(crate) logger: ResultLogger,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Dashboard {
    pub fn new(api: ApiClient, document: Arc<Document>, clock: Arc<dyn Clock>) -> Self {
        let logger = ResultLogger::new(document.clone(), clock.clone());
        Self {
            api,
            document,
            logger,
            clock,
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn logger(&self) -> &ResultLogger {
        &self.logger
    }
}
