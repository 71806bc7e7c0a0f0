use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::document::{ids, Document};

/// One entry of the results log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.timestamp, self.message)
    }
}

/// Appends timestamped status lines to the `api-results` region.
///
/// The buffer is append-only for the lifetime of the logger. Clones share it.
#[derive(Clone)]
pub struct ResultLogger {
    document: Arc<Document>,
    clock: Arc<dyn Clock>,
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl ResultLogger {
    pub fn new(document: Arc<Document>, clock: Arc<dyn Clock>) -> Self {
        Self {
            document,
            clock,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append `\n<local-time>: <message>` to the region and scroll it to the bottom.
    /// Without a region only the in-memory buffer is updated.
    pub fn record(&self, message: impl Into<String>) {
        let line = LogLine {
            timestamp: self.clock.local_time(),
            message: message.into(),
        };
        tracing::info!(target: "dashboard::results", "{}", line.message);

        if let Some(region) = self.document.by_id(ids::API_RESULTS) {
            region.append_text(&format!("\n{line}"));
            region.scroll_to_bottom();
        }
        self.lines.lock().push(line);
    }

    /// Everything recorded so far, oldest first.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().clone()
    }

    /// True if any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.message.contains(needle))
    }
}
