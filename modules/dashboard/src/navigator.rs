use parking_lot::Mutex;
use tracing::debug;

/// Page navigation, like assigning `window.location.href`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
    fn location(&self) -> String;
}

/// Keeps the current location and its history in memory.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            history: Mutex::new(vec![start.to_string()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "navigate");
        self.history.lock().push(path.to_string());
    }

    fn location(&self) -> String {
        self.history.lock().last().cloned().unwrap_or_default()
    }
}
