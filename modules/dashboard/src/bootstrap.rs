//! One-time page initialization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::alerts::{show_alert, AlertKind};
use crate::document::{ids, Document, Element};
use crate::logger::ResultLogger;
use crate::navigator::Navigator;
use crate::storage::{read_auth_token, KeyValueStore, AUTH_TOKEN_KEY};

pub const ASSETS_LOADED_MESSAGE: &str = "✅ Static assets loaded successfully!";
pub const DASHBOARD_READY_MESSAGE: &str = "🚀 Dashboard loaded! Use the buttons to test the API.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("page bootstrap already ran")]
    AlreadyRan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authorized,
    Anonymous,
}

impl AuthState {
    pub fn badge_text(self) -> &'static str {
        match self {
            Self::Authorized => "Authorized",
            Self::Anonymous => "Not authorized",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Authorized => "badge bg-success",
            Self::Anonymous => "badge bg-secondary",
        }
    }
}

/// The injected "Logout" nav link.
#[derive(Clone)]
pub struct LogoutControl {
    element: Element,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl LogoutControl {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Forget the token and go back to `/`.
    pub fn activate(&self) {
        logout(self.store.as_ref(), self.navigator.as_ref());
    }
}

fn logout(store: &dyn KeyValueStore, navigator: &dyn Navigator) {
    if let Err(e) = store.remove(AUTH_TOKEN_KEY) {
        warn!(error = %e, "failed to clear auth token");
    }
    info!("logged out");
    navigator.navigate("/");
}

/// What the bootstrap did to the page.
pub struct BootstrapReport {
    pub auth: AuthState,
    pub banner: Option<Element>,
    pub logout: Option<LogoutControl>,
}

/// Page initialization, run once when the document becomes interactive.
pub struct Bootstrap {
    document: Arc<Document>,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    ran: AtomicBool,
}

impl Bootstrap {
    pub fn new(
        document: Arc<Document>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            document,
            store,
            navigator,
            ran: AtomicBool::new(false),
        }
    }

    #[instrument(name = "dashboard.bootstrap.run", skip(self))]
    pub fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        if self.ran.swap(true, Ordering::SeqCst) {
            return Err(BootstrapError::AlreadyRan);
        }

        let token = read_auth_token(self.store.as_ref());
        let auth = if token.is_some() {
            AuthState::Authorized
        } else {
            AuthState::Anonymous
        };
        debug!(?auth, "auth state resolved");

        if let Some(badge) = self.document.by_id(ids::AUTH_STATUS) {
            badge.set_text(auth.badge_text());
            badge.set_class_name(auth.badge_class());
        }

        let banner = show_alert(&self.document, ASSETS_LOADED_MESSAGE, AlertKind::Success);

        let logout = match auth {
            AuthState::Authorized => self.attach_logout(),
            AuthState::Anonymous => None,
        };

        Ok(BootstrapReport {
            auth,
            banner,
            logout,
        })
    }

    fn attach_logout(&self) -> Option<LogoutControl> {
        let nav = self.document.first_by_class(ids::NAVBAR_NAV)?;

        let link = Element::new("a").with_class("nav-link").with_text("Logout");
        link.set_attr("href", "#");
        let (store, navigator) = (self.store.clone(), self.navigator.clone());
        link.set_on_click(move || logout(store.as_ref(), navigator.as_ref()));

        nav.append_child(
            Element::new("li")
                .with_class("nav-item")
                .with_child(link.clone()),
        );

        Some(LogoutControl {
            element: link,
            store: self.store.clone(),
            navigator: self.navigator.clone(),
        })
    }

    /// Load hook of the API test dashboard.
    pub fn dashboard_ready(logger: &ResultLogger) {
        logger.record(DASHBOARD_READY_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::MemoryNavigator;
    use crate::storage::MemoryStore;

    fn bootstrap(doc: Document, store: MemoryStore) -> (Bootstrap, Arc<Document>, Arc<MemoryStore>, Arc<MemoryNavigator>) {
        let doc = Arc::new(doc);
        let store = Arc::new(store);
        let nav = Arc::new(MemoryNavigator::new("/projects"));
        (
            Bootstrap::new(doc.clone(), store.clone(), nav.clone()),
            doc,
            store,
            nav,
        )
    }

    #[test]
    fn anonymous_page_gets_badge_and_banner_only() {
        let (boot, doc, _store, _nav) = bootstrap(Document::site(), MemoryStore::new());

        let report = boot.run().unwrap();

        assert_eq!(report.auth, AuthState::Anonymous);
        assert!(report.logout.is_none());
        let badge = doc.by_id(ids::AUTH_STATUS).unwrap();
        assert_eq!(badge.text(), "Not authorized");
        assert_eq!(badge.class_name(), "badge bg-secondary");
        let nav = doc.first_by_class(ids::NAVBAR_NAV).unwrap();
        assert_eq!(nav.children().len(), 1);
        assert_eq!(report.banner.unwrap().text(), ASSETS_LOADED_MESSAGE);
    }

    #[test]
    fn authorized_page_gets_logout_control() {
        let store = MemoryStore::with_entry(AUTH_TOKEN_KEY, "t0k3n");
        let (boot, doc, store, nav) = bootstrap(Document::site(), store);

        let report = boot.run().unwrap();

        assert_eq!(report.auth, AuthState::Authorized);
        let badge = doc.by_id(ids::AUTH_STATUS).unwrap();
        assert_eq!(badge.text(), "Authorized");
        assert!(badge.has_class("bg-success"));

        let control = report.logout.unwrap();
        assert_eq!(control.element().text(), "Logout");
        assert_eq!(control.element().attr("href").as_deref(), Some("#"));

        control.activate();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(nav.location(), "/");
    }

    #[test]
    fn clicking_the_link_logs_out() {
        let store = MemoryStore::with_entry(AUTH_TOKEN_KEY, "t0k3n");
        let (boot, doc, store, nav) = bootstrap(Document::site(), store);
        boot.run().unwrap();

        let nav_list = doc.first_by_class(ids::NAVBAR_NAV).unwrap();
        let item = nav_list.children().last().cloned().unwrap();
        assert!(item.children()[0].click());

        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(nav.location(), "/");
    }

    #[test]
    fn bare_page_is_tolerated() {
        let store = MemoryStore::with_entry(AUTH_TOKEN_KEY, "t0k3n");
        let (boot, _doc, _store, _nav) = bootstrap(Document::new(), store);

        let report = boot.run().unwrap();

        assert_eq!(report.auth, AuthState::Authorized);
        assert!(report.banner.is_none());
        assert!(report.logout.is_none());
    }

    #[test]
    fn second_run_is_rejected() {
        let (boot, doc, _store, _nav) = bootstrap(Document::site(), MemoryStore::new());
        boot.run().unwrap();
        assert_eq!(boot.run().err(), Some(BootstrapError::AlreadyRan));

        let container = doc.first_by_class(ids::CONTAINER).unwrap();
        assert_eq!(container.children().len(), 1, "banner shown once");
    }
}
