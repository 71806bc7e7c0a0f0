//! # dashboard
//!
//! A small dashboard for exercising the platform HTTP API.
//!
//! - [`Dashboard`] runs the registration, project listing and webinar listing
//!   flows, recording every step in the results log ([`ResultLogger`]).
//! - [`Bootstrap`] initializes a site page once: auth badge, banner and logout link.
//! - [`Document`] is the in-process page both of them write to.
//!
//! Collaborators (page, storage, navigation, clock, API client) are injected,
//! so every component runs without a browser.

pub mod alerts;
pub mod bootstrap;
pub mod clock;
pub mod contract;
pub mod dashboard;
pub mod document;
pub mod error;
pub mod flows;
pub mod logger;
pub mod navigator;
pub mod render;
pub mod storage;

pub use alerts::{show_alert, AlertKind};
pub use bootstrap::{AuthState, Bootstrap, BootstrapError, BootstrapReport, LogoutControl};
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock};
pub use contract::model::{Listing, Registration, RegistrationPayload};
pub use dashboard::Dashboard;
pub use document::{ids, Document, Element};
pub use error::FlowError;
pub use flows::FlowResult;
pub use logger::{LogLine, ResultLogger};
pub use navigator::{MemoryNavigator, Navigator};
pub use storage::{read_auth_token, FileStore, KeyValueStore, MemoryStore, StorageError, AUTH_TOKEN_KEY};
