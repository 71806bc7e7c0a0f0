use std::fmt;

use crate::document::{ids, Document, Element};

/// Bootstrap contextual alert variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        })
    }
}

/// Prepend a dismissible alert to the first `.container`.
///
/// Returns the inserted element, or `None` when the page has no container.
pub fn show_alert(document: &Document, message: &str, kind: AlertKind) -> Option<Element> {
    let container = document.first_by_class(ids::CONTAINER)?;
    let alert = Element::new("div")
        .with_class(&format!("alert alert-{kind} alert-dismissible fade show"))
        .with_text(message);
    alert.set_attr("role", "alert");

    let close = Element::new("button").with_class("btn-close");
    close.set_attr("data-bs-dismiss", "alert");
    close.set_attr("aria-label", "Close");
    let (parent, target) = (container.downgrade(), alert.downgrade());
    close.set_on_click(move || {
        if let (Some(parent), Some(target)) = (parent.upgrade(), target.upgrade()) {
            parent.remove_child(&target);
        }
    });
    alert.append_child(close);

    container.prepend_child(alert.clone());
    Some(alert)
}
