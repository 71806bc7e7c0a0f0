//! In-process document model.
//!
//! A small element tree standing in for the browser page: elements carry a
//! tag, optional id, class list, text, attributes, scroll position and
//! children. Handles are cheap to clone and safe to share across tasks.
//!
//! Every lookup goes through [`Document::by_id`] or
//! [`Document::first_by_class`], which return `None` for absent elements.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Element ids and classes the dashboard depends on.
pub mod ids {
    pub const API_RESULTS: &str = "api-results";
    pub const USER_ID: &str = "user-id";
    pub const USER_EMAIL: &str = "user-email";
    pub const USER_STATUS: &str = "user-status";
    pub const AUTH_STATUS: &str = "authStatus";
    pub const NAVBAR_NAV: &str = "navbar-nav";
    pub const CONTAINER: &str = "container";
}

type ClickHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    attrs: BTreeMap<String, String>,
    scroll_top: usize,
    children: Vec<Element>,
    on_click: Option<ClickHandler>,
}

/// Shared handle to one element.
#[derive(Clone)]
pub struct Element(Arc<Mutex<Node>>);

impl Element {
    pub fn new(tag: &str) -> Self {
        Self(Arc::new(Mutex::new(Node {
            tag: tag.to_string(),
            ..Node::default()
        })))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.0.lock().id = Some(id.to_string());
        self
    }

    pub fn with_class(self, class_name: &str) -> Self {
        self.set_class_name(class_name);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    pub fn tag(&self) -> String {
        self.0.lock().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.0.lock().id.clone()
    }

    pub fn text(&self) -> String {
        self.0.lock().text.clone()
    }

    /// Replace the text content.
    pub fn set_text(&self, text: &str) {
        self.0.lock().text = text.to_string();
    }

    pub fn append_text(&self, text: &str) {
        self.0.lock().text.push_str(text);
    }

    /// Space-separated class list, like `className`.
    pub fn class_name(&self) -> String {
        self.0.lock().classes.join(" ")
    }

    /// Replace the whole class list.
    pub fn set_class_name(&self, class_name: &str) {
        self.0.lock().classes = class_name.split_whitespace().map(str::to_string).collect();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.lock().classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.lock().attrs.get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.0.lock().attrs.insert(name.to_string(), value.to_string());
    }

    /// Content height, counted in text lines.
    pub fn scroll_height(&self) -> usize {
        self.0.lock().text.lines().count()
    }

    pub fn scroll_top(&self) -> usize {
        self.0.lock().scroll_top
    }

    pub fn scroll_to_bottom(&self) {
        let mut node = self.0.lock();
        node.scroll_top = node.text.lines().count();
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.lock().children.clone()
    }

    pub fn append_child(&self, child: Element) {
        self.0.lock().children.push(child);
    }

    pub fn prepend_child(&self, child: Element) {
        self.0.lock().children.insert(0, child);
    }

    pub fn remove_child(&self, child: &Element) -> bool {
        let mut node = self.0.lock();
        let before = node.children.len();
        node.children.retain(|c| !c.ptr_eq(child));
        node.children.len() != before
    }

    pub fn set_on_click(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.0.lock().on_click = Some(Arc::new(handler));
    }

    /// Run the click handler, if any. Returns whether one ran.
    pub fn click(&self) -> bool {
        // Handler runs without the lock so it may touch this element.
        let handler = self.0.lock().on_click.clone();
        match handler {
            Some(h) => {
                h();
                true
            }
            None => false,
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning handle, for handlers that refer back up the tree.
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Arc::downgrade(&self.0))
    }

    /// Depth-first, pre-order search including `self`.
    fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<Element> {
        if pred(self) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|c| c.find(pred))
    }
}

#[derive(Clone)]
pub struct WeakElement(Weak<Mutex<Node>>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.lock();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("id", &node.id)
            .field("classes", &node.classes)
            .field("children", &node.children.len())
            .finish()
    }
}

/// A page: a root element plus the optional-element accessors.
#[derive(Debug, Clone)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty page with just a `<body>`.
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn from_body(body: Element) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn by_id(&self, id: &str) -> Option<Element> {
        self.body.find(&|e: &Element| e.id().as_deref() == Some(id))
    }

    pub fn first_by_class(&self, class: &str) -> Option<Element> {
        self.body.find(&|e: &Element| e.has_class(class))
    }

    /// The API test dashboard: results log plus the registered-user card.
    pub fn dashboard() -> Self {
        let user_card = Element::new("div")
            .with_class("card")
            .with_child(Element::new("span").with_id(ids::USER_ID).with_text("-"))
            .with_child(Element::new("span").with_id(ids::USER_EMAIL).with_text("-"))
            .with_child(
                Element::new("span")
                    .with_id(ids::USER_STATUS)
                    .with_class("badge bg-secondary")
                    .with_text("Not registered"),
            );
        let results = Element::new("pre").with_id(ids::API_RESULTS);

        Self::from_body(
            Element::new("body").with_child(
                Element::new("div")
                    .with_class(ids::CONTAINER)
                    .with_child(user_card)
                    .with_child(results),
            ),
        )
    }

    /// The site page shell: navigation bar with the auth badge, and a content container.
    pub fn site() -> Self {
        let nav = Element::new("nav").with_class("navbar").with_child(
            Element::new("ul")
                .with_class(ids::NAVBAR_NAV)
                .with_child(Element::new("li").with_class("nav-item").with_child(
                    Element::new("a")
                        .with_class("nav-link")
                        .with_text("Home")
                        .with_id("nav-home"),
                )),
        );
        let badge = Element::new("span").with_id(ids::AUTH_STATUS).with_class("badge");

        Self::from_body(
            Element::new("body")
                .with_child(nav.with_child(badge))
                .with_child(Element::new("main").with_class(ids::CONTAINER)),
        )
    }
}
