//! Plain-text rendering of a document, for terminals.

use std::fmt::Write;

use crate::document::{Document, Element};

/// Indented outline of the page: `tag#id.class.class` followed by the text.
/// Multi-line text is indented under its element.
pub fn render(document: &Document) -> String {
    let mut out = String::new();
    render_element(document.body(), 0, &mut out);
    out
}

fn render_element(element: &Element, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    let mut head = element.tag();
    if let Some(id) = element.id() {
        head.push('#');
        head.push_str(&id);
    }
    for class in element.class_name().split_whitespace() {
        head.push('.');
        head.push_str(class);
    }

    let text = element.text();
    let mut lines = text.lines().filter(|l| !l.is_empty());
    match lines.next() {
        Some(first) => {
            let _ = writeln!(out, "{pad}{head}: {first}");
            for line in lines {
                let _ = writeln!(out, "{pad}  | {line}");
            }
        }
        None => {
            let _ = writeln!(out, "{pad}{head}");
        }
    }

    for child in element.children() {
        render_element(&child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_outline_with_ids_classes_and_text() {
        let doc = Document::from_body(
            Element::new("body").with_child(
                Element::new("span")
                    .with_id("user-status")
                    .with_class("badge bg-success")
                    .with_text("Registered"),
            ),
        );
        assert_eq!(
            render(&doc),
            "body\n  span#user-status.badge.bg-success: Registered\n"
        );
    }

    #[test]
    fn multiline_text_is_indented() {
        let doc = Document::from_body(Element::new("pre").with_text("\n10:00:00: a\n10:00:01: b"));
        assert_eq!(render(&doc), "pre: 10:00:00: a\n  | 10:00:01: b\n");
    }
}
