//! Element construction.
//!
//! `scraper` caches an element's id and class list on first use, so an
//! element whose attributes change is rebuilt rather than edited. Building
//! goes through the HTML parser: the start tag is rendered and parsed in a
//! context that accepts it, and the resulting element value is taken.

use std::fmt::Write as _;

use scraper::node::Element;
use scraper::{Html, Node};

/// Attribute list of `element`, sorted by name.
pub(crate) fn attributes(element: &Element) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = element
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(&b.0));
    attrs
}

/// Whether `element` carries every whitespace-separated class in `class`.
pub(crate) fn has_classes(element: &Element, class: &str) -> bool {
    let mut wanted = class.split_whitespace().peekable();
    wanted.peek().is_some() && wanted.all(|c| element.classes().any(|own| own == c))
}

/// Class attribute of `element` with each class of `class` added once.
pub(crate) fn with_classes(element: &Element, class: &str) -> String {
    let mut classes: Vec<&str> = element.classes().collect();
    for c in class.split_whitespace() {
        if !classes.contains(&c) {
            classes.push(c);
        }
    }
    classes.join(" ")
}

/// A fresh `<tag>` element node carrying `attrs`, or `None` when the
/// parser refuses to produce such an element.
pub(crate) fn build(tag: &str, attrs: &[(String, String)]) -> Option<Node> {
    let mut start_tag = format!("<{tag}");
    for (name, value) in attrs {
        let _ = write!(start_tag, " {name}=\"{}\"", escape_attribute(value));
    }
    start_tag.push('>');

    // Table parts only parse inside a table, document-level tags only as a
    // whole document.
    find_element(&Html::parse_fragment(&start_tag), tag, true)
        .or_else(|| {
            let in_table = format!("<table>{start_tag}");
            find_element(&Html::parse_fragment(&in_table), tag, true)
        })
        .or_else(|| find_element(&Html::parse_document(&start_tag), tag, false))
}

fn find_element(html: &Html, tag: &str, skip_root: bool) -> Option<Node> {
    html.root_element()
        .descendants()
        .skip(usize::from(skip_root))
        .find(|node| node.value().as_element().is_some_and(|el| el.name() == tag))
        .map(|node| node.value().clone())
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
