//! # spinkit-adapter-dom-memory
//!
//! In-memory implementation of the [`Document`] port, backed by a
//! [`scraper::Html`] tree.
//!
//! Pages and markup go through the HTML5 parser, queries through
//! [`scraper::Selector`], and mutations through the underlying `ego_tree`.
//! Removing a node only detaches it, so handles stay valid and a removed
//! node can be inserted again. Top-level nodes hang off the `<html>`
//! element the fragment parser creates; that element is never matched by
//! selectors nor serialized.
//!
//! Visibility and forced sizes are written to the inline `style`
//! attribute. Computed dimensions come from the inline style, else from
//! the `data-height` / `data-width` attributes, else zero.
//!
//! ## Dependency rule
//!
//! Depends on `spinkit-app` (port traits) and `spinkit-domain` only.

mod element;
mod style;

use std::collections::HashMap;
use std::fmt;

use ego_tree::NodeRef;
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};
use spinkit_app::ports::{Document, SignalHandler};
use spinkit_domain::config::Dimension;

pub use ego_tree::NodeId;

use style::InlineStyle;

/// Mutable HTML document.
pub struct MemoryDocument {
    html: Html,
    root: NodeId,
    signals: HashMap<(NodeId, String), SignalHandler<MemoryDocument>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("html", &self.to_html())
            .field("signals", &self.signals.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document whose top level is the parsed `html`. Malformed
    /// markup is repaired the way a browser would.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_fragment(html);
        let root = html.root_element().id();
        Self {
            html,
            root,
            signals: HashMap::new(),
        }
    }

    /// The element holding top-level nodes.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// All elements matching `selector` in the whole document.
    #[must_use]
    pub fn select(&self, selector: &str) -> Vec<NodeId> {
        self.query(None, selector)
    }

    /// Serialize every top-level node.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    /// Serialized element, empty for text nodes.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        self.element_ref(node)
            .map(|el| el.html())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.element_ref(node)
            .map(|el| el.inner_html())
            .unwrap_or_default()
    }

    /// Tag name, `None` for text nodes.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::name)
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.attr(name))
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(node)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    /// Concatenated text of `node` and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        self.html
            .tree
            .get(node)
            .map(|node| {
                node.descendants()
                    .filter_map(|descendant| descendant.value().as_text())
                    .map(|text| &**text)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `node` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.root
            || self
                .html
                .tree
                .get(node)
                .is_some_and(|node| node.ancestors().any(|ancestor| ancestor.id() == self.root))
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.html
            .tree
            .get(node)
            .and_then(|node| node.value().as_element())
    }

    fn element_ref(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }

    /// Copy `source` and its subtree from another tree as a detached node.
    fn import(&mut self, source: NodeRef<'_, Node>) -> NodeId {
        let id = self.html.tree.orphan(source.value().clone()).id();
        for child in source.children() {
            let child = self.import(child);
            if let Some(mut parent) = self.html.tree.get_mut(id) {
                parent.append_id(child);
            }
        }
        id
    }

    /// Set or drop one attribute. The element is rebuilt so the id and
    /// class caches match its new attributes.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<String>) {
        let Some(current) = self.element(node) else {
            return;
        };
        let tag = current.name().to_string();
        let mut attrs = element::attributes(current);
        attrs.retain(|(existing, _)| existing != name);
        if let Some(value) = value {
            attrs.push((name.to_string(), value));
        }
        let Some(rebuilt) = element::build(&tag, &attrs) else {
            tracing::warn!(?node, %tag, attribute = name, "element cannot be rebuilt, attribute unchanged");
            return;
        };
        if let Some(mut target) = self.html.tree.get_mut(node) {
            *target.value() = rebuilt;
        }
    }

    fn inline_style(&self, node: NodeId) -> InlineStyle {
        InlineStyle::parse(self.attribute(node, "style").unwrap_or_default())
    }

    fn write_style(&mut self, node: NodeId, style: &InlineStyle) {
        if *style != self.inline_style(node) {
            self.set_attribute(node, "style", style.render());
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(node) {
            node.detach();
        }
    }

    /// Guard against inserting under a non-element or into the node's own
    /// subtree.
    fn can_insert(&self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_ref) = self.html.tree.get(parent) else {
            return false;
        };
        if !parent_ref.value().is_element()
            || parent == child
            || parent_ref.ancestors().any(|ancestor| ancestor.id() == child)
        {
            tracing::debug!(?parent, ?child, "refusing insertion");
            return false;
        }
        self.html.tree.get(child).is_some()
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query(&self, scope: Option<NodeId>, selector: &str) -> Vec<NodeId> {
        let Ok(parsed) = Selector::parse(selector) else {
            tracing::debug!(selector, "invalid selector matches nothing");
            return Vec::new();
        };
        self.element_ref(scope.unwrap_or(self.root))
            .map(|scope| scope.select(&parsed).map(|el| el.id()).collect())
            .unwrap_or_default()
    }

    fn find_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.html
            .tree
            .get(scope)
            .map(|scope| {
                scope
                    .descendants()
                    .skip(1)
                    .filter(|node| {
                        node.value()
                            .as_element()
                            .is_some_and(|el| element::has_classes(el, class))
                    })
                    .map(|node| node.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(node)
            .and_then(|node| node.parent())
            .map(|parent| parent.id())
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let value = element::build(&tag.to_ascii_lowercase(), &[])
            .or_else(|| {
                tracing::warn!(tag, "unknown tag name, creating a span");
                element::build("span", &[])
            })
            .unwrap_or(Node::Fragment);
        self.html.tree.orphan(value).id()
    }

    fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        fragment
            .root_element()
            .children()
            .filter(|node| match node.value() {
                Node::Element(_) => true,
                Node::Text(text) => !text.trim().is_empty(),
                _ => false,
            })
            .map(|node| self.import(node))
            .collect()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| element::has_classes(el, class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(current) = self.element(node) else {
            return;
        };
        if class.trim().is_empty() || element::has_classes(current, class) {
            return;
        }
        let classes = element::with_classes(current, class);
        self.set_attribute(node, "class", Some(classes));
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.clear_content(node);
        let content = self
            .html
            .tree
            .orphan(Node::Text(Text { text: text.into() }))
            .id();
        if let Some(mut parent) = self.html.tree.get_mut(node) {
            parent.append_id(content);
        }
    }

    fn clear_content(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.detach(child);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_insert(parent, child) {
            return;
        }
        if let Some(mut parent) = self.html.tree.get_mut(parent) {
            parent.append_id(child);
        }
    }

    fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_insert(parent, child) {
            return;
        }
        if let Some(mut parent) = self.html.tree.get_mut(parent) {
            parent.prepend_id(child);
        }
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if reference == node {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if !self.can_insert(parent, node) {
            return;
        }
        if let Some(mut reference) = self.html.tree.get_mut(reference) {
            reference.insert_id_after(node);
        }
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if self.element(node).is_none() {
            return;
        }
        let mut style = self.inline_style(node);
        if visible {
            if style.get("display") == Some("none") {
                style.remove("display");
            }
            if self.attribute(node, "hidden").is_some() {
                self.set_attribute(node, "hidden", None);
            }
        } else {
            style.set("display", "none".to_string());
        }
        self.write_style(node, &style);
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.element(node).is_none_or(|el| {
            el.attr("hidden").is_none()
                && InlineStyle::parse(el.attr("style").unwrap_or_default()).get("display")
                    != Some("none")
        })
    }

    fn dimension(&self, node: NodeId, dimension: Dimension) -> u32 {
        let Some(el) = self.element(node) else {
            return 0;
        };
        InlineStyle::parse(el.attr("style").unwrap_or_default())
            .pixels(dimension.as_str())
            .or_else(|| {
                el.attr(&format!("data-{}", dimension.as_str()))
                    .and_then(style::parse_pixels)
            })
            .unwrap_or(0)
    }

    fn set_dimension(&mut self, node: NodeId, dimension: Dimension, px: u32) {
        if self.element(node).is_none() {
            return;
        }
        let mut style = self.inline_style(node);
        style.set(dimension.as_str(), format!("{px}px"));
        self.write_style(node, &style);
    }

    fn bind_signal(&mut self, node: NodeId, name: &str, handler: SignalHandler<Self>) {
        if self
            .signals
            .insert((node, name.to_string()), handler)
            .is_some()
        {
            tracing::debug!(?node, signal = name, "replaced signal handler");
        }
    }

    fn trigger_signal(&mut self, node: NodeId, name: &str) -> bool {
        let Some(handler) = self.signals.get(&(node, name.to_string())).cloned() else {
            tracing::debug!(?node, signal = name, "no handler bound");
            return false;
        };
        handler(self, node);
        true
    }

    fn is_bound(&self, node: NodeId, name: &str) -> bool {
        self.signals.contains_key(&(node, name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn first(doc: &MemoryDocument, selector: &str) -> NodeId {
        doc.query_first(None, selector).unwrap()
    }

    #[test]
    fn should_parse_and_serialize_page() {
        let html = r#"<div id="box"><p class="title">Hello</p></div>"#;
        let doc = MemoryDocument::parse(html);
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn should_repair_malformed_page() {
        let doc = MemoryDocument::parse("<div><p>open");
        assert_eq!(doc.to_html(), "<div><p>open</p></div>");
    }

    #[test]
    fn should_query_within_scope_only() {
        let doc = MemoryDocument::parse(
            r#"<div id="a"><span class="x"></span></div><div id="b"><span class="x"></span></div>"#,
        );
        let a = first(&doc, "#a");
        assert_eq!(doc.query(Some(a), ".x").len(), 1);
        assert_eq!(doc.query(None, ".x").len(), 2);
        assert!(doc.query(Some(a), "#a").is_empty());
    }

    #[test]
    fn should_never_match_the_root() {
        let doc = MemoryDocument::parse("<p></p>");
        assert!(doc.select("html").is_empty());
        assert_eq!(doc.select("*"), vec![first(&doc, "p")]);
    }

    #[test]
    fn should_match_nothing_for_invalid_selector() {
        let doc = MemoryDocument::parse("<p></p>");
        assert!(doc.query(None, "[[").is_empty());
        assert!(doc.query_first(None, "p >").is_none());
    }

    #[test]
    fn should_find_by_class_in_document_order() {
        let doc = MemoryDocument::parse(
            r#"<div id="c"><i class="m" id="one"></i><p><b class="m" id="two"></b></p></div>"#,
        );
        let c = first(&doc, "#c");
        let found: Vec<_> = doc
            .find_by_class(c, "m")
            .into_iter()
            .map(|n| doc.attribute(n, "id").unwrap().to_string())
            .collect();
        assert_eq!(found, vec!["one", "two"]);
    }

    #[test]
    fn should_insert_after_reference() {
        let mut doc = MemoryDocument::parse(r#"<ul><li id="a"></li><li id="c"></li></ul>"#);
        let a = first(&doc, "#a");
        let b = doc.create_element("li");
        doc.insert_after(a, b);
        assert_eq!(
            doc.to_html(),
            r#"<ul><li id="a"></li><li></li><li id="c"></li></ul>"#
        );
    }

    #[test]
    fn should_ignore_insert_after_detached_reference() {
        let mut doc = MemoryDocument::new();
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        doc.insert_after(a, b);
        assert_eq!(doc.parent(b), None);
    }

    #[test]
    fn should_move_node_on_append() {
        let mut doc = MemoryDocument::parse(r#"<div id="a"><i></i></div><div id="b"></div>"#);
        let i = first(&doc, "i");
        let b = first(&doc, "#b");
        doc.append_child(b, i);
        assert_eq!(
            doc.to_html(),
            r#"<div id="a"></div><div id="b"><i></i></div>"#
        );
    }

    #[test]
    fn should_prepend_child() {
        let mut doc = MemoryDocument::parse("<div><p></p></div>");
        let div = first(&doc, "div");
        let span = doc.create_element("span");
        doc.prepend_child(div, span);
        assert_eq!(doc.to_html(), "<div><span></span><p></p></div>");
    }

    #[test]
    fn should_refuse_to_create_cycle() {
        let mut doc = MemoryDocument::parse("<div><p></p></div>");
        let div = first(&doc, "div");
        let p = first(&doc, "p");
        doc.append_child(p, div);
        doc.append_child(div, div);
        assert_eq!(doc.parent(p), Some(div));
        assert_eq!(doc.parent(div), Some(doc.root()));
    }

    #[test]
    fn should_detach_on_remove_and_allow_reinsert() {
        let mut doc = MemoryDocument::parse("<div><p></p></div>");
        let div = first(&doc, "div");
        let p = first(&doc, "p");
        doc.remove(p);
        assert!(!doc.is_attached(p));
        assert_eq!(doc.to_html(), "<div></div>");
        doc.append_child(div, p);
        assert!(doc.is_attached(p));
    }

    #[test]
    fn should_set_text_as_single_text_node() {
        let mut doc = MemoryDocument::parse("<span><b>old</b></span>");
        let span = first(&doc, "span");
        doc.set_text(span, "a < b");
        assert_eq!(doc.to_html(), "<span>a &lt; b</span>");
        assert_eq!(doc.text_content(span), "a < b");
        assert_eq!(doc.children(span).len(), 1);
    }

    #[test]
    fn should_return_detached_roots_from_parse_fragment() {
        let mut doc = MemoryDocument::new();
        let roots = doc.parse_fragment(" <i></i> <!-- note --> <b>x</b>\n");
        assert_eq!(roots.len(), 2);
        assert_eq!(doc.tag(roots[0]), Some("i"));
        assert_eq!(doc.text_content(roots[1]), "x");
        assert!(roots.iter().all(|n| doc.parent(*n).is_none()));
        assert_eq!(doc.to_html(), "");
    }

    #[test]
    fn should_report_text_roots_as_non_elements() {
        let mut doc = MemoryDocument::new();
        let roots = doc.parse_fragment("Loading");
        assert_eq!(roots.len(), 1);
        assert!(!doc.is_element(roots[0]));
        assert!(!doc.has_class(roots[0], "spinner"));
    }

    #[test]
    fn should_decode_entities_in_fragments() {
        let mut doc = MemoryDocument::new();
        let roots = doc.parse_fragment("<span>Loading&hellip; &amp; more</span>");
        assert_eq!(doc.text_content(roots[0]), "Loading\u{2026} & more");
    }

    #[test]
    fn should_add_classes_once_and_keep_element_content() {
        let mut doc = MemoryDocument::parse(r#"<div class="icon" id="x" title="t"><b>k</b></div>"#);
        let div = first(&doc, "div");
        doc.add_class(div, "spinner busy");
        doc.add_class(div, "busy");

        assert!(doc.has_class(div, "icon spinner busy"));
        assert_eq!(doc.attribute(div, "class"), Some("icon spinner busy"));
        assert_eq!(doc.attribute(div, "id"), Some("x"));
        assert_eq!(doc.attribute(div, "title"), Some("t"));
        assert_eq!(doc.inner_html(div), "<b>k</b>");
    }

    #[test]
    fn should_select_by_class_added_after_parsing() {
        let mut doc = MemoryDocument::parse(r#"<p id="p"></p>"#);
        let p = first(&doc, "#p");
        assert!(doc.select(".busy").is_empty());
        doc.add_class(p, "busy");
        assert_eq!(doc.select(".busy"), vec![p]);
        assert_eq!(doc.select("#p.busy"), vec![p]);
    }

    #[test]
    fn should_hide_and_show() {
        let mut doc = MemoryDocument::parse("<form></form>");
        let form = first(&doc, "form");
        doc.set_visible(form, false);
        assert!(!doc.is_visible(form));
        assert_eq!(doc.to_html(), r#"<form style="display: none"></form>"#);
        doc.set_visible(form, true);
        assert!(doc.is_visible(form));
        assert_eq!(doc.to_html(), "<form></form>");
    }

    #[test]
    fn should_keep_other_inline_style_when_showing() {
        let mut doc = MemoryDocument::parse(r#"<p style="color: red; display: none"></p>"#);
        let p = first(&doc, "p");
        assert!(!doc.is_visible(p));
        doc.set_visible(p, true);
        assert_eq!(doc.attribute(p, "style"), Some("color: red"));
    }

    #[test]
    fn should_show_element_hidden_by_attribute() {
        let mut doc = MemoryDocument::parse("<p hidden>x</p>");
        let p = first(&doc, "p");
        assert!(!doc.is_visible(p));
        doc.set_visible(p, true);
        assert!(doc.is_visible(p));
        assert_eq!(doc.to_html(), "<p>x</p>");
    }

    #[test]
    fn should_compute_dimensions_from_data_attributes() {
        let mut doc = MemoryDocument::parse(r#"<div data-height="120" data-width="80px"></div>"#);
        let div = first(&doc, "div");
        assert_eq!(doc.dimension(div, Dimension::Height), 120);
        assert_eq!(doc.dimension(div, Dimension::Width), 80);

        doc.set_dimension(div, Dimension::Height, 200);
        assert_eq!(doc.dimension(div, Dimension::Height), 200);
        assert_eq!(doc.attribute(div, "style"), Some("height: 200px"));
    }

    #[test]
    fn should_prefer_inline_style_dimension() {
        let doc = MemoryDocument::parse(r#"<div data-width="80" style="width: 64px"></div>"#);
        assert_eq!(doc.dimension(first(&doc, "div"), Dimension::Width), 64);
    }

    #[test]
    fn should_keep_last_signal_binding() {
        let mut doc = MemoryDocument::parse("<div></div>");
        let div = first(&doc, "div");
        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first_calls);
        doc.bind_signal(
            div,
            "detach",
            Rc::new(move |_: &mut MemoryDocument, _: NodeId| {
                counter.set(counter.get() + 1);
            }),
        );
        let counter = Rc::clone(&second_calls);
        doc.bind_signal(
            div,
            "detach",
            Rc::new(move |_: &mut MemoryDocument, _: NodeId| {
                counter.set(counter.get() + 1);
            }),
        );

        assert!(doc.trigger_signal(div, "detach"));
        assert_eq!(first_calls.get(), 0);
        assert_eq!(second_calls.get(), 1);
    }

    #[test]
    fn should_let_handler_mutate_document() {
        let mut doc = MemoryDocument::parse(r#"<div><i class="spinner"></i></div>"#);
        let div = first(&doc, "div");
        doc.bind_signal(
            div,
            "detach",
            Rc::new(|doc: &mut MemoryDocument, node: NodeId| {
                for spinner in doc.find_by_class(node, "spinner") {
                    doc.remove(spinner);
                }
            }),
        );
        assert!(doc.trigger_signal(div, "detach"));
        assert_eq!(doc.to_html(), "<div></div>");
    }

    #[test]
    fn should_report_unbound_signal() {
        let mut doc = MemoryDocument::parse("<div></div>");
        let div = first(&doc, "div");
        assert!(!doc.is_bound(div, "detach"));
        assert!(!doc.trigger_signal(div, "detach"));
    }
}
