//! Document port — the host document the spinner is attached to.
//!
//! The trait groups four capabilities: selection, mutation, markup parsing
//! and named signals. Nodes are opaque copyable handles; a node may be
//! detached (created or parsed but not yet inserted, or removed).

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use spinkit_domain::config::Dimension;

/// Handler bound to a named signal on a node. Receives the document and
/// the node the signal was triggered on.
pub type SignalHandler<D> = Rc<dyn Fn(&mut D, <D as Document>::Node)>;

/// A mutable tree of elements with class-based selection and signals.
pub trait Document {
    /// Handle to a node of this document.
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// All elements matching `selector` in document order.
    ///
    /// With a `scope`, only descendants of that node are considered (the
    /// scope itself never matches). Without one, the whole document is
    /// searched. An unsupported selector matches nothing.
    fn query(&self, scope: Option<Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// First element matching `selector`, see [`Document::query`].
    fn query_first(&self, scope: Option<Self::Node>, selector: &str) -> Option<Self::Node> {
        self.query(scope, selector).into_iter().next()
    }

    /// Descendants of `scope` carrying `class`, in document order.
    fn find_by_class(&self, scope: Self::Node, class: &str) -> Vec<Self::Node>;

    /// Whether `node` is an element (as opposed to text).
    fn is_element(&self, node: Self::Node) -> bool;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Create a detached, empty element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Parse `markup` into detached nodes and return the top-level ones.
    ///
    /// Parsing is lenient: malformed markup is repaired, never rejected.
    /// Comments and whitespace-only text at the top level are dropped;
    /// other top-level text is returned as its own node.
    fn parse_fragment(&mut self, markup: &str) -> Vec<Self::Node>;

    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Add each whitespace-separated class not already present.
    fn add_class(&mut self, node: Self::Node, class: &str);

    /// Replace the content of `node` with a single text node.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Replace the content of `node` with `content`, in order.
    fn replace_content(&mut self, node: Self::Node, content: &[Self::Node]) {
        self.clear_content(node);
        for child in content {
            self.append_child(node, *child);
        }
    }

    /// Detach every child of `node`.
    fn clear_content(&mut self, node: Self::Node);

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Move `child` to the start of `parent`'s children.
    fn prepend_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Move `node` right after `reference`. No-op when `reference` has no
    /// parent.
    fn insert_after(&mut self, reference: Self::Node, node: Self::Node);

    /// Detach `node` (and its subtree) from the document.
    fn remove(&mut self, node: Self::Node);

    fn set_visible(&mut self, node: Self::Node, visible: bool);

    fn is_visible(&self, node: Self::Node) -> bool;

    /// Computed size in pixels.
    fn dimension(&self, node: Self::Node, dimension: Dimension) -> u32;

    fn set_dimension(&mut self, node: Self::Node, dimension: Dimension, px: u32);

    /// Bind `handler` to the signal `name` on `node`. A later binding for
    /// the same node and name replaces the earlier one.
    fn bind_signal(&mut self, node: Self::Node, name: &str, handler: SignalHandler<Self>)
    where
        Self: Sized;

    /// Run the handler bound to `name` on `node`. Returns whether one ran.
    fn trigger_signal(&mut self, node: Self::Node, name: &str) -> bool;

    fn is_bound(&self, node: Self::Node, name: &str) -> bool;
}
