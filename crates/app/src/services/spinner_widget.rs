//! Spinner widget — attach a loading indicator to a container and remove it
//! again when the container receives the detach signal.

use std::cell::Cell;
use std::rc::Rc;

use spinkit_domain::config::{Dimension, SpinnerConfig};
use spinkit_domain::error::{FragmentKind, SpinnerError, UndefinedMarkupError};
use spinkit_domain::options::SpinnerOptions;
use spinkit_domain::placement::Placement;

use crate::ports::{Document, SignalHandler};

/// Name of the signal that tears a spinner down.
pub const DETACH_SIGNAL: &str = "detach";

/// Application service attaching spinners to document containers.
#[derive(Debug, Clone, Default)]
pub struct SpinnerWidget {
    defaults: SpinnerConfig,
}

impl SpinnerWidget {
    /// Create a widget whose options are merged over `defaults`.
    #[must_use]
    pub fn new(defaults: SpinnerConfig) -> Self {
        Self { defaults }
    }

    /// Attach a spinner to the first element of `selection` and bind the
    /// detach handler on it. Returns `selection` for chaining.
    ///
    /// An empty selection is logged and leaves the document untouched. When
    /// the container still carries a spinner from an earlier attach, that
    /// spinner is detached first, so hidden targets come back and the
    /// dimensions captured for the new spinner are the original ones.
    ///
    /// # Errors
    ///
    /// Returns [`SpinnerError::UndefinedMarkup`] when custom spinner or text
    /// markup does not have exactly one root element. This is reported
    /// before the document is modified.
    pub fn attach<'s, D>(
        &self,
        doc: &mut D,
        selection: &'s [D::Node],
        options: SpinnerOptions,
    ) -> Result<&'s [D::Node], SpinnerError>
    where
        D: Document + 'static,
    {
        let container = match first_match(selection) {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(error = %err, "spinner attach skipped");
                return Ok(selection);
            }
        };

        let config = options.resolve(&self.defaults);

        let spinner = build_spinner(doc, &config)?;
        let text = match build_text(doc, &config) {
            Ok(text) => text,
            Err(err) => {
                doc.remove(spinner);
                return Err(err);
            }
        };

        if doc.is_bound(container, DETACH_SIGNAL) {
            tracing::debug!(?container, "detaching previous spinner");
            doc.trigger_signal(container, DETACH_SIGNAL);
        }
        remove_markers(doc, container, &config);

        let mut fragment = order_fragment(spinner, text, config.text_first);
        if let Some(selector) = &config.container_selector
            && let Some(wrapper) = doc.query_first(None, selector)
        {
            doc.replace_content(wrapper, &fragment);
            fragment = vec![wrapper];
        }

        if config.clear_container_content {
            doc.clear_content(container);
        }

        let (placement, replaced) = place(doc, container, &fragment, &config);

        let mut snapshot = DimensionSnapshot::default();
        for dimension in Dimension::ALL {
            if let Some(px) = config.resize(dimension) {
                snapshot.capture(dimension, doc.dimension(container, dimension));
                doc.set_dimension(container, dimension, px);
            }
        }

        tracing::debug!(
            ?container,
            ?placement,
            text = text.is_some(),
            "spinner attached"
        );

        let plan = Rc::new(DetachPlan {
            config,
            container,
            replaced: replaced.map(|target| Replaced {
                target,
                siblings: fragment,
            }),
            snapshot,
            settled: Cell::new(false),
        });
        let handler: SignalHandler<D> = Rc::new(move |doc: &mut D, receiver: D::Node| {
            plan.run(doc, receiver);
        });
        doc.bind_signal(container, DETACH_SIGNAL, handler);

        Ok(selection)
    }

    /// Fire the detach signal on the first element of `selection`.
    /// Returns whether a spinner handler ran.
    pub fn detach<D: Document>(&self, doc: &mut D, selection: &[D::Node]) -> bool {
        match first_match(selection) {
            Ok(container) => doc.trigger_signal(container, DETACH_SIGNAL),
            Err(err) => {
                tracing::warn!(error = %err, "spinner detach skipped");
                false
            }
        }
    }
}

fn first_match<N: Copy>(selection: &[N]) -> Result<N, SpinnerError> {
    selection.first().copied().ok_or(SpinnerError::NoContainer)
}

fn build_spinner<D: Document>(
    doc: &mut D,
    config: &SpinnerConfig,
) -> Result<D::Node, SpinnerError> {
    let node = match &config.custom_spinner_markup {
        Some(markup) => parse_single_root(doc, markup, FragmentKind::Spinner)?,
        None => {
            let node = doc.create_element("i");
            doc.add_class(node, &config.spinner_markup_class);
            node
        }
    };
    ensure_class(doc, node, &config.spinner_marker);
    Ok(node)
}

fn build_text<D: Document>(
    doc: &mut D,
    config: &SpinnerConfig,
) -> Result<Option<D::Node>, SpinnerError> {
    let node = if let Some(markup) = &config.custom_text_markup {
        parse_single_root(doc, markup, FragmentKind::Text)?
    } else if let Some(text) = &config.text {
        let node = doc.create_element("span");
        doc.set_text(node, text);
        node
    } else {
        return Ok(None);
    };
    ensure_class(doc, node, &config.text_marker);
    Ok(Some(node))
}

fn parse_single_root<D: Document>(
    doc: &mut D,
    markup: &str,
    kind: FragmentKind,
) -> Result<D::Node, SpinnerError> {
    let roots = doc.parse_fragment(markup);
    match roots.as_slice() {
        [root] if doc.is_element(*root) => Ok(*root),
        _ => Err(UndefinedMarkupError {
            kind,
            roots: roots.len(),
        }
        .into()),
    }
}

fn ensure_class<D: Document>(doc: &mut D, node: D::Node, class: &str) {
    if !doc.has_class(node, class) {
        doc.add_class(node, class);
    }
}

/// Spinner and optional text, text first when requested.
fn order_fragment<N>(spinner: N, text: Option<N>, text_first: bool) -> Vec<N> {
    match text {
        Some(text) if text_first => vec![text, spinner],
        Some(text) => vec![spinner, text],
        None => vec![spinner],
    }
}

fn remove_markers<D: Document>(doc: &mut D, scope: D::Node, config: &SpinnerConfig) {
    for marker in config.markers() {
        for node in doc.find_by_class(scope, marker) {
            doc.remove(node);
        }
    }
}

/// Insert `fragment` using the first applicable strategy. Returns the
/// strategy used and the element hidden by a replace strategy, if any.
fn place<D: Document>(
    doc: &mut D,
    container: D::Node,
    fragment: &[D::Node],
    config: &SpinnerConfig,
) -> (Placement, Option<D::Node>) {
    for placement in config.placement_candidates() {
        match placement {
            Placement::ReplaceContainer => {
                if doc.parent(container).is_none() {
                    continue;
                }
                insert_after_all(doc, container, fragment);
                doc.set_visible(container, false);
                return (Placement::ReplaceContainer, Some(container));
            }
            Placement::ReplaceTarget(selector) => {
                let Some(target) = doc.query_first(None, &selector) else {
                    continue;
                };
                if doc.parent(target).is_none() {
                    continue;
                }
                insert_after_all(doc, target, fragment);
                doc.set_visible(target, false);
                return (Placement::ReplaceTarget(selector), Some(target));
            }
            Placement::Prepend => {
                for node in fragment.iter().rev() {
                    doc.prepend_child(container, *node);
                }
                return (Placement::Prepend, None);
            }
            Placement::InsertAfter(selector) => {
                let Some(anchor) = doc.query_first(Some(container), &selector) else {
                    continue;
                };
                insert_after_all(doc, anchor, fragment);
                return (Placement::InsertAfter(selector), None);
            }
            Placement::Append => break,
        }
    }
    for node in fragment {
        doc.append_child(container, *node);
    }
    (Placement::Append, None)
}

fn insert_after_all<D: Document>(doc: &mut D, reference: D::Node, fragment: &[D::Node]) {
    let mut anchor = reference;
    for node in fragment {
        doc.insert_after(anchor, *node);
        anchor = *node;
    }
}

/// Container dimensions captured before a resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DimensionSnapshot {
    height: Option<u32>,
    width: Option<u32>,
}

impl DimensionSnapshot {
    fn capture(&mut self, dimension: Dimension, px: u32) {
        match dimension {
            Dimension::Height => self.height = Some(px),
            Dimension::Width => self.width = Some(px),
        }
    }

    fn original(&self, dimension: Dimension) -> Option<u32> {
        match dimension {
            Dimension::Height => self.height,
            Dimension::Width => self.width,
        }
    }
}

/// Element hidden by a replace strategy and the nodes inserted next to it.
#[derive(Debug)]
struct Replaced<N> {
    target: N,
    siblings: Vec<N>,
}

/// Everything the detach handler needs, captured at attach time.
#[derive(Debug)]
struct DetachPlan<N> {
    config: SpinnerConfig,
    container: N,
    replaced: Option<Replaced<N>>,
    snapshot: DimensionSnapshot,
    settled: Cell<bool>,
}

impl<N: Copy + std::fmt::Debug> DetachPlan<N> {
    fn run<D: Document<Node = N>>(&self, doc: &mut D, receiver: N) {
        remove_markers(doc, receiver, &self.config);

        // Showing and restoring happen once; a later run only cleans up.
        if self.settled.replace(true) {
            tracing::debug!(container = ?self.container, "spinner already detached");
            return;
        }

        if let Some(replaced) = &self.replaced {
            for sibling in &replaced.siblings {
                remove_marked(doc, *sibling, &self.config);
            }
            doc.set_visible(replaced.target, true);
        }

        // Each dimension restores on its own flag.
        for dimension in Dimension::ALL {
            if let (Some(_), Some(original)) = (
                self.config.resize(dimension),
                self.snapshot.original(dimension),
            ) {
                doc.set_dimension(self.container, dimension, original);
            }
        }

        tracing::debug!(container = ?self.container, ?receiver, "spinner detached");
    }
}

/// Remove `node` when it carries a marker, else the markers inside it.
fn remove_marked<D: Document>(doc: &mut D, node: D::Node, config: &SpinnerConfig) {
    if config.markers().iter().any(|marker| doc.has_class(node, marker)) {
        doc.remove(node);
    } else {
        remove_markers(doc, node, config);
    }
}
