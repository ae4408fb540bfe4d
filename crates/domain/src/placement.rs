//! Placement strategies and their priority order.
//!
//! Exactly one strategy applies per attach call. Selector-based strategies
//! only apply when their selector resolves, so callers walk
//! [`SpinnerConfig::placement_candidates`] and take the first that fits.

use crate::config::SpinnerConfig;
use crate::options::ReplaceTarget;

/// Where the combined spinner fragment goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Insert after the container, then hide the container.
    ReplaceContainer,
    /// Insert after the element matched by the selector, then hide it.
    ReplaceTarget(String),
    /// Insert as the first child of the container.
    Prepend,
    /// Insert after the container descendant matched by the selector.
    InsertAfter(String),
    /// Insert as the last child of the container.
    Append,
}

impl SpinnerConfig {
    /// Strategies enabled by this configuration, highest priority first.
    /// The list always ends with [`Placement::Append`].
    #[must_use]
    pub fn placement_candidates(&self) -> Vec<Placement> {
        let mut candidates = Vec::with_capacity(3);
        match &self.replace_target {
            Some(ReplaceTarget::Container) => candidates.push(Placement::ReplaceContainer),
            Some(ReplaceTarget::Selector(selector)) => {
                candidates.push(Placement::ReplaceTarget(selector.clone()));
            }
            None => {}
        }
        if self.prepend {
            candidates.push(Placement::Prepend);
        }
        if let Some(selector) = &self.insert_after_selector {
            candidates.push(Placement::InsertAfter(selector.clone()));
        }
        candidates.push(Placement::Append);
        candidates
    }
}
