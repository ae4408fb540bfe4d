//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! Only caller misuse produces an error: a missing container or custom
//! markup that does not have exactly one root element.

use std::fmt;

/// Top-level error for spinner operations.
#[derive(Debug, thiserror::Error)]
pub enum SpinnerError {
    /// The container selection resolved to no element.
    #[error("no container element to attach the spinner to")]
    NoContainer,

    /// Custom markup did not resolve to exactly one root element.
    #[error("undefined markup")]
    UndefinedMarkup(#[from] UndefinedMarkupError),
}

/// Which generated fragment a markup error relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Spinner,
    Text,
}

impl FragmentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spinner => "spinner",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom markup must have exactly one top-level element so marker
/// classes can be attached to it and removed later.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("custom {kind} markup must have exactly one root element, found {roots}")]
pub struct UndefinedMarkupError {
    pub kind: FragmentKind,
    pub roots: usize,
}
