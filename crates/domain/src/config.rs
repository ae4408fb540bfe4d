//! Resolved spinner configuration.

use crate::options::ReplaceTarget;

/// Class applied to the generated spinner element when no custom markup
/// is supplied.
pub const DEFAULT_SPINNER_MARKUP_CLASS: &str = "icon-spin icon-spinner";
/// Marker class locating spinner elements.
pub const DEFAULT_SPINNER_MARKER: &str = "spinner";
/// Marker class locating text elements.
pub const DEFAULT_TEXT_MARKER: &str = "spinner-text";

/// Configuration for one attach call, produced by
/// [`SpinnerOptions::resolve`](crate::options::SpinnerOptions::resolve).
///
/// [`SpinnerConfig::default`] is the immutable defaults record. A resolved
/// value is never mutated afterwards: the detach handler keeps its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerConfig {
    pub spinner_markup_class: String,
    pub spinner_marker: String,
    pub text_marker: String,
    pub container_selector: Option<String>,
    pub replace_target: Option<ReplaceTarget>,
    pub text: Option<String>,
    pub custom_text_markup: Option<String>,
    pub custom_spinner_markup: Option<String>,
    pub text_first: bool,
    pub clear_container_content: bool,
    pub prepend: bool,
    pub insert_after_selector: Option<String>,
    pub resize_height: Option<u32>,
    pub resize_width: Option<u32>,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            spinner_markup_class: DEFAULT_SPINNER_MARKUP_CLASS.to_string(),
            spinner_marker: DEFAULT_SPINNER_MARKER.to_string(),
            text_marker: DEFAULT_TEXT_MARKER.to_string(),
            container_selector: None,
            replace_target: None,
            text: None,
            custom_text_markup: None,
            custom_spinner_markup: None,
            text_first: false,
            clear_container_content: false,
            prepend: false,
            insert_after_selector: None,
            resize_height: None,
            resize_width: None,
        }
    }
}

/// A container dimension the spinner may force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Height,
    Width,
}

impl Dimension {
    pub const ALL: [Self; 2] = [Self::Height, Self::Width];

    /// CSS property name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Width => "width",
        }
    }
}

impl SpinnerConfig {
    /// Forced size for `dimension`, if any.
    #[must_use]
    pub fn resize(&self, dimension: Dimension) -> Option<u32> {
        match dimension {
            Dimension::Height => self.resize_height,
            Dimension::Width => self.resize_width,
        }
    }

    /// Marker classes, spinner first.
    #[must_use]
    pub fn markers(&self) -> [&str; 2] {
        [&self.spinner_marker, &self.text_marker]
    }
}
