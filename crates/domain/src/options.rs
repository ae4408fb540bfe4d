//! Caller-supplied spinner options.
//!
//! Every field is optional. Options are merged field by field over an
//! immutable [`SpinnerConfig`] to produce the configuration used for a
//! single attach call. Options deserialize from the same JSON shape a host
//! page would pass (`camelCase`), and from `snake_case` TOML tables.

use serde::{Deserialize, Deserializer};

use crate::config::SpinnerConfig;

/// Element to hide and replace with the spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceTarget {
    /// Hide the container itself and insert the spinner next to it.
    Container,
    /// Hide the element matched by this selector and insert next to it.
    Selector(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplaceTargetRepr {
    Flag(bool),
    Selector(String),
}

impl ReplaceTarget {
    /// `None` for a blank selector, which cannot match anything.
    fn usable(self) -> Option<Self> {
        match self {
            Self::Selector(selector) if is_blank(&selector) => None,
            target => Some(target),
        }
    }
}

impl ReplaceTargetRepr {
    fn into_target(self) -> Option<ReplaceTarget> {
        match self {
            Self::Flag(true) => Some(ReplaceTarget::Container),
            Self::Flag(false) => None,
            Self::Selector(selector) => ReplaceTarget::Selector(selector).usable(),
        }
    }
}

fn deserialize_replace_target<'de, D>(deserializer: D) -> Result<Option<ReplaceTarget>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<ReplaceTargetRepr>::deserialize(deserializer)?;
    Ok(repr.and_then(ReplaceTargetRepr::into_target))
}

/// Per-call overrides. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinnerOptions {
    #[serde(alias = "spinner_markup_class")]
    pub spinner_markup_class: Option<String>,
    #[serde(alias = "spinner_marker")]
    pub spinner_marker: Option<String>,
    #[serde(alias = "text_marker")]
    pub text_marker: Option<String>,
    #[serde(alias = "container_selector")]
    pub container_selector: Option<String>,
    #[serde(
        alias = "replace_target",
        deserialize_with = "deserialize_replace_target"
    )]
    pub replace_target: Option<ReplaceTarget>,
    pub text: Option<String>,
    #[serde(alias = "custom_text_markup")]
    pub custom_text_markup: Option<String>,
    #[serde(alias = "custom_spinner_markup")]
    pub custom_spinner_markup: Option<String>,
    #[serde(alias = "text_first")]
    pub text_first: Option<bool>,
    #[serde(alias = "clear_container_content")]
    pub clear_container_content: Option<bool>,
    pub prepend: Option<bool>,
    #[serde(alias = "insert_after_selector")]
    pub insert_after_selector: Option<String>,
    #[serde(alias = "resize_height")]
    pub resize_height: Option<u32>,
    #[serde(alias = "resize_width")]
    pub resize_width: Option<u32>,
}

impl SpinnerOptions {
    /// Parse options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the input is not a
    /// JSON object of known option fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn spinner_markup_class(mut self, class: impl Into<String>) -> Self {
        self.spinner_markup_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn spinner_marker(mut self, marker: impl Into<String>) -> Self {
        self.spinner_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn text_marker(mut self, marker: impl Into<String>) -> Self {
        self.text_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn replace_container(mut self) -> Self {
        self.replace_target = Some(ReplaceTarget::Container);
        self
    }

    #[must_use]
    pub fn replace_selector(mut self, selector: impl Into<String>) -> Self {
        self.replace_target = Some(ReplaceTarget::Selector(selector.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn custom_text_markup(mut self, markup: impl Into<String>) -> Self {
        self.custom_text_markup = Some(markup.into());
        self
    }

    #[must_use]
    pub fn custom_spinner_markup(mut self, markup: impl Into<String>) -> Self {
        self.custom_spinner_markup = Some(markup.into());
        self
    }

    #[must_use]
    pub fn text_first(mut self, value: bool) -> Self {
        self.text_first = Some(value);
        self
    }

    #[must_use]
    pub fn clear_container_content(mut self, value: bool) -> Self {
        self.clear_container_content = Some(value);
        self
    }

    #[must_use]
    pub fn prepend(mut self, value: bool) -> Self {
        self.prepend = Some(value);
        self
    }

    #[must_use]
    pub fn insert_after_selector(mut self, selector: impl Into<String>) -> Self {
        self.insert_after_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn resize_height(mut self, px: u32) -> Self {
        self.resize_height = Some(px);
        self
    }

    #[must_use]
    pub fn resize_width(mut self, px: u32) -> Self {
        self.resize_width = Some(px);
        self
    }

    /// Merge these options over `defaults`, field by field.
    ///
    /// The caller value wins for every field it sets. Class names and
    /// selectors made only of whitespace count as unset, so marker classes
    /// can never be blanked out. Text and markup are unset only when empty.
    #[must_use]
    pub fn resolve(self, defaults: &SpinnerConfig) -> SpinnerConfig {
        SpinnerConfig {
            spinner_markup_class: non_blank(self.spinner_markup_class)
                .unwrap_or_else(|| defaults.spinner_markup_class.clone()),
            spinner_marker: non_blank(self.spinner_marker)
                .unwrap_or_else(|| defaults.spinner_marker.clone()),
            text_marker: non_blank(self.text_marker)
                .unwrap_or_else(|| defaults.text_marker.clone()),
            container_selector: non_blank(self.container_selector)
                .or_else(|| defaults.container_selector.clone()),
            replace_target: self
                .replace_target
                .and_then(ReplaceTarget::usable)
                .or_else(|| defaults.replace_target.clone()),
            text: non_empty(self.text).or_else(|| defaults.text.clone()),
            custom_text_markup: non_empty(self.custom_text_markup)
                .or_else(|| defaults.custom_text_markup.clone()),
            custom_spinner_markup: non_empty(self.custom_spinner_markup)
                .or_else(|| defaults.custom_spinner_markup.clone()),
            text_first: self.text_first.unwrap_or(defaults.text_first),
            clear_container_content: self
                .clear_container_content
                .unwrap_or(defaults.clear_container_content),
            prepend: self.prepend.unwrap_or(defaults.prepend),
            insert_after_selector: non_blank(self.insert_after_selector)
                .or_else(|| defaults.insert_after_selector.clone()),
            resize_height: self.resize_height.or(defaults.resize_height),
            resize_width: self.resize_width.or(defaults.resize_width),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(v))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
