//! Inline `style` attribute editing.
//!
//! Visibility and forced sizes live in the element's own `style`
//! attribute, the way a browser renders them, so serializing the tree
//! shows them without extra bookkeeping.

/// Declarations of a `style` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InlineStyle(Vec<(String, String)>);

impl InlineStyle {
    pub(crate) fn parse(style: &str) -> Self {
        Self(
            style
                .split(';')
                .filter_map(|declaration| declaration.split_once(':'))
                .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim()))
                .filter(|(property, value)| !property.is_empty() && !value.is_empty())
                .map(|(property, value)| (property, value.to_string()))
                .collect(),
        )
    }

    pub(crate) fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set(&mut self, property: &str, value: String) {
        match self.0.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((property.to_string(), value)),
        }
    }

    pub(crate) fn remove(&mut self, property: &str) {
        self.0.retain(|(name, _)| name != property);
    }

    /// Pixel value of `property`, accepting a bare number or a `px` suffix.
    pub(crate) fn pixels(&self, property: &str) -> Option<u32> {
        self.get(property).and_then(parse_pixels)
    }

    /// Serialized form, `None` once no declaration is left.
    pub(crate) fn render(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

pub(crate) fn parse_pixels(value: &str) -> Option<u32> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}
