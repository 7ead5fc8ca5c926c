//! Glossary term data supplied by the host.

/// A glossary entry.
///
/// Ids may contain `|` (e.g. `physics|momentum`); markers refer to them with
/// `|` replaced by `-`, see [`GlossaryTerm::marker_id`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlossaryTerm {
    pub id: String,
    /// Display label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<String>,
    /// Explanation as markdown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub explanation: Option<String>,
}

impl GlossaryTerm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Id as it appears in markers and element ids.
    pub fn marker_id(&self) -> String {
        marker_id(&self.id)
    }
}

/// Convert a term id to its element-id form.
pub(crate) fn marker_id(id: &str) -> String {
    id.replace('|', "-")
}
