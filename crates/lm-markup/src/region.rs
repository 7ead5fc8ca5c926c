//! Region descriptors and instance-scoped ids.

use std::collections::BTreeMap;
use std::fmt;

use crate::MarkupError;

/// Attribute stamped on every element an extractor has claimed.
///
/// Extractors skip elements that already carry it, so compiling the
/// output of a previous compile never claims the same element twice.
pub const REGION_ATTR: &str = "data-region";

/// Interactive content kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Capability {
    GlossaryInline,
    GlossaryFull,
    DropZone,
    InlineQuestion,
    AccessibleTable,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 5] = [
        Capability::GlossaryInline,
        Capability::GlossaryFull,
        Capability::DropZone,
        Capability::InlineQuestion,
        Capability::AccessibleTable,
    ];

    /// Stable camelCase name, as written to `data-region`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlossaryInline => "glossaryInline",
            Self::GlossaryFull => "glossaryFull",
            Self::DropZone => "dropZone",
            Self::InlineQuestion => "inlineQuestion",
            Self::AccessibleTable => "accessibleTable",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mount point for a live widget.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionDescriptor {
    /// Id of the target element, unique within the content instance.
    pub id: String,
    /// Widget kind to mount.
    pub kind: Capability,
    /// Capability-specific settings (sizes, term ids, display text).
    pub metadata: BTreeMap<String, String>,
}

/// A descriptor whose target element was found in a mounted root.
pub type LiveRegion = RegionDescriptor;

impl RegionDescriptor {
    pub fn new(id: impl Into<String>, kind: Capability) -> Self {
        Self {
            id: id.into(),
            kind,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }

    /// Add an entry only when a value is present.
    #[must_use]
    pub fn with_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Caller-supplied disambiguator folded into every region id.
///
/// Two content blocks shown on the same page must use different prefixes.
/// Reusing the same prefix for the same logical content keeps ids stable
/// across re-renders. Region ids read `{kind}-{prefix}-{ordinal}`; user
/// prefixes never contain `-` and derived prefixes join segments with
/// `--`, so distinct prefixes always give distinct ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstancePrefix(String);

const CHILD_SEPARATOR: &str = "--";

impl InstancePrefix {
    /// Create a prefix from ASCII letters, digits and `_`.
    ///
    /// ```
    /// use lm_markup::InstancePrefix;
    ///
    /// assert!(InstancePrefix::new("q1_part_a").is_ok());
    /// assert!(InstancePrefix::new("q1-part").is_err());
    /// assert!(InstancePrefix::new("has space").is_err());
    /// ```
    pub fn new(prefix: impl Into<String>) -> Result<Self, MarkupError> {
        let prefix = prefix.into();
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self(prefix))
        } else {
            Err(MarkupError::InvalidPrefix(prefix))
        }
    }

    /// Draw a fresh 8-character prefix.
    ///
    /// Ids built from a random prefix differ between runs, so only use this
    /// where nothing depends on re-rendering the same content to the same ids.
    pub fn random() -> Self {
        let mut simple = uuid::Uuid::new_v4().simple().to_string();
        simple.truncate(8);
        Self(simple)
    }

    /// Derive a nested prefix, e.g. for the content of a lifted table.
    ///
    /// The result can never equal a prefix accepted by [`InstancePrefix::new`].
    #[must_use]
    pub fn child(&self, suffix: &str) -> Self {
        Self(format!("{}{CHILD_SEPARATOR}{suffix}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstancePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capability_names_are_distinct() {
        let names: std::collections::HashSet<&str> =
            Capability::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn test_descriptor_metadata() {
        let region = RegionDescriptor::new("drop-region-q-0", Capability::DropZone)
            .with("width", "100")
            .with_opt("classes", None::<String>);
        assert_eq!(region.get("width"), Some("100"));
        assert_eq!(region.get("classes"), None);
    }

    #[test]
    fn test_prefix_rejects_empty() {
        assert!(matches!(
            InstancePrefix::new(""),
            Err(MarkupError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_prefix_child() {
        let prefix = InstancePrefix::new("q1").unwrap();
        assert_eq!(prefix.child("t0").as_str(), "q1--t0");
    }

    #[test]
    fn test_prefix_rejects_hyphen() {
        assert!(matches!(
            InstancePrefix::new("x-t0"),
            Err(MarkupError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_child_prefix_is_not_a_user_prefix() {
        let child = InstancePrefix::new("x").unwrap().child("t0");
        assert!(InstancePrefix::new(child.as_str()).is_err());
    }

    #[test]
    fn test_random_prefix_is_valid() {
        let prefix = InstancePrefix::random();
        assert_eq!(prefix.as_str().len(), 8);
        assert!(InstancePrefix::new(prefix.as_str()).is_ok());
    }
}
