//! Region extractors: placeholder elements to region descriptors.
//!
//! Each extractor parses the HTML into a disposable tree, claims the
//! elements following its capability's id convention, gives each one an
//! id scoped to the content instance and records a descriptor. Input with
//! no candidate marker is returned as-is without being parsed.

mod drop_zone;
mod glossary;
mod inline_question;
mod table;

use crate::context::RenderContext;
use crate::dom::{self, Node};
use crate::mount::Resolver;
use crate::region::{Capability, REGION_ATTR};

/// One extraction stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extractor {
    /// Lift top-level tables into separately described units.
    AccessibleTables,
    DropZones,
    InlineQuestions,
    GlossaryTerms,
}

/// Stage order for top-level content.
///
/// Tables go first so that markers inside them are claimed by the table's
/// own sub-pipeline, not by the document-wide stages.
pub const FULL: &[Extractor] = &[
    Extractor::AccessibleTables,
    Extractor::DropZones,
    Extractor::InlineQuestions,
    Extractor::GlossaryTerms,
];

/// Stage order inside a lifted table: no table re-extraction.
pub const RESTRICTED: &[Extractor] = &[
    Extractor::DropZones,
    Extractor::InlineQuestions,
    Extractor::GlossaryTerms,
];

impl Extractor {
    /// Capabilities this stage can produce.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::AccessibleTables => &[Capability::AccessibleTable],
            Self::DropZones => &[Capability::DropZone],
            Self::InlineQuestions => &[Capability::InlineQuestion],
            Self::GlossaryTerms => &[Capability::GlossaryInline, Capability::GlossaryFull],
        }
    }

    /// Run this stage over `html`.
    pub fn extract(self, html: &str, ctx: &RenderContext<'_>) -> Extraction {
        match self {
            Self::AccessibleTables => table::extract(html, ctx),
            Self::DropZones => drop_zone::extract(html, ctx),
            Self::InlineQuestions => inline_question::extract(html, ctx),
            Self::GlossaryTerms => glossary::extract(html, ctx),
        }
    }
}

/// Output of one extraction stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    pub html: String,
    pub resolver: Resolver,
    pub warnings: Vec<String>,
}

impl Extraction {
    /// The input, untouched, with nothing to resolve.
    pub(crate) fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_owned(),
            ..Self::default()
        }
    }

    pub(crate) fn unchanged_with_warning(html: &str, warning: String) -> Self {
        Self {
            html: html.to_owned(),
            resolver: Resolver::new(),
            warnings: vec![warning],
        }
    }
}

/// Parse `html` for an extractor, downgrading failure to a warning.
fn parse_or_warn(html: &str, stage: &str) -> Result<Node, Extraction> {
    dom::parse(html).map_err(|err| {
        tracing::warn!(error = %err, stage, "Could not parse content, stage skipped");
        Extraction::unchanged_with_warning(html, format!("{stage}: {err}"))
    })
}

/// Paths of unclaimed elements whose id starts with `prefix`.
fn unclaimed_with_id_prefix(root: &Node, prefix: &str) -> Vec<Vec<usize>> {
    root.paths_where(|node| {
        !node.has_attr(REGION_ATTR) && node.id().is_some_and(|id| id.starts_with(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::InstancePrefix;

    #[test]
    fn test_restricted_is_full_without_tables() {
        let without_tables: Vec<Extractor> = FULL
            .iter()
            .copied()
            .filter(|e| *e != Extractor::AccessibleTables)
            .collect();
        assert_eq!(without_tables, RESTRICTED);
    }

    #[test]
    fn test_every_capability_has_one_extractor() {
        for capability in Capability::ALL {
            let owners = FULL
                .iter()
                .filter(|e| e.capabilities().contains(&capability))
                .count();
            assert_eq!(owners, 1, "{capability}");
        }
    }

    #[test]
    fn test_unparseable_input_is_noop_with_warning() {
        let ctx = RenderContext::new(InstancePrefix::new("x").unwrap());
        let html = r#"<p>ok</p><span id="drop-region-0" data-index="0""#;
        let extraction = Extractor::DropZones.extract(html, &ctx);
        assert_eq!(extraction.html, html);
        assert!(extraction.resolver.is_empty());
        assert_eq!(extraction.warnings.len(), 1);
    }
}
