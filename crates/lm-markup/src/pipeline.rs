//! Pipeline orchestrator: an ordered fold over extractor stages.

use crate::context::RenderContext;
use crate::extract::{Extraction, Extractor};

/// Run `extractors` in order, feeding each stage the previous stage's HTML.
///
/// Resolvers and warnings are concatenated in stage order.
///
/// ```
/// use lm_markup::{InstancePrefix, RenderContext, FULL, run};
///
/// let ctx = RenderContext::new(InstancePrefix::new("doc").unwrap());
/// let out = run(r#"<p><span id="drop-region-0" data-index="0"></span></p>"#, FULL, &ctx);
/// assert!(out.html.contains(r#"id="drop-region-doc-0""#));
/// assert_eq!(out.resolver.descriptors().len(), 1);
/// ```
pub fn run(html: &str, extractors: &[Extractor], ctx: &RenderContext<'_>) -> Extraction {
    extractors.iter().fold(Extraction::unchanged(html), |mut acc, stage| {
        let next = stage.extract(&acc.html, ctx);
        acc.html = next.html;
        acc.resolver.extend(next.resolver);
        acc.warnings.extend(next.warnings);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{FULL, RESTRICTED};
    use crate::glossary::GlossaryTerm;
    use crate::region::{Capability, InstancePrefix};
    use pretty_assertions::assert_eq;

    const MIXED: &str = concat!(
        r#"<p><span data-type="inline" id="glossary-term-atom">Loading glossary...</span>"#,
        r#"<span id="inline-question-q1"></span>"#,
        r#"<span id="drop-region-0" data-index="0"></span></p>"#,
    );

    #[test]
    fn test_stage_order_decides_region_order() {
        let terms = vec![GlossaryTerm::new("atom").with_value("Atom")];
        let ctx = RenderContext::new(InstancePrefix::new("m").unwrap()).with_glossary(&terms);
        let out = run(MIXED, FULL, &ctx);

        let kinds: Vec<Capability> = out.resolver.descriptors().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Capability::DropZone,
                Capability::InlineQuestion,
                Capability::GlossaryInline
            ]
        );
    }

    #[test]
    fn test_empty_list_is_identity() {
        let ctx = RenderContext::new(InstancePrefix::new("m").unwrap());
        let out = run(MIXED, &[], &ctx);
        assert_eq!(out.html, MIXED);
        assert!(out.resolver.is_empty());
    }

    #[test]
    fn test_restricted_leaves_tables_in_place() {
        let ctx = RenderContext::new(InstancePrefix::new("m").unwrap());
        let html = "<table><tr><td>x</td></tr></table>";
        let out = run(html, RESTRICTED, &ctx);
        assert_eq!(out.html, html);
    }
}
