//! Glossary term extraction.
//!
//! Full-term blocks are swapped for an empty wrapper the host fills with
//! the rendered term. Inline terms keep their element, show their label
//! straight away and get a tooltip region.

use super::{Extraction, parse_or_warn, unclaimed_with_id_prefix};
use crate::context::{Environment, RenderContext};
use crate::dom::{self, Node};
use crate::glossary::GlossaryTerm;
use crate::mount::Resolver;
use crate::region::{Capability, REGION_ATTR, RegionDescriptor};

const ID_PREFIX: &str = "glossary-term-";
const REGION_ID_PREFIX: &str = "glossary-region-";

pub(super) fn extract(html: &str, ctx: &RenderContext<'_>) -> Extraction {
    let Some(terms) = ctx.glossary() else {
        tracing::debug!("Glossary not loaded, terms left as placeholders");
        return Extraction::unchanged(html);
    };
    if !html.contains(ID_PREFIX) {
        return Extraction::unchanged(html);
    }
    let mut root = match parse_or_warn(html, "glossary terms") {
        Ok(root) => root,
        Err(unchanged) => return unchanged,
    };

    let paths = unclaimed_with_id_prefix(&root, ID_PREFIX);
    if paths.is_empty() {
        return Extraction::unchanged(html);
    }

    let mut resolver = Resolver::new();
    let mut warnings = Vec::new();

    for (ordinal, path) in paths.iter().enumerate() {
        let Some(node) = root.at_path_mut(path) else {
            continue;
        };
        let term_id = node
            .id()
            .and_then(|id| id.strip_prefix(ID_PREFIX))
            .unwrap_or_default()
            .to_owned();
        let full = node.attr("data-type") == Some("full");

        let Some(term) = pick_term(terms, &term_id, &mut warnings) else {
            fallback(node, &term_id, ctx.environment(), &mut warnings);
            continue;
        };

        let id = format!("{REGION_ID_PREFIX}{}-{ordinal}", ctx.instance());
        if full {
            let region = RegionDescriptor::new(&id, Capability::GlossaryFull)
                .with("termId", &term.id)
                .with_opt("value", term.value.as_deref())
                .with_opt("explanation", term.explanation.as_deref());
            let wrapper = Node::new("div")
                .with_attr("class", "glossary-term row")
                .with_attr("id", id)
                .with_attr(REGION_ATTR, Capability::GlossaryFull.as_str());
            root.replace_at(path, wrapper);
            resolver.push(region);
        } else {
            let titled = node.attr("data-titled") == Some("true");
            let text = node
                .attr("data-text")
                .or(term.value.as_deref())
                .unwrap_or_default()
                .to_owned();
            let explanation = term.explanation.as_deref().unwrap_or_default();
            let tooltip = match (&term.value, titled) {
                (Some(value), true) => format!("**{value}**: {explanation}"),
                _ => explanation.to_owned(),
            };
            let region = RegionDescriptor::new(&id, Capability::GlossaryInline)
                .with("termId", &term.id)
                .with("text", &text)
                .with("titled", if titled { "true" } else { "false" })
                .with("tooltip", tooltip);

            node.set_inner_text(text);
            node.set_attr("id", id);
            node.set_attr(REGION_ATTR, Capability::GlossaryInline.as_str());
            resolver.push(region);
        }
    }

    Extraction {
        html: dom::serialize(&root),
        resolver,
        warnings,
    }
}

/// First term whose marker id matches, warning when several do.
fn pick_term<'t>(
    terms: &'t [GlossaryTerm],
    term_id: &str,
    warnings: &mut Vec<String>,
) -> Option<&'t GlossaryTerm> {
    let mut candidates = terms.iter().filter(|term| term.marker_id() == term_id);
    let first = candidates.next()?;
    let others = candidates.count();
    if others > 0 {
        tracing::warn!(term_id, candidates = others + 1, "Ambiguous glossary id, using the first term");
        warnings.push(format!(
            "glossary id {term_id} matches {} terms, using the first",
            others + 1
        ));
    }
    Some(first)
}

/// Render a marker whose term does not exist. The element keeps its id and
/// gets no region.
fn fallback(node: &mut Node, term_id: &str, environment: Environment, warnings: &mut Vec<String>) {
    match environment {
        Environment::Production => {
            tracing::debug!(term_id, "Unknown glossary id");
            let text = node.attr("data-text").unwrap_or_default().to_owned();
            node.set_inner_text(text);
        }
        Environment::Diagnostic => {
            tracing::warn!(term_id, "Unknown glossary id");
            warnings.push(format!("unknown glossary id {term_id}"));
            node.set_inner_text(format!("[Invalid glossary term ID: {term_id}]"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::InstancePrefix;
    use pretty_assertions::assert_eq;

    fn terms() -> Vec<GlossaryTerm> {
        vec![
            GlossaryTerm::new("energy")
                .with_value("Energy")
                .with_explanation("The capacity to do work."),
            GlossaryTerm::new("unit|joule")
                .with_value("Joule")
                .with_explanation("SI unit of energy."),
        ]
    }

    const INLINE: &str = r#"<p>See <span data-type="inline" class="inline-glossary-term" id="glossary-term-energy" data-local-index="0">Loading glossary...</span>.</p>"#;

    #[test]
    fn test_no_glossary_is_noop() {
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap());
        let extraction = extract(INLINE, &ctx);
        assert_eq!(extraction.html, INLINE);
        assert!(extraction.resolver.is_empty());
    }

    #[test]
    fn test_inline_term_gets_value_and_region() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let extraction = extract(INLINE, &ctx);

        assert_eq!(
            extraction.html,
            r#"<p>See <span data-type="inline" class="inline-glossary-term" id="glossary-region-g-0" data-local-index="0" data-region="glossaryInline">Energy</span>.</p>"#
        );
        let region = extraction.resolver.descriptors()[0].clone();
        assert_eq!(region.kind, Capability::GlossaryInline);
        assert_eq!(region.get("termId"), Some("energy"));
        assert_eq!(region.get("text"), Some("Energy"));
        assert_eq!(region.get("titled"), Some("false"));
        assert_eq!(region.get("tooltip"), Some("The capacity to do work."));
    }

    #[test]
    fn test_titled_tooltip_and_supplied_text() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let html = r#"<span data-type="inline" data-text="joules" id="glossary-term-unit-joule" data-titled="true">Loading glossary...</span>"#;
        let extraction = extract(html, &ctx);

        let region = extraction.resolver.descriptors()[0].clone();
        assert_eq!(region.id, "glossary-region-g-0");
        assert_eq!(region.get("termId"), Some("unit|joule"));
        assert_eq!(region.get("text"), Some("joules"));
        assert_eq!(region.get("tooltip"), Some("**Joule**: SI unit of energy."));
        assert!(extraction.html.contains(">joules</span>"));
    }

    #[test]
    fn test_full_term_replaced_by_wrapper() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let html = r#"<div data-type="full" id="glossary-term-energy" data-local-index="0">Loading glossary...</div>
<p>after</p>"#;
        let extraction = extract(html, &ctx);

        assert_eq!(
            extraction.html,
            "<div class=\"glossary-term row\" id=\"glossary-region-g-0\" data-region=\"glossaryFull\"></div>\n<p>after</p>"
        );
        let region = extraction.resolver.descriptors()[0].clone();
        assert_eq!(region.kind, Capability::GlossaryFull);
        assert_eq!(region.get("value"), Some("Energy"));
        assert_eq!(region.get("explanation"), Some("The capacity to do work."));
    }

    #[test]
    fn test_missing_term_production_shows_supplied_text() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let html = r#"<span data-type="inline" data-text="force" id="glossary-term-force">Loading glossary...</span>"#;
        let extraction = extract(html, &ctx);

        assert_eq!(
            extraction.html,
            r#"<span data-type="inline" data-text="force" id="glossary-term-force">force</span>"#
        );
        assert!(extraction.resolver.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_missing_term_production_without_text_is_empty() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let html = r#"<span data-type="inline" id="glossary-term-force">Loading glossary...</span>"#;
        let extraction = extract(html, &ctx);
        assert_eq!(
            extraction.html,
            r#"<span data-type="inline" id="glossary-term-force"></span>"#
        );
    }

    #[test]
    fn test_missing_term_diagnostic_shows_marker() {
        let terms = terms();
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap())
            .with_glossary(&terms)
            .with_environment(Environment::Diagnostic);
        let html = r#"<span data-type="inline" data-text="force" id="glossary-term-force">Loading glossary...</span>"#;
        let extraction = extract(html, &ctx);

        assert!(extraction.html.contains("[Invalid glossary term ID: force]"));
        assert_eq!(extraction.warnings, vec!["unknown glossary id force".to_owned()]);
        assert!(extraction.resolver.is_empty());
    }

    #[test]
    fn test_ambiguous_id_picks_first() {
        let terms = vec![
            GlossaryTerm::new("a|b").with_value("First"),
            GlossaryTerm::new("a-b").with_value("Second"),
        ];
        let ctx = RenderContext::new(InstancePrefix::new("g").unwrap()).with_glossary(&terms);
        let html = r#"<span data-type="inline" id="glossary-term-a-b"></span>"#;
        let extraction = extract(html, &ctx);

        let region = extraction.resolver.descriptors()[0].clone();
        assert_eq!(region.get("termId"), Some("a|b"));
        assert_eq!(region.get("text"), Some("First"));
        assert_eq!(extraction.warnings.len(), 1);
    }
}
