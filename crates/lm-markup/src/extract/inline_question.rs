//! Inline question extraction.

use super::{Extraction, parse_or_warn, unclaimed_with_id_prefix};
use crate::context::RenderContext;
use crate::dom;
use crate::mount::Resolver;
use crate::region::{Capability, REGION_ATTR, RegionDescriptor};

const ID_PREFIX: &str = "inline-question-";

pub(super) fn extract(html: &str, ctx: &RenderContext<'_>) -> Extraction {
    if !html.contains(ID_PREFIX) {
        return Extraction::unchanged(html);
    }
    let mut root = match parse_or_warn(html, "inline questions") {
        Ok(root) => root,
        Err(unchanged) => return unchanged,
    };

    let paths = unclaimed_with_id_prefix(&root, ID_PREFIX);
    if paths.is_empty() {
        return Extraction::unchanged(html);
    }

    let mut resolver = Resolver::new();
    for (ordinal, path) in paths.iter().enumerate() {
        let Some(node) = root.at_path_mut(path) else {
            continue;
        };
        let question_id = node
            .id()
            .and_then(|id| id.strip_prefix(ID_PREFIX))
            .unwrap_or_default()
            .to_owned();
        let id = format!("{ID_PREFIX}{}-{ordinal}", ctx.instance());

        let region = RegionDescriptor::new(&id, Capability::InlineQuestion)
            .with("inputId", format!("{}-input", question_id.replace('_', "-")))
            .with("questionId", question_id)
            .with_opt("width", node.attr("data-width"))
            .with_opt("height", node.attr("data-height"))
            .with_opt("classes", node.attr("data-classes"))
            .with_opt("localIndex", node.attr("data-local-index"));

        node.set_attr("id", id);
        node.set_attr(REGION_ATTR, Capability::InlineQuestion.as_str());
        resolver.push(region);
    }

    Extraction {
        html: dom::serialize(&root),
        resolver,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::InstancePrefix;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrites_id_and_metadata() {
        let ctx = RenderContext::new(InstancePrefix::new("doc").unwrap());
        let html = r#"<p><span id="inline-question-part_a" class="inline-outer-container" data-width="80" data-classes="wide" data-local-index="0"></span></p>"#;
        let extraction = extract(html, &ctx);

        assert_eq!(
            extraction.html,
            r#"<p><span id="inline-question-doc-0" class="inline-outer-container" data-width="80" data-classes="wide" data-local-index="0" data-region="inlineQuestion"></span></p>"#
        );
        let region = extraction.resolver.descriptors()[0].clone();
        assert_eq!(region.kind, Capability::InlineQuestion);
        assert_eq!(region.get("questionId"), Some("part_a"));
        assert_eq!(region.get("inputId"), Some("part-a-input"));
        assert_eq!(region.get("width"), Some("80"));
        assert_eq!(region.get("height"), None);
        assert_eq!(region.get("classes"), Some("wide"));
    }

    #[test]
    fn test_ordinals_follow_document_order() {
        let ctx = RenderContext::new(InstancePrefix::new("d").unwrap());
        let html = r#"<span id="inline-question-b"></span><div><span id="inline-question-a"></span></div>"#;
        let extraction = extract(html, &ctx);
        let questions: Vec<(&str, Option<&str>)> = extraction
            .resolver
            .descriptors()
            .iter()
            .map(|r| (r.id.as_str(), r.get("questionId")))
            .collect();
        assert_eq!(
            questions,
            vec![
                ("inline-question-d-0", Some("b")),
                ("inline-question-d-1", Some("a"))
            ]
        );
    }
}
