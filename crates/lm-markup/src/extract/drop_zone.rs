//! Drop-zone extraction.

use super::{Extraction, parse_or_warn, unclaimed_with_id_prefix};
use crate::context::RenderContext;
use crate::dom;
use crate::mount::Resolver;
use crate::region::{Capability, REGION_ATTR, RegionDescriptor};

const ID_PREFIX: &str = "drop-region-";

pub(super) fn extract(html: &str, ctx: &RenderContext<'_>) -> Extraction {
    if !html.contains(ID_PREFIX) {
        return Extraction::unchanged(html);
    }
    let mut root = match parse_or_warn(html, "drop zones") {
        Ok(root) => root,
        Err(unchanged) => return unchanged,
    };

    let paths = unclaimed_with_id_prefix(&root, ID_PREFIX);
    if paths.is_empty() {
        return Extraction::unchanged(html);
    }

    let mut resolver = Resolver::new();
    let mut warnings = Vec::new();
    let mut ordinal = 0;

    for path in paths {
        let Some(node) = root.at_path_mut(&path) else {
            continue;
        };
        let dnd = node.attr("data-variant") == Some("dnd");
        let index = node.attr("data-index").unwrap_or_default().to_owned();
        let valid = if dnd {
            !index.is_empty()
        } else {
            index.parse::<usize>().is_ok()
        };
        if !valid {
            let marker = node.id().unwrap_or_default().to_owned();
            tracing::error!(marker = %marker, index = %index, "Drop zone has an invalid data-index, skipped");
            warnings.push(format!("drop zone {marker} has invalid data-index {index:?}"));
            continue;
        }

        let id = format!("drop-region-{}-{ordinal}", ctx.instance());
        ordinal += 1;

        let (variant, default_height) = if dnd { ("dnd", "auto") } else { ("cloze", "27") };
        let region = RegionDescriptor::new(&id, Capability::DropZone)
            .with("index", index)
            .with("width", node.attr("data-width").unwrap_or("100"))
            .with("height", node.attr("data-height").unwrap_or(default_height))
            .with("variant", variant)
            .with_opt("localIndex", node.attr("data-local-index"));

        node.set_attr("id", id);
        node.set_attr(REGION_ATTR, Capability::DropZone.as_str());
        resolver.push(region);
    }

    Extraction {
        html: dom::serialize(&root),
        resolver,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::InstancePrefix;
    use pretty_assertions::assert_eq;

    fn ctx() -> RenderContext<'static> {
        RenderContext::new(InstancePrefix::new("q7").unwrap())
    }

    #[test]
    fn test_rewrites_id_and_records_metadata() {
        let html = r#"<p>v = <span data-index="0" id="drop-region-0" data-width="50" data-height="80" data-local-index="0" class="d-inline-block"></span></p>"#;
        let extraction = extract(html, &ctx());
        assert_eq!(
            extraction.html,
            r#"<p>v = <span data-index="0" id="drop-region-q7-0" data-width="50" data-height="80" data-local-index="0" class="d-inline-block" data-region="dropZone"></span></p>"#
        );
        let regions = extraction.resolver.descriptors();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, "drop-region-q7-0");
        assert_eq!(regions[0].get("index"), Some("0"));
        assert_eq!(regions[0].get("width"), Some("50"));
        assert_eq!(regions[0].get("height"), Some("80"));
        assert_eq!(regions[0].get("variant"), Some("cloze"));
        assert_eq!(regions[0].get("localIndex"), Some("0"));
    }

    #[test]
    fn test_defaults_for_hand_written_marker() {
        let extraction = extract(r#"<span id="drop-region-3" data-index="3"></span>"#, &ctx());
        let regions = extraction.resolver.descriptors();
        assert_eq!(regions[0].get("width"), Some("100"));
        assert_eq!(regions[0].get("height"), Some("27"));
    }

    #[test]
    fn test_invalid_index_skipped() {
        let html = r#"<span id="drop-region-x" data-index="x"></span><span id="drop-region-1" data-index="1"></span>"#;
        let extraction = extract(html, &ctx());
        let ids: Vec<&str> = extraction.resolver.descriptors().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["drop-region-q7-0"]);
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.html.contains(r#"id="drop-region-x""#));
    }

    #[test]
    fn test_dnd_variant() {
        let html = r#"<span data-index="item_a" id="drop-region-item_a" data-variant="dnd" data-width="120" data-height="auto"></span>"#;
        let extraction = extract(html, &ctx());
        let regions = extraction.resolver.descriptors();
        assert_eq!(regions[0].get("variant"), Some("dnd"));
        assert_eq!(regions[0].get("index"), Some("item_a"));
        assert_eq!(regions[0].get("height"), Some("auto"));
    }

    #[test]
    fn test_no_markers_is_identity() {
        let html = "<p>No zones here &amp; there</p>";
        let extraction = extract(html, &ctx());
        assert_eq!(extraction.html, html);
        assert!(extraction.resolver.is_empty());
    }

    #[test]
    fn test_claimed_markers_not_reclaimed() {
        let first = extract(r#"<span id="drop-region-0" data-index="0"></span>"#, &ctx());
        let second = extract(&first.html, &ctx());
        assert_eq!(second.html, first.html);
        assert!(second.resolver.is_empty());
    }
}
