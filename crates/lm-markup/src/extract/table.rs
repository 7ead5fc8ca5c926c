//! Accessible table extraction.
//!
//! Tables are visited innermost-first (reverse document order). A nested
//! table stays where it is, is marked handled and gets a scroll wrapper. A
//! top-level table is lifted out of the flow: its markup, with everything
//! nested inside it already rewritten, is run through the restricted
//! pipeline under its own prefix and replaced by an empty placeholder.

use std::collections::BTreeMap;

use super::{Extraction, RESTRICTED, parse_or_warn};
use crate::context::RenderContext;
use crate::dom::{self, Node};
use crate::mount::Resolver;
use crate::pipeline;
use crate::region::{Capability, REGION_ATTR, RegionDescriptor};

const TABLE_CLASSES: [&str; 6] = [
    "table",
    "table-bordered",
    "w-100",
    "text-center",
    "bg-white",
    "m-0",
];

struct Candidate {
    path: Vec<usize>,
    /// Number of table ancestors.
    depth: usize,
    /// Ordinal of the outermost table containing this one (itself if top-level).
    top: usize,
}

pub(super) fn extract(html: &str, ctx: &RenderContext<'_>) -> Extraction {
    if !html.to_ascii_lowercase().contains("<table") {
        return Extraction::unchanged(html);
    }
    let mut root = match parse_or_warn(html, "accessible tables") {
        Ok(root) => root,
        Err(unchanged) => return unchanged,
    };

    let candidates = candidates(&root);
    if candidates.is_empty() {
        return Extraction::unchanged(html);
    }

    let mut warnings = Vec::new();
    let mut nested: BTreeMap<usize, Vec<RegionDescriptor>> = BTreeMap::new();
    let mut lifted = Vec::new();

    for (ordinal, candidate) in candidates.iter().enumerate().rev() {
        if candidate.depth > ctx.max_table_depth() {
            tracing::warn!(
                depth = candidate.depth,
                limit = ctx.max_table_depth(),
                "Table nested beyond the depth limit, left untouched"
            );
            warnings.push(format!(
                "table nested {} deep exceeds the limit of {}",
                candidate.depth,
                ctx.max_table_depth()
            ));
            continue;
        }
        let id = format!("table-{}-{ordinal}", ctx.instance());

        if candidate.depth > 0 {
            let Some(region) = wrap_nested(&mut root, &candidate.path, &id, candidate.depth) else {
                continue;
            };
            nested.entry(candidate.top).or_default().push(region);
            continue;
        }

        let Some(table) = root.at_path(&candidate.path) else {
            continue;
        };
        let classes = table_classes(table);
        let expandable = table.has_class("expandable");
        let mut markup = table.clone();
        markup.set_attr("class", &classes);
        markup.set_attr(REGION_ATTR, Capability::AccessibleTable.as_str());

        let sub_ctx = ctx.for_instance(ctx.instance().child(&format!("t{ordinal}")));
        let compiled = pipeline::run(&markup.outer_html(), RESTRICTED, &sub_ctx);

        let mut inner = Resolver::new();
        for region in nested.remove(&ordinal).unwrap_or_default().into_iter().rev() {
            inner.push(region);
        }
        inner.extend(compiled.resolver);
        warnings.extend(compiled.warnings);

        let region = RegionDescriptor::new(&id, Capability::AccessibleTable)
            .with("html", compiled.html)
            .with("classes", classes)
            .with("expandable", if expandable { "true" } else { "false" })
            .with("nested", "false")
            .with("depth", "0");
        let placeholder = Node::new("div")
            .with_attr("id", id)
            .with_attr(REGION_ATTR, Capability::AccessibleTable.as_str());
        root.replace_at(&candidate.path, placeholder);
        lifted.push((region, inner));
    }

    let mut resolver = Resolver::new();
    for (region, inner) in lifted.into_iter().rev() {
        resolver.push_table(region, inner);
    }

    Extraction {
        html: dom::serialize(&root),
        resolver,
        warnings,
    }
}

/// Tables in document order, excluding any inside an already handled table.
fn candidates(root: &Node) -> Vec<Candidate> {
    let paths = root.paths_where(|node| node.tag == "table");
    let mut out = Vec::new();
    let mut skipped = 0;

    for path in &paths {
        let ancestors: Vec<usize> = paths
            .iter()
            .enumerate()
            .filter(|(_, other)| other.len() < path.len() && path.starts_with(other))
            .map(|(i, _)| i)
            .collect();
        let top_path = ancestors.first().map_or(path, |&i| &paths[i]);
        let claimed = root
            .at_path(top_path)
            .is_some_and(|top| top.has_attr(REGION_ATTR));
        if claimed {
            skipped += 1;
            continue;
        }
        // Ordinals count only the tables this pass handles.
        let top = match ancestors.first() {
            Some(&i) => out
                .iter()
                .position(|c: &Candidate| c.path == paths[i])
                .unwrap_or(out.len()),
            None => out.len(),
        };
        out.push(Candidate {
            path: path.clone(),
            depth: ancestors.len(),
            top,
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped tables inside handled tables");
    }
    out
}

/// Mark a nested table handled and wrap it for horizontal scrolling.
fn wrap_nested(root: &mut Node, path: &[usize], id: &str, depth: usize) -> Option<RegionDescriptor> {
    let slot = root.at_path_mut(path)?;
    let mut table = std::mem::take(slot);
    let tail = std::mem::take(&mut table.tail);
    let classes = table_classes(&table);
    table.set_attr("class", &classes);
    table.set_attr(REGION_ATTR, Capability::AccessibleTable.as_str());

    *slot = Node::new("div")
        .with_attr("class", "overflow-auto")
        .with_attr("id", id)
        .with_tail(tail)
        .with_children(vec![table]);

    Some(
        RegionDescriptor::new(id, Capability::AccessibleTable)
            .with("classes", classes)
            .with("nested", "true")
            .with("depth", depth.to_string()),
    )
}

/// The table's own classes followed by the accessible-table classes it lacks.
fn table_classes(table: &Node) -> String {
    let mut classes: Vec<&str> = Vec::new();
    for class in table.classes() {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    for class in TABLE_CLASSES {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    classes.join(" ")
}
