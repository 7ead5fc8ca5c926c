//! Glossary marker tagging.
//!
//! Block terms are written `[glossary:ID]` at the start of a line. Inline
//! terms are written `[glossary-inline:ID]` or `[glossary-inline:ID "text"]`
//! anywhere; the `glossary-inline-titled` form also shows the term's title in
//! its tooltip.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::rewrite_prose;
use crate::escape::escape_html;
use crate::glossary::marker_id;

static BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[glossary:([^\]]*)\]").expect("invalid glossary block regex"));

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[glossary-inline(-titled)?:([^\]]*)\]").expect("invalid glossary inline regex")
});

static TERM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9|_-]+$").expect("invalid term id regex"));

static INLINE_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-z0-9|_-]+?)\s*(?:"([A-Za-z0-9()/,'\\. -]+)")?$"#)
        .expect("invalid glossary inline params regex")
});

/// Replace line-leading `[glossary:ID]` markers with full-term placeholders.
///
/// ```
/// assert_eq!(
///     lm_markup::tag_glossary_blocks("[glossary:physics|force]"),
///     r#"<div data-type="full" id="glossary-term-physics-force" data-local-index="0">Loading glossary...</div>"#
/// );
/// ```
pub fn tag_glossary_blocks(markdown: &str) -> String {
    tag_glossary_blocks_with_warnings(markdown, &mut Vec::new())
}

pub(crate) fn tag_glossary_blocks_with_warnings(
    markdown: &str,
    warnings: &mut Vec<String>,
) -> String {
    if !markdown.contains("[glossary:") {
        return markdown.to_owned();
    }

    let mut local_index = 0;
    rewrite_prose(markdown, |segment, at_line_start| {
        if !at_line_start {
            return segment.to_owned();
        }
        BLOCK
            .replace(segment, |caps: &Captures<'_>| {
                let id = &caps[1];
                if !TERM_ID.is_match(id) {
                    return malformed(&caps[0], warnings);
                }
                let tagged = format!(
                    r#"<div data-type="full" id="glossary-term-{}" data-local-index="{local_index}">Loading glossary...</div>"#,
                    marker_id(id)
                );
                local_index += 1;
                tagged
            })
            .into_owned()
    })
}

/// Replace `[glossary-inline:ID "text"]` markers with inline-term placeholders.
///
/// ```
/// let html = lm_markup::tag_glossary_inline(r#"A [glossary-inline:force "push"] acts."#);
/// assert!(html.contains(r#"data-text="push""#));
/// ```
pub fn tag_glossary_inline(markdown: &str) -> String {
    tag_glossary_inline_with_warnings(markdown, &mut Vec::new())
}

pub(crate) fn tag_glossary_inline_with_warnings(
    markdown: &str,
    warnings: &mut Vec<String>,
) -> String {
    if !markdown.contains("[glossary-inline") {
        return markdown.to_owned();
    }

    let mut local_index = 0;
    rewrite_prose(markdown, |segment, _| {
        INLINE
            .replace_all(segment, |caps: &Captures<'_>| {
                let Some(params) = INLINE_PARAMS.captures(&caps[2]) else {
                    return malformed(&caps[0], warnings);
                };
                let text = params
                    .get(2)
                    .map(|m| format!(r#" data-text="{}""#, escape_html(m.as_str())))
                    .unwrap_or_default();
                let titled = if caps.get(1).is_some() {
                    r#" data-titled="true""#
                } else {
                    ""
                };
                let tagged = format!(
                    r#"<span data-type="inline" class="inline-glossary-term"{text} id="glossary-term-{}"{titled} data-local-index="{local_index}">Loading glossary...</span>"#,
                    marker_id(&params[1])
                );
                local_index += 1;
                tagged
            })
            .into_owned()
    })
}

fn malformed(marker: &str, warnings: &mut Vec<String>) -> String {
    tracing::warn!(marker, "Malformed glossary marker left as text");
    warnings.push(format!("malformed glossary marker: {marker}"));
    marker.to_owned()
}
