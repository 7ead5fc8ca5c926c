//! Marker taggers: author micro-syntax to placeholder elements.
//!
//! Each tagger is a pure string rewrite over markdown source. Code blocks
//! (fenced or indented) and inline code spans are copied through untouched.
//! Every match gets a `data-local-index` from a counter that lives only for
//! one call.

mod drop_zone;
mod glossary;
mod inline_question;

pub use drop_zone::tag_drop_zones;
pub use glossary::{tag_glossary_blocks, tag_glossary_inline};
pub use inline_question::tag_inline_questions;

pub(crate) use drop_zone::tag_drop_zones_with_warnings;
pub(crate) use glossary::{tag_glossary_blocks_with_warnings, tag_glossary_inline_with_warnings};
pub(crate) use inline_question::tag_inline_questions_with_warnings;

use crate::fence::{CodeBlockTracker, code_span_ranges};

/// Run every tagger in the fixed order: glossary blocks, glossary inline
/// terms, drop zones, inline questions.
pub(crate) fn tag_markers(markdown: &str, warnings: &mut Vec<String>) -> String {
    let tagged = tag_glossary_blocks_with_warnings(markdown, warnings);
    let tagged = tag_glossary_inline_with_warnings(&tagged, warnings);
    let tagged = tag_drop_zones_with_warnings(&tagged, warnings);
    tag_inline_questions_with_warnings(&tagged, warnings)
}

/// Apply `rewrite` to every prose segment of `input`.
///
/// The closure receives the segment and whether it starts a line.
fn rewrite_prose(input: &str, mut rewrite: impl FnMut(&str, bool) -> String) -> String {
    let mut out = String::with_capacity(input.len() + 64);
    let mut code = CodeBlockTracker::new();

    for line in input.split_inclusive('\n') {
        if code.is_code(line) {
            out.push_str(line);
            continue;
        }

        let mut pos = 0;
        for span in code_span_ranges(line) {
            out.push_str(&rewrite(&line[pos..span.start], pos == 0));
            out.push_str(&line[span.clone()]);
            pos = span.end;
        }
        out.push_str(&rewrite(&line[pos..], pos == 0));
    }

    out
}

/// Every prose segment of `input`, for pre-scans that must agree with
/// [`rewrite_prose`] on what counts as a marker.
fn prose_segments(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut code = CodeBlockTracker::new();

    for line in input.split_inclusive('\n') {
        if code.is_code(line) {
            continue;
        }
        let mut pos = 0;
        for span in code_span_ranges(line) {
            segments.push(&line[pos..span.start]);
            pos = span.end;
        }
        segments.push(&line[pos..]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_prose_skips_code() {
        let input = "a `a` a\n```\na\n```\na";
        let out = rewrite_prose(input, |s, _| s.replace('a', "b"));
        assert_eq!(out, "b `a` b\n```\na\n```\nb");
    }

    #[test]
    fn test_rewrite_prose_line_start_flag() {
        let mut starts = Vec::new();
        rewrite_prose("x `c` y\nz", |s, at_start| {
            starts.push((s.to_owned(), at_start));
            s.to_owned()
        });
        assert_eq!(
            starts,
            vec![
                ("x ".to_owned(), true),
                (" y\n".to_owned(), false),
                ("z".to_owned(), true)
            ]
        );
    }

    #[test]
    fn test_prose_segments_match_rewrite() {
        let input = "p `c`\n~~~\nq\n~~~\nr";
        assert_eq!(prose_segments(input), vec!["p ", "\n", "r"]);
    }

    #[test]
    fn test_rewrite_prose_skips_indented_code() {
        let input = "a\n\n    a\n\na";
        let out = rewrite_prose(input, |s, _| s.replace('a', "b"));
        assert_eq!(out, "b\n\n    a\n\nb");
    }
}
