//! Inline question tagging.
//!
//! `[inline-question:ID]`, `[inline-question:ID | w-100h-30]` or
//! `[inline-question:ID class="wide short"]`.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::rewrite_prose;

static INLINE_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[inline-question:([^\]]*)\]").expect("invalid inline question regex")
});

static PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([a-zA-Z0-9_-]+)(?: *\| *(?:w-(\d+))?(?:h-?(\d+))?| +class=(?:["']|&apos;|&[rl]?quot;)([a-zA-Z0-9 _-]+?)(?:["']|&apos;|&[rl]?quot;))?$"#,
    )
    .expect("invalid inline question params regex")
});

/// Replace inline question markers with placeholder spans.
///
/// ```
/// assert_eq!(
///     lm_markup::tag_inline_questions("[inline-question:q1|w-80]"),
///     r#"<span id="inline-question-q1" class="inline-outer-container" data-width="80" data-local-index="0"></span>"#
/// );
/// ```
pub fn tag_inline_questions(markdown: &str) -> String {
    tag_inline_questions_with_warnings(markdown, &mut Vec::new())
}

pub(crate) fn tag_inline_questions_with_warnings(
    markdown: &str,
    warnings: &mut Vec<String>,
) -> String {
    if !markdown.contains("[inline-question:") {
        return markdown.to_owned();
    }

    let mut local_index = 0;
    rewrite_prose(markdown, |segment, _| {
        INLINE_QUESTION
            .replace_all(segment, |caps: &Captures<'_>| {
                let Some(params) = PARAMS.captures(&caps[1]) else {
                    tracing::warn!(marker = &caps[0], "Malformed inline question marker left as text");
                    warnings.push(format!("malformed inline question marker: {}", &caps[0]));
                    return caps[0].to_owned();
                };

                let mut dataset = String::new();
                for (attr, group) in [("data-width", 2), ("data-height", 3), ("data-classes", 4)] {
                    if let Some(m) = params.get(group) {
                        write!(dataset, r#" {attr}="{}""#, m.as_str()).unwrap();
                    }
                }
                let tagged = format!(
                    r#"<span id="inline-question-{}" class="inline-outer-container"{dataset} data-local-index="{local_index}"></span>"#,
                    &params[1]
                );
                local_index += 1;
                tagged
            })
            .into_owned()
    })
}
