//! Named HTML entity conversion.
//!
//! The tree reader only knows the five XML entities, so every other named
//! HTML entity is decoded to its character before parsing.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// Replace named HTML entities with their characters.
///
/// `amp`, `lt`, `gt`, `quot` and `apos` stay escaped for the tree reader, and
/// so does any entity that decodes to one of those characters (`&LT;`).
/// Unknown names are preserved verbatim.
pub(crate) fn convert_html_entities(html: &str) -> String {
    if !html.contains('&') {
        return html.to_owned();
    }
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            if XML_ENTITIES.contains(&&caps[1]) {
                return caps[0].to_owned();
            }
            let decoded = html_escape::decode_html_entities(&caps[0]);
            if decoded == caps[0] {
                caps[0].to_owned()
            } else {
                escape_markup(&decoded)
            }
        })
        .into_owned()
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
