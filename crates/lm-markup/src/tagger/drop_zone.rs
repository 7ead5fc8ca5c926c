//! Drop-zone tagging.
//!
//! Cloze zones: `[drop-zone]`, `[drop-zone|w-50]`, `[drop-zone|w-50h-80]`
//! and `[drop-zone|i-2w-50]` with a manual index. Drag-and-drop zones:
//! `[drop-zone:ID]` and `[drop-zone:ID|w-120h-40]`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{prose_segments, rewrite_prose};

/// Anything that starts like a drop-zone marker; parameters are checked separately.
static DROP_ZONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[drop-zone(?:([|:])([^\]]*))?\]").expect("invalid drop-zone regex")
});

static CLOZE_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:i-(\d+))?(?:w-(\d+))?(?:h-?(\d+))?$").expect("invalid cloze params regex")
});

static DND_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)(?:\|(?:w-(\d+))?(?:h-?(\d+))?)?$")
        .expect("invalid dnd params regex")
});

const DEFAULT_WIDTH: &str = "100";
const DEFAULT_HEIGHT: &str = "27";
const DEFAULT_DND_HEIGHT: &str = "auto";

#[derive(Debug, PartialEq, Eq)]
enum DropZone {
    Cloze {
        index: Option<usize>,
        width: Option<String>,
        height: Option<String>,
    },
    Dnd {
        id: String,
        width: Option<String>,
        height: Option<String>,
    },
}

fn parse(caps: &Captures<'_>) -> Option<DropZone> {
    let params = caps.get(2).map_or("", |m| m.as_str());
    let group = |c: &Captures<'_>, i| c.get(i).map(|m| m.as_str().to_owned());

    match caps.get(1).map(|m| m.as_str()) {
        None => Some(DropZone::Cloze {
            index: None,
            width: None,
            height: None,
        }),
        Some("|") => {
            let p = CLOZE_PARAMS.captures(params)?;
            let index = match p.get(1) {
                Some(m) => Some(m.as_str().parse().ok()?),
                None => None,
            };
            Some(DropZone::Cloze {
                index,
                width: group(&p, 2),
                height: group(&p, 3),
            })
        }
        Some(_) => {
            let p = DND_PARAMS.captures(params)?;
            Some(DropZone::Dnd {
                id: p[1].to_owned(),
                width: group(&p, 2),
                height: group(&p, 3),
            })
        }
    }
}

/// Assigns cloze indices in one pass over the markers.
///
/// Manual indices below the number of cloze zones are reserved up front,
/// counting how many zones claim each. When several zones claim the same
/// index the last one gets it. Every other zone takes the lowest index not
/// reserved and not yet handed out, so a content block with N cloze zones
/// always uses exactly the indices `0..N`.
struct Tagger<'w> {
    /// Manual index to the number of zones still claiming it.
    reserved: BTreeMap<usize, usize>,
    next_auto: usize,
    local_index: usize,
    warnings: &'w mut Vec<String>,
}

impl Tagger<'_> {
    fn replace(&mut self, caps: &Captures<'_>) -> String {
        let Some(zone) = parse(caps) else {
            tracing::warn!(marker = &caps[0], "Malformed drop-zone marker left as text");
            self.warnings
                .push(format!("malformed drop-zone marker: {}", &caps[0]));
            return caps[0].to_owned();
        };

        let local = self.local_index;
        self.local_index += 1;

        match zone {
            DropZone::Cloze {
                index,
                width,
                height,
            } => {
                let index = self.assign(index);
                format!(
                    r#"<span data-index="{index}" id="drop-region-{index}" data-width="{}" data-height="{}" data-local-index="{local}" class="d-inline-block"></span>"#,
                    width.as_deref().unwrap_or(DEFAULT_WIDTH),
                    height.as_deref().unwrap_or(DEFAULT_HEIGHT),
                )
            }
            DropZone::Dnd { id, width, height } => format!(
                r#"<span data-index="{id}" id="drop-region-{id}" data-variant="dnd" data-width="{}" data-height="{}" data-local-index="{local}" class="d-inline-block"></span>"#,
                width.as_deref().unwrap_or(DEFAULT_WIDTH),
                height.as_deref().unwrap_or(DEFAULT_DND_HEIGHT),
            ),
        }
    }

    fn assign(&mut self, manual: Option<usize>) -> usize {
        if let Some(index) = manual
            && let Some(claims) = self.reserved.get_mut(&index)
        {
            *claims -= 1;
            if *claims == 0 {
                return index;
            }
        }
        while self.reserved.contains_key(&self.next_auto) {
            self.next_auto += 1;
        }
        let index = self.next_auto;
        self.next_auto += 1;
        index
    }
}

/// Replace drop-zone markers with placeholder spans.
///
/// Malformed markers (e.g. `[drop-zone|i-x]`) are logged and left as text.
///
/// ```
/// let html = lm_markup::tag_drop_zones("Speed is [drop-zone|w-50h-80].");
/// assert!(html.contains(r#"data-width="50" data-height="80""#));
/// ```
pub fn tag_drop_zones(markdown: &str) -> String {
    tag_drop_zones_with_warnings(markdown, &mut Vec::new())
}

pub(crate) fn tag_drop_zones_with_warnings(markdown: &str, warnings: &mut Vec<String>) -> String {
    if !markdown.contains("[drop-zone") {
        return markdown.to_owned();
    }

    let mut total = 0;
    let mut manual = Vec::new();
    for segment in prose_segments(markdown) {
        for caps in DROP_ZONE.captures_iter(segment) {
            if let Some(DropZone::Cloze { index, .. }) = parse(&caps) {
                total += 1;
                manual.extend(index);
            }
        }
    }

    let mut reserved = BTreeMap::new();
    for index in manual.into_iter().filter(|&i| i < total) {
        *reserved.entry(index).or_insert(0) += 1;
    }

    let mut tagger = Tagger {
        reserved,
        next_auto: 0,
        local_index: 0,
        warnings,
    };

    rewrite_prose(markdown, |segment, _| {
        DROP_ZONE
            .replace_all(segment, |caps: &Captures<'_>| tagger.replace(caps))
            .into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn indices(html: &str) -> Vec<String> {
        static INDEX: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r#"data-index="([^"]*)""#).unwrap());
        INDEX
            .captures_iter(html)
            .map(|c| c[1].to_owned())
            .collect()
    }

    #[test]
    fn test_default_size() {
        assert_eq!(
            tag_drop_zones("[drop-zone]"),
            r#"<span data-index="0" id="drop-region-0" data-width="100" data-height="27" data-local-index="0" class="d-inline-block"></span>"#
        );
    }

    #[test]
    fn test_width_and_height() {
        let html = tag_drop_zones("[drop-zone|w-50h-80]");
        assert!(html.contains(r#"data-width="50" data-height="80""#));
    }

    #[test]
    fn test_height_without_dash() {
        let html = tag_drop_zones("[drop-zone|w-50h80]");
        assert!(html.contains(r#"data-width="50" data-height="80""#));
    }

    #[test]
    fn test_width_only_keeps_default_height() {
        let html = tag_drop_zones("[drop-zone|w-70]");
        assert!(html.contains(r#"data-width="70" data-height="27""#));
    }

    #[test]
    fn test_sequential_indices() {
        let html = tag_drop_zones("[drop-zone] [drop-zone] [drop-zone]");
        assert_eq!(indices(&html), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_manual_index_reserved() {
        let html = tag_drop_zones("[drop-zone] [drop-zone|i-0] [drop-zone]");
        assert_eq!(indices(&html), vec!["1", "0", "2"]);
    }

    #[test]
    fn test_duplicate_manual_index_last_wins() {
        let html = tag_drop_zones("[drop-zone|i-1] [drop-zone|i-1] [drop-zone]");
        assert_eq!(indices(&html), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_duplicate_manual_index_still_covers_range() {
        let html = tag_drop_zones("[drop-zone|i-0] [drop-zone] [drop-zone|i-0] [drop-zone|i-0]");
        assert_eq!(indices(&html), vec!["1", "2", "3", "0"]);
    }

    #[test]
    fn test_manual_index_out_of_range_is_auto() {
        let html = tag_drop_zones("[drop-zone|i-9] [drop-zone]");
        assert_eq!(indices(&html), vec!["0", "1"]);
    }

    #[test]
    fn test_malformed_marker_left_as_text() {
        let mut warnings = Vec::new();
        let html = tag_drop_zones_with_warnings("a [drop-zone|i-x] b [drop-zone]", &mut warnings);
        assert!(html.starts_with("a [drop-zone|i-x] b <span"));
        assert_eq!(indices(&html), vec!["0"]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_dnd_zone() {
        assert_eq!(
            tag_drop_zones("[drop-zone:item_a|w-120]"),
            r#"<span data-index="item_a" id="drop-region-item_a" data-variant="dnd" data-width="120" data-height="auto" data-local-index="0" class="d-inline-block"></span>"#
        );
    }

    #[test]
    fn test_dnd_zone_does_not_consume_cloze_index() {
        let html = tag_drop_zones("[drop-zone:a] [drop-zone]");
        assert_eq!(indices(&html), vec!["a", "0"]);
        assert!(html.contains(r#"data-local-index="1""#));
    }

    #[test]
    fn test_markers_in_code_untouched() {
        let input = "`[drop-zone]`\n```\n[drop-zone]\n```\n[drop-zone]";
        let html = tag_drop_zones(input);
        assert!(html.starts_with("`[drop-zone]`\n```\n[drop-zone]\n```\n<span"));
    }

    #[test]
    fn test_markers_in_indented_code_untouched() {
        let html = tag_drop_zones("[drop-zone]\n\n    [drop-zone]\n\n[drop-zone]");
        assert!(html.contains("\n    [drop-zone]\n"));
        assert_eq!(indices(&html), vec!["0", "1"]);
    }

    #[test]
    fn test_counter_local_to_call() {
        assert_eq!(tag_drop_zones("[drop-zone]"), tag_drop_zones("[drop-zone]"));
    }

    #[test]
    fn test_no_marker_is_identity() {
        assert_eq!(tag_drop_zones("[drop-zones are fun]"), "[drop-zones are fun]");
    }
}
