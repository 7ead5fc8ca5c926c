//! Author shorthand to canonical markdown.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static LINK_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\link\{([^}]*)\}\{([^}]*)\}").expect("invalid link macro regex"));

// The optional leading `[` detects keywords that are already link text.
static GLOSSARY_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[?)\*\*Glossary\*\*").expect("invalid keyword regex"));

static CONCEPTS_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[?)\*\*Concepts\*\*").expect("invalid keyword regex"));

/// Which content variant is active for the page being rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageContext {
    /// Active subject, e.g. `physics`.
    pub subject: Option<String>,
    /// Active stages, e.g. `["a_level"]`.
    pub stages: Vec<String>,
    /// Turn bold `Glossary` and `Concepts` keywords into listing links.
    pub keyword_links: bool,
}

impl PageContext {
    fn single_stage(&self) -> Option<&str> {
        match self.stages.as_slice() {
            [stage] => Some(stage.as_str()),
            _ => None,
        }
    }

    /// Targets for the glossary and concepts keyword links.
    fn keyword_targets(&self) -> (String, String) {
        match (&self.subject, self.single_stage()) {
            (Some(subject), None) => (
                format!("/glossary?subjects={subject}"),
                format!("/concepts?types={subject}"),
            ),
            (Some(subject), Some(stage)) => (
                format!("/{subject}/{stage}/glossary"),
                format!("/{subject}/{stage}/concepts"),
            ),
            (None, _) => ("/glossary".to_owned(), "/concepts".to_owned()),
        }
    }
}

/// Rewrite author shorthand into markdown.
///
/// `\link{text}{url}` always becomes `[text](url)`. With keyword links
/// enabled, `**Glossary**` and `**Concepts**` become links to the listing
/// pages for the active subject and stage. Each rule runs once over the
/// whole string; keywords that are already link text are left alone.
///
/// ```
/// use lm_markup::{PageContext, normalize};
///
/// let page = PageContext::default();
/// assert_eq!(normalize(r"See \link{this}{/x}.", &page), "See [this](/x).");
/// ```
pub fn normalize(input: &str, page: &PageContext) -> String {
    let mut out = LINK_MACRO.replace_all(input, "[$1]($2)").into_owned();

    if page.keyword_links {
        let (glossary, concepts) = page.keyword_targets();
        out = link_keyword(&GLOSSARY_KEYWORD, &out, "**Glossary**", &glossary);
        out = link_keyword(&CONCEPTS_KEYWORD, &out, "**Concepts**", &concepts);
    }

    out
}

fn link_keyword(pattern: &Regex, input: &str, keyword: &str, target: &str) -> String {
    pattern
        .replace_all(input, |caps: &Captures| {
            if caps[1].is_empty() {
                format!("[{keyword}]({target})")
            } else {
                caps[0].to_owned()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(subject: Option<&str>, stages: &[&str]) -> PageContext {
        PageContext {
            subject: subject.map(str::to_owned),
            stages: stages.iter().map(|s| (*s).to_owned()).collect(),
            keyword_links: true,
        }
    }

    #[test]
    fn test_link_macro() {
        let out = normalize(
            r"\link{Newton}{/concepts/cp_newton} and \link{A}{https://a.example}",
            &PageContext::default(),
        );
        assert_eq!(out, "[Newton](/concepts/cp_newton) and [A](https://a.example)");
    }

    #[test]
    fn test_keywords_untouched_when_disabled() {
        let out = normalize("**Glossary**", &PageContext::default());
        assert_eq!(out, "**Glossary**");
    }

    #[test]
    fn test_keywords_multi_stage_subject() {
        let out = normalize("**Glossary** and **Concepts**", &page(Some("physics"), &[]));
        assert_eq!(
            out,
            "[**Glossary**](/glossary?subjects=physics) and [**Concepts**](/concepts?types=physics)"
        );
    }

    #[test]
    fn test_keywords_single_stage() {
        let out = normalize("**Glossary**", &page(Some("physics"), &["gcse"]));
        assert_eq!(out, "[**Glossary**](/physics/gcse/glossary)");
    }

    #[test]
    fn test_keywords_without_subject() {
        let out = normalize("**Concepts**", &page(None, &["gcse"]));
        assert_eq!(out, "[**Concepts**](/concepts)");
    }

    #[test]
    fn test_existing_keyword_link_not_rewrapped() {
        let input = "[**Glossary**](/somewhere)";
        assert_eq!(normalize(input, &page(Some("physics"), &[])), input);
    }

    #[test]
    fn test_normalize_is_stable_on_own_output() {
        let ctx = page(Some("maths"), &["a_level"]);
        let once = normalize(r"**Glossary**, \link{x}{/y}", &ctx);
        assert_eq!(normalize(&once, &ctx), once);
    }
}
