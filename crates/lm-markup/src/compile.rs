//! Compile entry point: content in one encoding to mountable HTML.

use std::fmt;

use crate::context::RenderContext;
use crate::dom::{self, Node};
use crate::error::MarkupError;
use crate::escape::escape_html;
use crate::extract::{Extraction, FULL};
use crate::markdown::MarkdownRenderer;
use crate::mount::{MountedRoot, Resolver};
use crate::normalize::normalize;
use crate::pipeline;
use crate::region::{LiveRegion, RegionDescriptor};
use crate::tagger;

/// Source encoding of a content block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    Markdown,
    Html,
    Latex,
    Plaintext,
    /// Anything else, kept verbatim for the diagnostic output.
    Unknown(String),
}

impl Encoding {
    pub fn parse(name: &str) -> Self {
        match name {
            "markdown" => Self::Markdown,
            "html" => Self::Html,
            "latex" => Self::Latex,
            "plaintext" => Self::Plaintext,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Plaintext => "plaintext",
            Self::Unknown(name) => name,
        }
    }
}

impl From<&str> for Encoding {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of phase one: HTML ready to mount, plus the regions to resolve
/// once it is mounted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledContent {
    html: String,
    resolver: Resolver,
    warnings: Vec<String>,
}

impl CompiledContent {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Phase two: regions whose target exists under `root`.
    pub fn resolve(&self, root: &dyn MountedRoot) -> Vec<LiveRegion> {
        self.resolver.resolve(root)
    }

    /// Every recorded descriptor, whether or not it would resolve.
    pub fn descriptors(&self) -> Vec<&RegionDescriptor> {
        self.resolver.descriptors()
    }

    /// Authoring problems found while compiling.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Parse the HTML and mount every lifted table's markup into its
    /// placeholder, the way a host would before resolving.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTML or a table's markup cannot be parsed.
    pub fn mount_static(&self) -> Result<Node, MarkupError> {
        let mut root = dom::parse(&self.html)?;
        mount_tables(&mut root, &self.resolver)?;
        Ok(root)
    }
}

fn mount_tables(root: &mut Node, resolver: &Resolver) -> Result<(), MarkupError> {
    for (region, inner) in resolver.lifted_tables() {
        let Some(placeholder) = root.element_by_id_mut(&region.id) else {
            continue;
        };
        placeholder.append_html(region.get("html").unwrap_or_default())?;
        mount_tables(placeholder, inner)?;
    }
    Ok(())
}

/// Compile `content` for one content instance.
///
/// Markdown is normalized, tagged, converted and passed through math
/// rendering and the full extractor list. HTML skips straight to math and
/// extraction. LaTeX and plain text are escaped; unknown encodings render
/// a visible notice.
///
/// ```
/// use lm_markup::{InstancePrefix, RenderContext, compile};
///
/// let ctx = RenderContext::new(InstancePrefix::new("q1").unwrap());
/// let compiled = compile("Fill in: [drop-zone|w-50h-80]", "markdown", &ctx);
///
/// let root = compiled.mount_static().unwrap();
/// let regions = compiled.resolve(&root);
/// assert_eq!(regions.len(), 1);
/// assert_eq!(regions[0].get("width"), Some("50"));
/// ```
pub fn compile(
    content: &str,
    encoding: impl Into<Encoding>,
    ctx: &RenderContext<'_>,
) -> CompiledContent {
    let encoding = encoding.into();
    tracing::debug!(%encoding, instance = %ctx.instance(), "Compiling content");

    let mut warnings = Vec::new();
    let extraction = match &encoding {
        Encoding::Markdown => {
            let normalized = normalize(content, ctx.page());
            let tagged = tagger::tag_markers(&normalized, &mut warnings);
            let html = MarkdownRenderer::new()
                .with_origin(ctx.origin())
                .render(&tagged);
            pipeline::run(&ctx.math().render_math(&html), FULL, ctx)
        }
        Encoding::Html => pipeline::run(&ctx.math().render_math(content), FULL, ctx),
        Encoding::Latex => Extraction::unchanged(&ctx.math().render_math(&escape_html(content))),
        Encoding::Plaintext => Extraction::unchanged(&escape_html(content)),
        Encoding::Unknown(name) => {
            tracing::warn!(encoding = %name, "Unknown content encoding");
            Extraction::unchanged_with_warning(
                &format!(
                    "<div>[CONTENT WITH UNKNOWN ENCODING: <i>{} | {} </i>]</div>",
                    escape_html(name),
                    escape_html(content)
                ),
                format!("unknown encoding {name:?}"),
            )
        }
    };

    warnings.extend(extraction.warnings);
    CompiledContent {
        html: extraction.html,
        resolver: extraction.resolver,
        warnings,
    }
}
