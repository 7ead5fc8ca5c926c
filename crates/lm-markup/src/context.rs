//! Per-call rendering context.

use crate::glossary::GlossaryTerm;
use crate::math::{MathRenderer, PlainMath};
use crate::normalize::PageContext;
use crate::region::InstancePrefix;

/// Default limit on how deeply tables may nest inside other tables.
pub const DEFAULT_MAX_TABLE_DEPTH: usize = 8;

static PLAIN_MATH: PlainMath = PlainMath;

/// How authoring mistakes are surfaced to readers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Environment {
    /// Fall back silently to author-supplied text.
    #[default]
    Production,
    /// Show visible markers for invalid references.
    Diagnostic,
}

/// Everything a compile call needs besides the content itself.
///
/// ```
/// use lm_markup::{Environment, GlossaryTerm, InstancePrefix, RenderContext};
///
/// let terms = vec![GlossaryTerm::new("force").with_value("Force")];
/// let ctx = RenderContext::new(InstancePrefix::new("q1").unwrap())
///     .with_glossary(&terms)
///     .with_environment(Environment::Diagnostic);
/// assert_eq!(ctx.instance().as_str(), "q1");
/// ```
#[derive(Clone)]
pub struct RenderContext<'a> {
    instance: InstancePrefix,
    glossary: Option<&'a [GlossaryTerm]>,
    math: &'a dyn MathRenderer,
    environment: Environment,
    page: PageContext,
    origin: Option<String>,
    max_table_depth: usize,
}

impl<'a> RenderContext<'a> {
    /// Context with no glossary loaded, identity math and production fallbacks.
    pub fn new(instance: InstancePrefix) -> Self {
        Self {
            instance,
            glossary: None,
            math: &PLAIN_MATH,
            environment: Environment::default(),
            page: PageContext::default(),
            origin: None,
            max_table_depth: DEFAULT_MAX_TABLE_DEPTH,
        }
    }

    /// Supply loaded glossary terms. Without this, glossary markers are
    /// left for a later compile once the data arrives.
    #[must_use]
    pub fn with_glossary(mut self, terms: &'a [GlossaryTerm]) -> Self {
        self.glossary = Some(terms);
        self
    }

    #[must_use]
    pub fn with_math(mut self, math: &'a dyn MathRenderer) -> Self {
        self.math = math;
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: PageContext) -> Self {
        self.page = page;
        self
    }

    /// Origin whose absolute URLs count as local links.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Limit table nesting; deeper tables are left untouched with a warning.
    #[must_use]
    pub fn with_max_table_depth(mut self, depth: usize) -> Self {
        self.max_table_depth = depth;
        self
    }

    /// Same settings under a different instance prefix.
    #[must_use]
    pub(crate) fn for_instance(&self, instance: InstancePrefix) -> Self {
        Self {
            instance,
            ..self.clone()
        }
    }

    pub fn instance(&self) -> &InstancePrefix {
        &self.instance
    }

    pub fn glossary(&self) -> Option<&'a [GlossaryTerm]> {
        self.glossary
    }

    pub fn math(&self) -> &'a dyn MathRenderer {
        self.math
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn max_table_depth(&self) -> usize {
        self.max_table_depth
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("instance", &self.instance)
            .field("glossary_terms", &self.glossary.map(<[GlossaryTerm]>::len))
            .field("environment", &self.environment)
            .field("page", &self.page)
            .field("origin", &self.origin)
            .field("max_table_depth", &self.max_table_depth)
            .finish_non_exhaustive()
    }
}
