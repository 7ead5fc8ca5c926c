//! Lesson content compilation and interactive region mounting.
//!
//! This crate turns authored lesson content (markdown with a small
//! micro-syntax, or HTML) into display-ready HTML plus a list of places
//! where the host should mount live widgets: glossary terms, drop zones,
//! inline questions and accessible tables.
//!
//! # Architecture
//!
//! Compilation is two-phase:
//!
//! 1. [`compile`] is pure. Markdown is normalized ([`normalize`]), marker
//!    syntax is tagged into placeholder elements (the `tag_*` functions),
//!    converted with [`MarkdownRenderer`], handed to the [`MathRenderer`]
//!    and run through the [`FULL`] extractor list. Each [`Extractor`]
//!    parses the HTML into a disposable [`dom::Node`] tree, claims its
//!    placeholders and records a [`RegionDescriptor`].
//! 2. Once the host has mounted the HTML, [`CompiledContent::resolve`]
//!    looks every descriptor up under the mounted root (any
//!    [`MountedRoot`]) and returns the regions that are actually there.
//!
//! Region ids are scoped by an [`InstancePrefix`], so several content
//! blocks can share one page and recompiling the same input yields the
//! same ids.
//!
//! # Example
//!
//! ```
//! use lm_markup::{Capability, GlossaryTerm, InstancePrefix, RenderContext, compile};
//!
//! let terms = vec![GlossaryTerm::new("force").with_value("Force")];
//! let ctx = RenderContext::new(InstancePrefix::new("lesson-1").unwrap())
//!     .with_glossary(&terms);
//!
//! let compiled = compile("A [glossary-inline:force] is a push: [drop-zone]", "markdown", &ctx);
//! let root = compiled.mount_static().unwrap();
//! let kinds: Vec<Capability> = compiled.resolve(&root).iter().map(|r| r.kind).collect();
//! assert_eq!(kinds, vec![Capability::DropZone, Capability::GlossaryInline]);
//! ```

mod compile;
mod context;
pub mod dom;
mod error;
mod escape;
pub mod extract;
mod fence;
mod glossary;
mod markdown;
mod math;
mod mount;
mod normalize;
mod pipeline;
mod region;
mod tagger;

pub use compile::{CompiledContent, Encoding, compile};
pub use context::{DEFAULT_MAX_TABLE_DEPTH, Environment, RenderContext};
pub use error::MarkupError;
pub use escape::escape_html;
pub use extract::{Extraction, Extractor, FULL, RESTRICTED};
pub use glossary::GlossaryTerm;
pub use markdown::{LinkTarget, MarkdownRenderer, classify_link};
pub use math::{MathRenderer, PlainMath};
pub use mount::{MountedRoot, Resolver};
pub use normalize::{PageContext, normalize};
pub use pipeline::run;
pub use region::{Capability, InstancePrefix, LiveRegion, REGION_ATTR, RegionDescriptor};
pub use tagger::{tag_drop_zones, tag_glossary_blocks, tag_glossary_inline, tag_inline_questions};
