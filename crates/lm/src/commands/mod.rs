//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod compile;

use std::path::Path;

use lm_config::Config;
use lm_markup::{GlossaryTerm, InstancePrefix, RenderContext};

pub(crate) use check::CheckArgs;
pub(crate) use compile::CompileArgs;

use crate::error::CliError;

/// Read a JSON array of glossary terms, if a glossary file is configured.
fn load_glossary(path: Option<&Path>) -> Result<Option<Vec<GlossaryTerm>>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)?;
    let terms: Vec<GlossaryTerm> = serde_json::from_str(&content)?;
    tracing::info!(path = %path.display(), terms = terms.len(), "Loaded glossary");
    Ok(Some(terms))
}

/// Encoding from an explicit flag, the file extension, or the config default.
fn resolve_encoding(explicit: Option<&str>, file: &Path, config: &Config) -> String {
    if let Some(encoding) = explicit {
        return encoding.to_owned();
    }
    let by_extension = match file.extension().and_then(|ext| ext.to_str()) {
        Some("md" | "markdown") => Some("markdown"),
        Some("html" | "htm") => Some("html"),
        Some("tex") => Some("latex"),
        Some("txt") => Some("plaintext"),
        _ => None,
    };
    by_extension.map_or_else(|| config.render.default_encoding.clone(), str::to_owned)
}

fn render_context<'a>(
    config: &Config,
    instance: InstancePrefix,
    glossary: Option<&'a [GlossaryTerm]>,
) -> RenderContext<'a> {
    let mut ctx = RenderContext::new(instance)
        .with_environment(config.render.environment)
        .with_page(config.page.clone())
        .with_max_table_depth(config.render.max_table_depth);
    if let Some(origin) = &config.render.origin {
        ctx = ctx.with_origin(origin.clone());
    }
    if let Some(terms) = glossary {
        ctx = ctx.with_glossary(terms);
    }
    ctx
}
