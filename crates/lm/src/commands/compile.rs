//! `lm compile` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use lm_config::{CliSettings, Config};
use lm_markup::{CompiledContent, Environment, InstancePrefix, LiveRegion, compile};
use serde::Serialize;

use super::{load_glossary, render_context, resolve_encoding};
use crate::error::CliError;
use crate::output::Output;

/// Output format for compiled content.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum Format {
    /// The compiled HTML only.
    #[default]
    Html,
    /// HTML, resolved regions and warnings as JSON.
    Json,
}

/// Arguments for the compile command.
#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Path to the content file.
    file: PathBuf,

    /// Content encoding: markdown, html, latex or plaintext (default: from
    /// the file extension, then config).
    #[arg(short, long)]
    encoding: Option<String>,

    /// Path to configuration file (default: auto-discover lessonmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Glossary JSON file (overrides config).
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Instance prefix for region ids: letters, digits and `_` (default: random).
    #[arg(long)]
    instance: Option<String>,

    /// Show visible markers for authoring errors.
    #[arg(long)]
    diagnostic: bool,

    /// Same-origin prefix for link classification (overrides config).
    #[arg(long)]
    origin: Option<String>,

    /// Maximum table nesting depth (overrides config).
    #[arg(long)]
    max_table_depth: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// JSON report for `--format json`.
#[derive(Serialize)]
struct CompileReport<'a> {
    html: &'a str,
    regions: Vec<LiveRegion>,
    warnings: &'a [String],
}

impl<'a> CompileReport<'a> {
    /// Resolve regions against the statically mounted output.
    fn new(compiled: &'a CompiledContent) -> Result<Self, CliError> {
        let root = compiled.mount_static()?;
        Ok(Self {
            html: compiled.html(),
            regions: compiled.resolve(&root),
            warnings: compiled.warnings(),
        })
    }
}

impl CompileArgs {
    /// Execute the compile command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the content file or the glossary
    /// cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            environment: self.diagnostic.then_some(Environment::Diagnostic),
            origin: self.origin,
            glossary_path: self.glossary,
            max_table_depth: self.max_table_depth,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let content = std::fs::read_to_string(&self.file)?;
        let encoding = resolve_encoding(self.encoding.as_deref(), &self.file, &config);
        let terms = load_glossary(config.glossary_path.as_deref())?;
        let instance = match self.instance {
            Some(prefix) => InstancePrefix::new(prefix)?,
            None => InstancePrefix::random(),
        };

        let ctx = render_context(&config, instance, terms.as_deref());
        let compiled = compile(&content, encoding.as_str(), &ctx);

        for warning in compiled.warnings() {
            output.compile_warning(warning);
        }

        match self.format {
            Format::Html => output.result(compiled.html())?,
            Format::Json => {
                let report = CompileReport::new(&compiled)?;
                output.result(&serde_json::to_string_pretty(&report)?)?;
            }
        }

        Ok(())
    }
}
