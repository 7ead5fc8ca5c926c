//! `lm check` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use lm_config::{CliSettings, Config};
use lm_markup::{CompiledContent, Environment, GlossaryTerm, InstancePrefix, compile};

use super::{load_glossary, render_context, resolve_encoding};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Content files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Content encoding for every file (default: from each file's
    /// extension, then config).
    #[arg(short, long)]
    encoding: Option<String>,

    /// Path to configuration file (default: auto-discover lessonmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Glossary JSON file (overrides config).
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Every file is compiled in diagnostic mode and its regions resolved
    /// against the statically mounted output.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any file has problems.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            environment: Some(Environment::Diagnostic),
            glossary_path: self.glossary,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let terms = load_glossary(config.glossary_path.as_deref())?;
        if terms.is_none() {
            output.note("No glossary configured, glossary terms not checked");
        }

        let mut problems = 0;
        let mut failed_files = 0;
        for (i, file) in self.files.iter().enumerate() {
            let instance = InstancePrefix::new(format!("check{i}"))?;
            let found = check_file(
                file,
                self.encoding.as_deref(),
                &config,
                instance,
                terms.as_deref(),
            )?;
            if found.is_empty() {
                output.file_ok(file);
            } else {
                failed_files += 1;
                problems += found.len();
                output.file_problems(file, &found);
            }
        }

        if problems > 0 {
            return Err(CliError::Validation(format!(
                "{problems} problem(s) in {failed_files} of {} file(s)",
                self.files.len()
            )));
        }
        output.clean_summary(self.files.len());
        Ok(())
    }
}

/// Compile one file and collect its problems.
fn check_file(
    file: &Path,
    encoding: Option<&str>,
    config: &Config,
    instance: InstancePrefix,
    terms: Option<&[GlossaryTerm]>,
) -> Result<Vec<String>, CliError> {
    let content = std::fs::read_to_string(file)?;
    let encoding = resolve_encoding(encoding, file, config);
    let ctx = render_context(config, instance, terms);
    let compiled = compile(&content, encoding.as_str(), &ctx);

    let mut problems = compiled.warnings().to_vec();
    problems.extend(unresolved_regions(&compiled)?);
    Ok(problems)
}

/// Descriptors whose target is missing from the mounted output.
fn unresolved_regions(compiled: &CompiledContent) -> Result<Vec<String>, CliError> {
    let root = compiled.mount_static()?;
    let live: Vec<String> = compiled
        .resolve(&root)
        .into_iter()
        .map(|region| region.id)
        .collect();
    Ok(compiled
        .descriptors()
        .into_iter()
        .filter(|region| !live.contains(&region.id))
        .map(|region| format!("{} region {} has no target", region.kind, region.id))
        .collect())
}
