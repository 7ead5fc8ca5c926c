//! Configuration management for lessonmark.
//!
//! Parses `lessonmark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.origin`
//! - `glossary.path`

mod expand;

use std::path::{Path, PathBuf};

use lm_markup::{DEFAULT_MAX_TABLE_DEPTH, Environment, PageContext};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the render environment.
    pub environment: Option<Environment>,
    /// Override the same-origin prefix for link classification.
    pub origin: Option<String>,
    /// Override the glossary file.
    pub glossary_path: Option<PathBuf>,
    /// Override the table nesting limit.
    pub max_table_depth: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lessonmark.toml";

/// Upper bound accepted for `render.max_table_depth`.
const MAX_TABLE_DEPTH_LIMIT: usize = 64;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render configuration.
    pub render: RenderConfig,
    /// Active content variant for keyword links.
    pub page: PageContext,
    /// Glossary configuration (path is a relative string from TOML).
    glossary: GlossaryConfigRaw,

    /// Resolved glossary file (set after loading).
    #[serde(skip)]
    pub glossary_path: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Render configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Production renders silent fallbacks, diagnostic shows authoring errors.
    pub environment: Environment,
    /// Absolute URLs under this origin count as local links.
    pub origin: Option<String>,
    /// Tables nested deeper than this are left untouched.
    pub max_table_depth: usize,
    /// Encoding assumed when none is given on the command line.
    pub default_encoding: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            origin: None,
            max_table_depth: DEFAULT_MAX_TABLE_DEPTH,
            default_encoding: "markdown".to_owned(),
        }
    }
}

/// Raw glossary configuration as parsed from TOML (path as string).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GlossaryConfigRaw {
    path: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.origin`").
        field: String,
        /// Error message (e.g., "${`SITE_ORIGIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lessonmark.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(environment) = settings.environment {
            self.render.environment = environment;
        }
        if let Some(origin) = &settings.origin {
            self.render.origin = Some(origin.clone());
        }
        if let Some(glossary_path) = &settings.glossary_path {
            self.glossary_path = Some(glossary_path.clone());
        }
        if let Some(depth) = settings.max_table_depth {
            self.render.max_table_depth = depth;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(origin) = &self.render.origin {
            require_non_empty(origin, "render.origin")?;
            require_http_url(origin, "render.origin")?;
        }

        let depth = self.render.max_table_depth;
        if !(1..=MAX_TABLE_DEPTH_LIMIT).contains(&depth) {
            return Err(ConfigError::Validation(format!(
                "render.max_table_depth must be between 1 and {MAX_TABLE_DEPTH_LIMIT}"
            )));
        }

        require_non_empty(&self.render.default_encoding, "render.default_encoding")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref origin) = self.render.origin {
            self.render.origin = Some(expand::expand_env(origin, "render.origin")?);
        }
        if let Some(ref path) = self.glossary.path {
            self.glossary.path = Some(expand::expand_env(path, "glossary.path")?);
        }
        Ok(())
    }

    /// Resolve the glossary path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.glossary_path = self.glossary.path.as_deref().map(|p| config_dir.join(p));
    }
}
