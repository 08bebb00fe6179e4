//! Configuration management for apiref.
//!
//! Parses `apiref.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `source.input`
//! - `output.dir`

mod expand;

use std::path::{Path, PathBuf};

use apiref_format::FormatKind;
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "apiref.toml";

/// Contents written by `apiref init`.
pub const DEFAULT_CONFIG: &str = r#"[source]
# JSON declaration tree produced by the documentation extractor.
input = "docs.json"

[output]
dir = "site"
# plain | mdbook | hugo
format = "plain"
# auto | sensitive | insensitive
case_sensitivity = "auto"

[links]
# Restructure the tree according to "Exports:" directives.
exports = false
short_links = false
strict = false
"#;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the declaration tree file.
    pub input: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the output backend.
    pub format: Option<FormatKind>,
    /// Override export restructuring.
    pub exports: Option<bool>,
    /// Override strict mode.
    pub strict: Option<bool>,
    /// Override short link text.
    pub short_links: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    source: SourceConfigRaw,
    output: OutputConfigRaw,
    /// Link resolution settings.
    pub links: LinksConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    input: Option<String>,
}

/// Resolved source configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// JSON declaration tree.
    pub input: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    format: FormatKind,
    case_sensitivity: CaseSensitivity,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory pages are written to.
    pub dir: PathBuf,
    pub format: FormatKind,
    pub case_sensitivity: CaseSensitivity,
}

/// How output file names are treated on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    /// Probe the output directory.
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

/// Link resolution settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Restructure the tree according to `Exports:` directives.
    pub exports: bool,
    /// Shorten derived link text.
    pub short_links: bool,
    /// Promote resolution warnings to errors.
    pub strict: bool,
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
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_OUT`} not set").
        message: String,
    },
}

fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apiref.toml` in the current directory and
    /// its parents, falling back to defaults relative to the current
    /// directory.
    ///
    /// CLI settings are applied after path resolution.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(input) = &settings.input {
            self.source_resolved.input.clone_from(input);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(format) = settings.format {
            self.output_resolved.format = format;
        }
        if let Some(exports) = settings.exports {
            self.links.exports = exports;
        }
        if let Some(strict) = settings.strict {
            self.links.strict = strict;
        }
        if let Some(short_links) = settings.short_links {
            self.links.short_links = short_links;
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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfigRaw::default(),
            output: OutputConfigRaw::default(),
            links: LinksConfig::default(),
            source_resolved: SourceConfig {
                input: base.join("docs.json"),
            },
            output_resolved: OutputConfig {
                dir: base.join("site"),
                format: FormatKind::default(),
                case_sensitivity: CaseSensitivity::default(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values as written in the file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(self.source.input.as_deref(), "source.input")?;
        require_non_empty(self.output.dir.as_deref(), "output.dir")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.source.input {
            self.source.input = Some(expand::expand_env(input, "source.input")?);
        }
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.source_resolved = SourceConfig {
            input: resolve(self.source.input.as_deref(), "docs.json"),
        };
        self.output_resolved = OutputConfig {
            dir: resolve(self.output.dir.as_deref(), "site"),
            format: self.output.format,
            case_sensitivity: self.output.case_sensitivity,
        };
    }
}
