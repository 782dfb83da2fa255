//! Parsing and validation for camoco.toml configuration files

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-user configuration, relative to the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".camoco.toml";

/// Directory name of the per-user data directory, relative to the home directory
pub const DEFAULT_BASEDIR: &str = ".camoco";

/// Main configuration struct for camoco.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General options
    #[serde(default)]
    pub options: OptionsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Analysis backend configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Locate and load the configuration
    ///
    /// An explicitly requested file must exist. Otherwise `~/.camoco.toml` is
    /// used when present, and built-in defaults when it is not.
    ///
    /// # Arguments
    ///
    /// * `explicit` - Path given with `--config` or `CAMOCO_CONFIG`, if any
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The explicit file, or an existing `~/.camoco.toml`, cannot be read
    /// - The file is not valid TOML or contains unknown keys
    /// - A value fails validation (e.g. an empty `analysis.plugin_prefix`)
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading configuration");
            return Self::load(path);
        }

        match home_dir() {
            Some(home) => Self::load_or_default(&home.join(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Load `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve the data directory
    ///
    /// Precedence: `override_dir` (from `--basedir`/`CAMOCO_BASEDIR`), then
    /// `options.basedir`, then `~/.camoco`.
    pub fn resolve_basedir(&self, override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }

        let home = home_dir();
        match &self.options.basedir {
            Some(dir) => expand_tilde(dir, home.as_deref()),
            None => home
                .map(|h| h.join(DEFAULT_BASEDIR))
                .ok_or(ConfigError::NoHomeDir),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.plugin_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.plugin_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self
            .analysis
            .plugin_prefix
            .contains(std::path::MAIN_SEPARATOR)
        {
            return Err(ConfigError::InvalidValue {
                field: "analysis.plugin_prefix".to_string(),
                message: "must be a file name prefix, not a path; use analysis.plugin_dir"
                    .to_string(),
            });
        }

        if let Some(dir) = &self.options.basedir
            && dir.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "options.basedir".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// `[options]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    /// Directory holding the dataset catalog; a leading `~` is expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basedir: Option<String>,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default log level when neither RUST_LOG nor -v/-q is given
    #[serde(default)]
    pub level: LogLevel,
}

/// Log levels accepted in `[logging] level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// `[analysis]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Prefix of analysis plugin executables (`camoco-density`, ...)
    #[serde(default = "default_plugin_prefix")]
    pub plugin_prefix: String,

    /// Directory searched for plugins instead of PATH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<PathBuf>,
}

fn default_plugin_prefix() -> String {
    "camoco-".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            plugin_prefix: default_plugin_prefix(),
            plugin_dir: None,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a leading `~` against `home`
fn expand_tilde(path: &str, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home.map(Path::to_path_buf).ok_or(ConfigError::NoHomeDir);
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home
            .map(|h| h.join(rest))
            .ok_or(ConfigError::NoHomeDir);
    }
    Ok(PathBuf::from(path))
}
