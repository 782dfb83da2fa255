//! Common helpers shared across CLI commands
//!
//! This module provides the exit codes, the handler result type and the
//! `Context` every handler receives.

use crate::cli::args::{Cli, ColorChoice};
use crate::cli::backend::{AnalysisBackend, PluginBackend};
use crate::config::Config;
use crate::error::{CamocoError, ConfigError};
use crate::registry::Registry;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
/// Reported by clap for malformed command lines
pub const EXIT_USAGE: i32 = 2;

/// Result of a command handler: `None` means success
pub type HandlerResult = Result<Option<i32>, CamocoError>;

/// Everything a handler needs besides its own options
pub struct Context {
    config: Config,
    basedir_override: Option<PathBuf>,
    color: ColorChoice,
    backend: Arc<dyn AnalysisBackend>,
}

impl Context {
    /// Context with the plugin backend described by `config`
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(PluginBackend::from_config(&config.analysis));
        Context {
            config,
            basedir_override: None,
            color: ColorChoice::Auto,
            backend,
        }
    }

    /// Context for a parsed command line
    pub fn from_cli(cli: &Cli, config: Config) -> Self {
        Context::new(config)
            .with_basedir(cli.basedir.clone())
            .with_color(cli.color)
    }

    pub fn with_basedir(mut self, basedir: Option<PathBuf>) -> Self {
        self.basedir_override = basedir;
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Replace the analysis backend
    pub fn with_backend(mut self, backend: Arc<dyn AnalysisBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &dyn AnalysisBackend {
        self.backend.as_ref()
    }

    /// Resolved data directory
    pub fn basedir(&self) -> Result<PathBuf, ConfigError> {
        self.config
            .resolve_basedir(self.basedir_override.as_deref())
    }

    /// Open the dataset catalog under the data directory
    pub fn open_registry(&self) -> Result<Registry, CamocoError> {
        let basedir = self.basedir()?;
        Ok(Registry::open(&basedir)?)
    }

    /// Color choice for stdout, resolving `auto` against the terminal
    pub fn stdout_color(&self) -> termcolor::ColorChoice {
        match self.color {
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
            ColorChoice::Auto => {
                if std::io::stdout().is_terminal() {
                    termcolor::ColorChoice::Auto
                } else {
                    termcolor::ColorChoice::Never
                }
            }
        }
    }
}
