//! Analysis backends
//!
//! The statistics behind `plotGWAS`, `density` and `locality` live outside
//! this crate. A backend receives a fully resolved [`AnalysisRequest`] and
//! returns an exit code, or `None` on success.
//!
//! The default [`PluginBackend`] runs an executable named
//! `<prefix><analysis>` (for example `camoco-density`) with
//! `--request <FILE>`, where FILE holds the request as JSON. The plugin
//! inherits stdin, stdout and stderr.

use crate::config::AnalysisConfig;
use crate::error::BackendError;
use crate::types::{DatasetName, DatasetType};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;

/// Environment variable set to `1` for interactive plugin runs
pub const INTERACTIVE_ENV: &str = "CAMOCO_INTERACTIVE";

/// Environment variable carrying the data directory to plugins
pub const BASEDIR_ENV: &str = "CAMOCO_BASEDIR";

/// The analyses forwarded to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Analysis {
    #[serde(rename = "plotGWAS")]
    PlotGwas,
    #[serde(rename = "density")]
    Density,
    #[serde(rename = "locality")]
    Locality,
}

impl Analysis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Analysis::PlotGwas => "plotGWAS",
            Analysis::Density => "density",
            Analysis::Locality => "locality",
        }
    }

    /// Suffix of the plugin executable
    pub fn plugin_name(&self) -> &'static str {
        match self {
            Analysis::PlotGwas => "plot-gwas",
            Analysis::Density => "density",
            Analysis::Locality => "locality",
        }
    }
}

/// A dataset named in a request, with the payload a plugin should read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRef {
    #[serde(rename = "type")]
    pub kind: DatasetType,
    pub name: DatasetName,
    pub payload: PathBuf,
}

/// Everything an analysis needs, resolved and validated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub analysis: Analysis,
    pub basedir: PathBuf,
    pub cob: DatasetRef,
    pub gwas: DatasetRef,
    /// Term ids selected from the GWAS, in id order
    pub terms: Vec<String>,
    /// The typed command-line options of the analysis
    pub options: serde_json::Value,
    #[serde(skip)]
    pub interactive: bool,
}

/// Something that can carry out an analysis request
pub trait AnalysisBackend: Send + Sync {
    fn run(&self, request: &AnalysisRequest) -> Result<Option<i32>, BackendError>;
}

/// Runs analyses as external executables
#[derive(Debug, Clone)]
pub struct PluginBackend {
    prefix: String,
    dir: Option<PathBuf>,
}

impl PluginBackend {
    pub fn new(prefix: impl Into<String>, dir: Option<PathBuf>) -> Self {
        PluginBackend {
            prefix: prefix.into(),
            dir,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        PluginBackend::new(config.plugin_prefix.clone(), config.plugin_dir.clone())
    }

    /// Executable for an analysis: a path inside `plugin_dir`, or a bare
    /// name resolved through PATH
    pub fn executable(&self, analysis: Analysis) -> PathBuf {
        let file = format!("{}{}", self.prefix, analysis.plugin_name());
        match &self.dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

impl AnalysisBackend for PluginBackend {
    fn run(&self, request: &AnalysisRequest) -> Result<Option<i32>, BackendError> {
        let exe = self.executable(request.analysis);

        let mut request_file = tempfile::Builder::new()
            .prefix("camoco-request-")
            .suffix(".json")
            .tempfile()?;
        serde_json::to_writer_pretty(&mut request_file, request)?;
        request_file.flush()?;

        let mut command = Command::new(&exe);
        command
            .arg("--request")
            .arg(request_file.path())
            .env(BASEDIR_ENV, &request.basedir);
        if request.interactive {
            command.env(INTERACTIVE_ENV, "1");
        }

        tracing::debug!(plugin = %exe.display(), request = %request_file.path().display(), "starting analysis plugin");

        let status = match command.status() {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BackendError::PluginNotFound(exe.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        match status.code() {
            Some(0) => Ok(None),
            Some(code) => {
                tracing::warn!(plugin = %exe.display(), code, "analysis plugin failed");
                Ok(Some(code))
            }
            None => Err(BackendError::Terminated(exe.display().to_string())),
        }
    }
}
