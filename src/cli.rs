//! CLI argument parsing and command dispatch

pub mod analysis;
pub mod args;
pub mod backend;
pub mod build;
pub mod common;
pub mod dispatch;
pub mod enrich;
pub mod help;
pub mod list;
pub mod rm;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, OutputFormat};
pub use backend::{AnalysisBackend, PluginBackend};
pub use common::Context;
pub use dispatch::dispatch;
