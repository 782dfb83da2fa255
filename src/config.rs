//! Configuration file parsing and validation

pub mod camoco_toml;

pub use camoco_toml::{AnalysisConfig, Config, LogLevel, LoggingConfig, OptionsConfig};
