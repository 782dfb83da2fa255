//! Integration tests for configuration parsing
//!
//! This module contains integration tests that verify:
//! - Config loading from fixture files
//! - Rejection of unknown keys, bad values and bad syntax
//! - Data directory resolution

use camoco::config::{Config, LogLevel};
use camoco::error::ConfigError;
use std::path::{Path, PathBuf};

// Helper to get fixture path
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("config")
        .join(filename)
}

#[test]
fn test_config_load_valid_minimal() {
    let config = Config::load(fixture_path("valid_minimal.toml")).unwrap();

    assert_eq!(config.options.basedir.as_deref(), Some("/srv/camoco"));
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.analysis.plugin_prefix, "camoco-");
    assert!(config.analysis.plugin_dir.is_none());
    assert_eq!(
        config.resolve_basedir(None).unwrap(),
        PathBuf::from("/srv/camoco")
    );
}

#[test]
fn test_config_load_valid_full() {
    let config = Config::load(fixture_path("valid_full.toml")).unwrap();

    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.analysis.plugin_prefix, "zm-");
    assert_eq!(
        config.analysis.plugin_dir.as_deref(),
        Some(Path::new("/opt/camoco/plugins"))
    );
}

#[test]
fn test_config_basedir_override_wins() {
    let config = Config::load(fixture_path("valid_full.toml")).unwrap();
    let resolved = config
        .resolve_basedir(Some(Path::new("/data/camoco")))
        .unwrap();
    assert_eq!(resolved, PathBuf::from("/data/camoco"));
}

#[test]
fn test_config_load_unknown_key() {
    let result = Config::load(fixture_path("invalid_unknown_key.toml"));
    match result {
        Err(ConfigError::Parse(e)) => assert!(e.to_string().contains("testdir")),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_config_load_invalid_log_level() {
    let result = Config::load(fixture_path("invalid_log_level.toml"));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_load_invalid_syntax() {
    let result = Config::load(fixture_path("invalid_syntax.toml"));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_load_missing_file() {
    let result = Config::load(fixture_path("does_not_exist.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_discover_explicit_fixture() {
    let config = Config::discover(Some(fixture_path("valid_full.toml").as_path())).unwrap();
    assert_eq!(config.analysis.plugin_prefix, "zm-");
}
