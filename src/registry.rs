#![forbid(unsafe_code)]

//! Dataset catalog
//!
//! The catalog lives at `<basedir>/databases/catalog.json` and records every
//! dataset camoco knows about. Each dataset's payload is stored next to it as
//! `<Type>.<Name>.json`. The `list` and `rm` commands operate on this catalog.

use crate::error::RegistryError;
use crate::types::{DatasetName, DatasetType};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Catalog file name inside the databases directory
pub const CATALOG_FILE: &str = "catalog.json";

/// Wildcard name accepted by [`Registry::remove`]
pub const ALL_NAMES: &str = "*";

const CATALOG_VERSION: u32 = 1;

/// One catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "type")]
    pub kind: DatasetType,
    pub name: DatasetName,
    pub description: String,
    pub added: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    version: u32,
    #[serde(default)]
    datasets: Vec<DatasetEntry>,
}

/// In-memory view of the catalog, written back on every mutation
#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    entries: Vec<DatasetEntry>,
}

impl Registry {
    /// Open the catalog under `basedir`
    ///
    /// A missing catalog is an empty one; nothing is created on disk until
    /// the first mutation.
    ///
    /// # Arguments
    ///
    /// * `basedir` - Data directory; the catalog lives in its `databases/`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - The catalog exists but cannot be read
    /// - The catalog is not valid JSON or has an unsupported version
    pub fn open(basedir: &Path) -> Result<Self, RegistryError> {
        let root = basedir.join("databases");
        let path = root.join(CATALOG_FILE);

        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                let catalog: CatalogFile =
                    serde_json::from_str(&content).map_err(|e| RegistryError::Corrupt {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                if catalog.version != CATALOG_VERSION {
                    return Err(RegistryError::Corrupt {
                        path,
                        message: format!("unsupported catalog version {}", catalog.version),
                    });
                }
                catalog.datasets
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            catalog = %path.display(),
            datasets = entries.len(),
            "opened dataset catalog"
        );

        Ok(Registry { root, entries })
    }

    /// Directory holding the catalog and dataset payloads
    pub fn databases_dir(&self) -> &Path {
        &self.root
    }

    /// Number of datasets in the catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// List datasets, optionally restricted to one type, whose name matches
    /// the regular expression `pattern` anywhere
    ///
    /// Results are sorted by type, then name.
    pub fn list(
        &self,
        kind: Option<DatasetType>,
        pattern: &str,
    ) -> Result<Vec<&DatasetEntry>, RegistryError> {
        let re = Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut matches: Vec<&DatasetEntry> = self
            .entries
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .filter(|e| re.is_match(e.name.as_str()))
            .collect();
        matches.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
        Ok(matches)
    }

    /// Look up a dataset by type and exact name
    pub fn get(&self, kind: DatasetType, name: &str) -> Option<&DatasetEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == kind && e.name.as_str() == name)
    }

    /// Look up a dataset, failing if it is absent
    pub fn require(&self, kind: DatasetType, name: &str) -> Result<&DatasetEntry, RegistryError> {
        self.get(kind, name).ok_or_else(|| RegistryError::NotFound {
            kind,
            name: name.to_string(),
        })
    }

    /// Whether a dataset is present
    pub fn contains(&self, kind: DatasetType, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Add a dataset record and persist the catalog
    pub fn register(
        &mut self,
        kind: DatasetType,
        name: DatasetName,
        description: impl Into<String>,
    ) -> Result<DatasetEntry, RegistryError> {
        if self.contains(kind, name.as_str()) {
            return Err(RegistryError::AlreadyExists {
                kind,
                name: name.to_string(),
            });
        }

        let entry = DatasetEntry {
            kind,
            name,
            description: description.into(),
            added: Utc::now(),
        };
        self.entries.push(entry.clone());
        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }

        tracing::info!(kind = %entry.kind, name = %entry.name, "registered dataset");
        Ok(entry)
    }

    /// Remove datasets from the catalog, then delete their payloads
    ///
    /// The catalog is written before any payload is touched. A payload that
    /// cannot be deleted afterwards is logged and left behind as an orphan;
    /// the catalog never lists a dataset whose payload is gone.
    ///
    /// # Arguments
    ///
    /// * `kind` - Type of the datasets to remove
    /// * `name` - Exact dataset name, or [`ALL_NAMES`] for every dataset of
    ///   `kind` (succeeds with an empty result when there is none)
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - `name` is an exact name that is not in the catalog
    /// - The catalog cannot be written (the registry is left unchanged)
    pub fn remove(
        &mut self,
        kind: DatasetType,
        name: &str,
    ) -> Result<Vec<DatasetEntry>, RegistryError> {
        let wildcard = name == ALL_NAMES;
        if !wildcard && !self.contains(kind, name) {
            return Err(RegistryError::NotFound {
                kind,
                name: name.to_string(),
            });
        }

        let (removed, kept): (Vec<DatasetEntry>, Vec<DatasetEntry>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|e| e.kind == kind && (wildcard || e.name.as_str() == name));
        self.entries = kept;

        if removed.is_empty() {
            return Ok(removed);
        }

        if let Err(e) = self.save() {
            self.entries.extend(removed);
            return Err(e);
        }

        for entry in &removed {
            let payload = self.payload_path(entry.kind, &entry.name);
            match fs::remove_file(&payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %payload.display(), "no payload to remove");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %payload.display(),
                        error = %e,
                        "could not delete dataset payload"
                    );
                }
            }
            tracing::info!(kind = %entry.kind, name = %entry.name, "removed dataset");
        }

        Ok(removed)
    }

    /// Path of a dataset's payload file
    pub fn payload_path(&self, kind: DatasetType, name: &DatasetName) -> PathBuf {
        self.root.join(format!("{}.{}.json", kind.as_str(), name.as_str()))
    }

    /// Write the catalog through a temporary file and rename it into place
    fn save(&self) -> Result<(), RegistryError> {
        fs::create_dir_all(&self.root)?;

        let catalog = CatalogFile {
            version: CATALOG_VERSION,
            datasets: self.entries.clone(),
        };
        let content =
            serde_json::to_string_pretty(&catalog).map_err(|e| RegistryError::Corrupt {
                path: self.root.join(CATALOG_FILE),
                message: e.to_string(),
            })?;

        let tmp = self.root.join(format!("{}.tmp", CATALOG_FILE));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.root.join(CATALOG_FILE))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(s: &str) -> DatasetName {
        DatasetName::new(s).unwrap()
    }

    fn populated(dir: &TempDir) -> Registry {
        let mut registry = Registry::open(dir.path()).unwrap();
        registry
            .register(DatasetType::Cob, name("ZmRoot"), "Maize root network")
            .unwrap();
        registry
            .register(DatasetType::Cob, name("ZmSAM"), "Maize shoot apex network")
            .unwrap();
        registry
            .register(DatasetType::Gwas, name("ZmIonome"), "Maize ionome traits")
            .unwrap();
        registry
    }

    #[test]
    fn test_open_missing_catalog_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        assert!(registry.is_empty());
        assert!(!dir.path().join("databases").exists());
    }

    #[test]
    fn test_register_persists() {
        let dir = TempDir::new().unwrap();
        populated(&dir);

        let reopened = Registry::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 3);
        let entry = reopened.get(DatasetType::Cob, "ZmRoot").unwrap();
        assert_eq!(entry.description, "Maize root network");
        assert!(dir.path().join("databases").join(CATALOG_FILE).exists());
        assert!(!dir.path().join("databases").join("catalog.json.tmp").exists());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let result = registry.register(DatasetType::Cob, name("ZmRoot"), "again");
        assert!(matches!(result, Err(RegistryError::AlreadyExists { .. })));
    }

    #[test]
    fn test_same_name_different_type_allowed() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        registry
            .register(DatasetType::Expr, name("ZmRoot"), "Root expression")
            .unwrap();
        assert!(registry.contains(DatasetType::Expr, "ZmRoot"));
        assert!(registry.contains(DatasetType::Cob, "ZmRoot"));
    }

    #[test]
    fn test_list_all_sorted() {
        let dir = TempDir::new().unwrap();
        let registry = populated(&dir);
        let all = registry.list(None, ".*").unwrap();
        let names: Vec<String> = all
            .iter()
            .map(|e| format!("{}.{}", e.kind, e.name))
            .collect();
        assert_eq!(names, vec!["COB.ZmRoot", "COB.ZmSAM", "GWAS.ZmIonome"]);
    }

    #[test]
    fn test_list_filters_type_and_name() {
        let dir = TempDir::new().unwrap();
        let registry = populated(&dir);

        let cobs = registry.list(Some(DatasetType::Cob), ".*").unwrap();
        assert_eq!(cobs.len(), 2);

        let sam = registry.list(None, "SAM").unwrap();
        assert_eq!(sam.len(), 1);
        assert_eq!(sam[0].name.as_str(), "ZmSAM");

        let none = registry.list(Some(DatasetType::Gwas), "^ZmR").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_list_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let registry = populated(&dir);
        let result = registry.list(None, "Zm(");
        assert!(matches!(result, Err(RegistryError::InvalidPattern { .. })));
    }

    #[test]
    fn test_remove_exact() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let payload = registry.payload_path(DatasetType::Cob, &name("ZmRoot"));
        fs::write(&payload, "{}").unwrap();

        let removed = registry.remove(DatasetType::Cob, "ZmRoot").unwrap();
        assert_eq!(removed.len(), 1);
        assert!(!payload.exists());

        let reopened = Registry::open(dir.path()).unwrap();
        assert!(!reopened.contains(DatasetType::Cob, "ZmRoot"));
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_remove_failed_save_keeps_datasets_and_payloads() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let payload = registry.payload_path(DatasetType::Cob, &name("ZmRoot"));
        fs::write(&payload, "{}").unwrap();

        // A directory in place of the catalog makes the final rename fail
        let catalog = registry.databases_dir().join(CATALOG_FILE);
        fs::remove_file(&catalog).unwrap();
        fs::create_dir(&catalog).unwrap();
        fs::write(catalog.join("blocker"), "").unwrap();

        let result = registry.remove(DatasetType::Cob, "ZmRoot");
        assert!(matches!(result, Err(RegistryError::Io(_))));
        assert!(registry.contains(DatasetType::Cob, "ZmRoot"));
        assert_eq!(registry.len(), 3);
        assert!(payload.exists());
    }

    #[test]
    fn test_remove_undeletable_payload_is_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let payload = registry.payload_path(DatasetType::Cob, &name("ZmRoot"));
        fs::create_dir(&payload).unwrap();
        fs::write(payload.join("data"), "").unwrap();

        let removed = registry.remove(DatasetType::Cob, "ZmRoot").unwrap();
        assert_eq!(removed.len(), 1);
        assert!(payload.exists());

        let reopened = Registry::open(dir.path()).unwrap();
        assert!(!reopened.contains(DatasetType::Cob, "ZmRoot"));
    }

    #[test]
    fn test_remove_missing_fails() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let result = registry.remove(DatasetType::Gwas, "ZmRoot");
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_wildcard() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let removed = registry.remove(DatasetType::Cob, ALL_NAMES).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(DatasetType::Gwas, "ZmIonome"));
    }

    #[test]
    fn test_remove_wildcard_nothing_to_remove() {
        let dir = TempDir::new().unwrap();
        let mut registry = populated(&dir);
        let removed = registry.remove(DatasetType::RefGen, ALL_NAMES).unwrap();
        assert!(removed.is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_payload_path_layout() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        let path = registry.payload_path(DatasetType::Gwas, &name("ZmIonome"));
        assert_eq!(
            path,
            dir.path().join("databases").join("GWAS.ZmIonome.json")
        );
    }

    #[test]
    fn test_corrupt_catalog() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("databases");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(CATALOG_FILE), "not json").unwrap();
        let result = Registry::open(dir.path());
        assert!(matches!(result, Err(RegistryError::Corrupt { .. })));
    }

    #[test]
    fn test_unsupported_catalog_version() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("databases");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(CATALOG_FILE), r#"{"version": 9, "datasets": []}"#).unwrap();
        let result = Registry::open(dir.path());
        assert!(matches!(result, Err(RegistryError::Corrupt { .. })));
    }
}
