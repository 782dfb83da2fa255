#![forbid(unsafe_code)]

//! Core domain types for camoco
//!
//! This module defines the fundamental types shared by the catalog, the
//! ontology store and the command handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of dataset camoco keeps in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatasetType {
    Camoco,
    Expr,
    RefGen,
    #[serde(rename = "COB")]
    Cob,
    Ontology,
    GOnt,
    #[serde(rename = "GWAS")]
    Gwas,
}

impl DatasetType {
    /// Every dataset type, in catalog display order
    pub const ALL: [DatasetType; 7] = [
        DatasetType::Camoco,
        DatasetType::Expr,
        DatasetType::RefGen,
        DatasetType::Cob,
        DatasetType::Ontology,
        DatasetType::GOnt,
        DatasetType::Gwas,
    ];

    /// Canonical name, as written in payload file names
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Camoco => "Camoco",
            DatasetType::Expr => "Expr",
            DatasetType::RefGen => "RefGen",
            DatasetType::Cob => "COB",
            DatasetType::Ontology => "Ontology",
            DatasetType::GOnt => "GOnt",
            DatasetType::Gwas => "GWAS",
        }
    }

    /// Whether datasets of this type store ontology terms
    ///
    /// GWAS datasets are ontologies whose terms are traits and whose loci are SNPs.
    pub fn holds_terms(&self) -> bool {
        matches!(
            self,
            DatasetType::Ontology | DatasetType::GOnt | DatasetType::Gwas
        )
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = String;

    /// Parses a dataset type, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = DatasetType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "unknown dataset type '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// A validated dataset name
///
/// Dataset names must be non-empty, must not start with '.', and must not
/// contain path separators, since they become part of payload file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetName(String);

impl DatasetName {
    /// Creates a new DatasetName, validating the input
    ///
    /// Returns None if the input is empty or would escape the data directory
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || name.starts_with('.') {
            return None;
        }
        if name
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
        {
            return None;
        }
        Some(DatasetName(name))
    }

    /// Returns the dataset name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetName::new(s).ok_or_else(|| format!("invalid dataset name '{}'", s))
    }
}

impl TryFrom<String> for DatasetName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DatasetName::new(value).ok_or_else(|| "Invalid dataset name".to_string())
    }
}

impl From<DatasetName> for String {
    fn from(name: DatasetName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_type_parse_ignores_case() {
        assert_eq!("cob".parse::<DatasetType>().unwrap(), DatasetType::Cob);
        assert_eq!("GWAS".parse::<DatasetType>().unwrap(), DatasetType::Gwas);
        assert_eq!("gont".parse::<DatasetType>().unwrap(), DatasetType::GOnt);
        assert_eq!(
            "refgen".parse::<DatasetType>().unwrap(),
            DatasetType::RefGen
        );
    }

    #[test]
    fn test_dataset_type_parse_unknown() {
        let err = "Network".parse::<DatasetType>().unwrap_err();
        assert!(err.contains("Network"));
        assert!(err.contains("COB"));
    }

    #[test]
    fn test_dataset_type_display_is_canonical() {
        assert_eq!(DatasetType::Cob.to_string(), "COB");
        assert_eq!(DatasetType::Gwas.to_string(), "GWAS");
        assert_eq!(DatasetType::Expr.to_string(), "Expr");
    }

    #[test]
    fn test_dataset_type_serde_uses_canonical_names() {
        let json = serde_json::to_string(&DatasetType::Cob).unwrap();
        assert_eq!(json, "\"COB\"");
        let parsed: DatasetType = serde_json::from_str("\"GWAS\"").unwrap();
        assert_eq!(parsed, DatasetType::Gwas);
    }

    #[test]
    fn test_holds_terms() {
        assert!(DatasetType::Gwas.holds_terms());
        assert!(DatasetType::Ontology.holds_terms());
        assert!(DatasetType::GOnt.holds_terms());
        assert!(!DatasetType::Cob.holds_terms());
        assert!(!DatasetType::RefGen.holds_terms());
    }

    #[test]
    fn test_dataset_name_valid() {
        assert!(DatasetName::new("ZmRoot").is_some());
        assert!(DatasetName::new("Zm SAM 2014").is_some());
        assert!(DatasetName::new("maize_v3.1").is_some());
    }

    #[test]
    fn test_dataset_name_invalid() {
        assert!(DatasetName::new("").is_none());
        assert!(DatasetName::new(".hidden").is_none());
        assert!(DatasetName::new("../escape").is_none());
        assert!(DatasetName::new("a/b").is_none());
        assert!(DatasetName::new("a\\b").is_none());
    }

    #[test]
    fn test_dataset_name_serde_validates() {
        let ok: Result<DatasetName, _> = serde_json::from_str("\"ZmRoot\"");
        assert!(ok.is_ok());
        let bad: Result<DatasetName, _> = serde_json::from_str("\"a/b\"");
        assert!(bad.is_err());
    }
}
