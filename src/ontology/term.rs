//! Ontology terms

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named collection of loci
///
/// Terms may be GO annotations, GWAS traits or any other grouping of genes.
/// `attrs` carries numeric annotations computed on the term, such as the
/// enrichment p-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub loci: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, f64>,
}

impl Term {
    pub fn new(id: impl Into<String>, desc: impl Into<String>) -> Self {
        Term {
            id: id.into(),
            desc: desc.into(),
            loci: BTreeSet::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style helper adding loci
    pub fn with_loci<I, S>(mut self, loci: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loci.extend(loci.into_iter().map(Into::into));
        self
    }

    /// Number of distinct loci in the term
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Enrichment p-value, when one has been computed
    pub fn pval(&self) -> Option<f64> {
        self.attrs.get("pval").copied()
    }
}
