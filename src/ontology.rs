#![forbid(unsafe_code)]

//! Ontology term store
//!
//! An ontology is a collection of terms, and each term is a collection of
//! loci. Terms may nest or overlap; the store does not model hierarchy.
//! GWAS datasets are ontologies whose terms are traits and whose loci are
//! the SNPs associated with each trait.

mod enrichment;
mod import;
mod term;

pub use enrichment::{DEFAULT_MAX_TERM_SIZE, DEFAULT_PVAL_CUTOFF, hypergeom_sf};
pub use import::read_terms;
pub use term::Term;

use crate::error::OntologyError;
use crate::registry::Registry;
use crate::types::{DatasetName, DatasetType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;

/// A named set of terms backed by a catalog payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    pub name: DatasetName,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: DatasetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refgen: Option<String>,
    #[serde(default)]
    terms: BTreeMap<String, Term>,
}

impl Ontology {
    /// An empty, unsaved ontology
    pub fn new(
        kind: DatasetType,
        name: DatasetName,
        description: impl Into<String>,
        refgen: Option<String>,
    ) -> Result<Self, OntologyError> {
        if !kind.holds_terms() {
            return Err(OntologyError::NotAnOntology(kind));
        }
        Ok(Ontology {
            name,
            description: description.into(),
            kind,
            refgen,
            terms: BTreeMap::new(),
        })
    }

    /// Register a fresh, empty ontology in the catalog and write its payload
    ///
    /// # Arguments
    ///
    /// * `registry` - Catalog the dataset is registered in
    /// * `kind` - Ontology, GOnt or GWAS
    /// * `name` - Dataset name, unique per type
    /// * `description` - Short description stored in the catalog
    /// * `refgen` - Reference genome the loci belong to, if known
    ///
    /// # Errors
    ///
    /// Returns `OntologyError` if:
    /// - `kind` does not hold terms
    /// - A dataset of the same type and name is already registered
    /// - The catalog or the payload cannot be written
    pub fn create(
        registry: &mut Registry,
        kind: DatasetType,
        name: DatasetName,
        description: impl Into<String>,
        refgen: Option<String>,
    ) -> Result<Self, OntologyError> {
        let ontology = Ontology::new(kind, name, description, refgen)?;
        registry.register(kind, ontology.name.clone(), ontology.description.clone())?;
        ontology.save(registry)?;
        Ok(ontology)
    }

    /// Load an ontology's payload from the catalog
    ///
    /// # Arguments
    ///
    /// * `registry` - Catalog to look the dataset up in
    /// * `kind` - Ontology, GOnt or GWAS
    /// * `name` - Dataset name
    ///
    /// # Errors
    ///
    /// Returns `OntologyError` if:
    /// - `kind` does not hold terms
    /// - No such dataset is registered
    /// - The payload cannot be read or is not a valid ontology
    pub fn load(registry: &Registry, kind: DatasetType, name: &str) -> Result<Self, OntologyError> {
        if !kind.holds_terms() {
            return Err(OntologyError::NotAnOntology(kind));
        }
        let entry = registry.require(kind, name)?;
        let path = registry.payload_path(kind, &entry.name);
        let content = fs::read_to_string(&path)?;
        let ontology: Ontology = serde_json::from_str(&content)?;
        tracing::debug!(
            kind = %kind,
            name = %entry.name,
            terms = ontology.len(),
            "loaded ontology"
        );
        Ok(ontology)
    }

    /// Write the payload through a temporary file
    pub fn save(&self, registry: &Registry) -> Result<(), OntologyError> {
        let path = registry.payload_path(self.kind, &self.name);
        fs::create_dir_all(registry.databases_dir())?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(self)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Retrieve a term by id
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Iterate over terms in id order
    pub fn iter_terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn terms(&self) -> Vec<&Term> {
        self.iter_terms().collect()
    }

    /// Every locus annotated to at least one term
    pub fn distinct_loci(&self) -> HashSet<&str> {
        self.terms
            .values()
            .flat_map(|t| t.loci.iter().map(String::as_str))
            .collect()
    }

    pub fn num_distinct_loci(&self) -> usize {
        self.distinct_loci().len()
    }

    /// One-line description of the ontology
    ///
    /// Every term-holding dataset is summarized as `Ontology:<name>`,
    /// GWAS and GOnt datasets included.
    pub fn summary(&self) -> String {
        format!(
            "Ontology:{} - desc: {} - contains {} terms for {}",
            self.name,
            self.description,
            self.len(),
            self.refgen.as_deref().unwrap_or("no reference genome")
        )
    }

    /// Add a single term
    ///
    /// With `overwrite`, an existing term with the same id is replaced;
    /// otherwise a duplicate id is an error and the ontology is unchanged.
    pub fn add_term(&mut self, term: Term, overwrite: bool) -> Result<(), OntologyError> {
        if !overwrite && self.terms.contains_key(&term.id) {
            return Err(OntologyError::DuplicateTerm(term.id));
        }
        self.terms.insert(term.id.clone(), term);
        Ok(())
    }

    /// Remove a single term
    pub fn del_term(&mut self, id: &str) -> Result<Term, OntologyError> {
        self.terms
            .remove(id)
            .ok_or_else(|| OntologyError::TermNotFound(id.to_string()))
    }

    /// Add many terms as one unit
    ///
    /// Either every term is added or none is: a duplicate id inside the
    /// batch, or (without `overwrite`) an id already present, fails the batch.
    pub fn add_terms<I>(&mut self, terms: I, overwrite: bool) -> Result<usize, OntologyError>
    where
        I: IntoIterator<Item = Term>,
    {
        let batch: Vec<Term> = terms.into_iter().collect();

        let mut seen = BTreeSet::new();
        for term in &batch {
            if !seen.insert(term.id.as_str()) {
                return Err(OntologyError::DuplicateTerm(term.id.clone()));
            }
            if !overwrite && self.terms.contains_key(&term.id) {
                return Err(OntologyError::DuplicateTerm(term.id.clone()));
            }
        }

        let added = batch.len();
        for term in batch {
            self.terms.insert(term.id.clone(), term);
        }
        Ok(added)
    }

    /// Remove many terms; ids not present are ignored
    pub fn del_terms<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter(|id| self.terms.remove(id.as_ref()).is_some())
            .count()
    }

    /// Remove every term
    pub fn clear(&mut self) {
        self.terms.clear();
    }
}
