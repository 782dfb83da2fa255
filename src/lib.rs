#![forbid(unsafe_code)]

//! camoco: co-analysis of molecular components
//!
//! A command-line front-end for co-expression network analysis of GWAS
//! datasets. It keeps a catalog of datasets, stores ontologies (including
//! GWAS trait/SNP tables), tests term enrichment, and forwards density,
//! locality and plotting analyses to external backends.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ontology;
pub mod output;
pub mod registry;
pub mod types;

// Re-export error types for convenient access
pub use error::{BackendError, CamocoError, ConfigError, OntologyError, OptionError, RegistryError};

// Re-export core domain types for convenient access
pub use ontology::{Ontology, Term};
pub use registry::{DatasetEntry, Registry};
pub use types::{DatasetName, DatasetType};
