//! Output formatters (human and JSONL)

pub mod datasets;
pub mod enrichment;

pub use datasets::{DatasetHumanFormatter, DatasetJsonlFormatter};
pub use enrichment::{EnrichmentHumanFormatter, EnrichmentJsonlFormatter};
