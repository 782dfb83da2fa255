//! Term table import
//!
//! Reads tab-separated rows of `term_id<TAB>description[<TAB>locus_id]`.
//! Blank lines and lines starting with `#` are skipped. Rows sharing a term
//! id are merged: their loci are pooled and the first non-empty description
//! is kept.

use super::Term;
use crate::error::OntologyError;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Parse a term table into terms, in id order
pub fn read_terms(reader: impl BufRead) -> Result<Vec<Term>, OntologyError> {
    let mut terms: BTreeMap<String, Term> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        let (id, desc, locus) = match fields.as_slice() {
            [id, desc] => (*id, *desc, None),
            [id, desc, locus] => (*id, *desc, Some(*locus)),
            _ => {
                return Err(OntologyError::Malformed {
                    line: line_no,
                    message: format!("expected 2 or 3 tab-separated fields, found {}", fields.len()),
                });
            }
        };

        if id.is_empty() {
            return Err(OntologyError::Malformed {
                line: line_no,
                message: "empty term id".to_string(),
            });
        }

        let term = terms
            .entry(id.to_string())
            .or_insert_with(|| Term::new(id, ""));
        if term.desc.is_empty() {
            term.desc = desc.to_string();
        }
        if let Some(locus) = locus.filter(|l| !l.is_empty()) {
            term.loci.insert(locus.to_string());
        }
    }

    Ok(terms.into_values().collect())
}
