//! buildOntology command implementation
//!
//! Imports a tab-separated term table as a new Ontology, GOnt or GWAS
//! dataset. The table is parsed before the catalog is touched, so a
//! malformed file leaves the catalog unchanged.

use crate::cli::args::BuildOntologyArgs;
use crate::cli::common::{Context, HandlerResult};
use crate::error::{OntologyError, OptionError, RegistryError};
use crate::ontology::{self, Ontology, Term};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Run `camoco buildOntology`
pub fn run_build_ontology(ctx: &Context, args: &BuildOntologyArgs) -> HandlerResult {
    if !args.kind.holds_terms() {
        return Err(OptionError::new(
            "TYPE",
            format!("{} datasets cannot be built from a term table", args.kind),
        )
        .into());
    }

    let terms = read_table(&args.file)?;
    tracing::info!(
        file = %args.file.display(),
        terms = terms.len(),
        "read term table"
    );

    let mut registry = ctx.open_registry()?;
    if registry.contains(args.kind, args.name.as_str()) {
        if !args.force {
            return Err(RegistryError::AlreadyExists {
                kind: args.kind,
                name: args.name.to_string(),
            }
            .into());
        }
        registry.remove(args.kind, args.name.as_str())?;
    }

    let mut ontology = Ontology::create(
        &mut registry,
        args.kind,
        args.name.clone(),
        args.description.clone(),
        args.refgen.clone(),
    )?;
    ontology.add_terms(terms, false)?;
    ontology.save(&registry)?;

    println!("{}", ontology.summary());
    Ok(None)
}

fn read_table(path: &Path) -> Result<Vec<Term>, OntologyError> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        return ontology::read_terms(stdin.lock());
    }
    let file = File::open(path)?;
    ontology::read_terms(BufReader::new(file))
}
