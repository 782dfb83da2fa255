//! Test utilities for camoco integration tests

#![allow(dead_code)]

use camoco::ontology::{Ontology, Term};
use camoco::registry::Registry;
use camoco::types::{DatasetName, DatasetType};
use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// A small GWAS term table: Cd (3 SNPs), Zn (1 SNP), Fe (4 SNPs)
pub const IONOME_TSV: &str = "\
# trait\tdescription\tsnp
Cd\tCadmium accumulation\tS1_1001
Cd\tCadmium accumulation\tS1_2002
Cd\tCadmium accumulation\tS3_5005
Zn\tZinc accumulation\tS2_7007
Fe\tIron accumulation\tS4_1111
Fe\tIron accumulation\tS4_2222
Fe\tIron accumulation\tS5_3333
Fe\tIron accumulation\tS5_4444
";

/// A small gene ontology table
pub const GO_TSV: &str = "\
GO:0009737\tresponse to abscisic acid\tGRMZM2G000001
GO:0009737\tresponse to abscisic acid\tGRMZM2G000002
GO:0009737\tresponse to abscisic acid\tGRMZM2G000003
GO:0009737\tresponse to abscisic acid\tGRMZM2G000004
GO:0008150\tbiological_process\tGRMZM2G000001
";

/// Seed `basedir` with a COB network `ZmRoot` and a GWAS `ZmIonome`
pub fn seed_basedir(basedir: &Path) {
    let mut registry = Registry::open(basedir).unwrap();
    registry
        .register(
            DatasetType::Cob,
            DatasetName::new("ZmRoot").unwrap(),
            "Maize root co-expression network",
        )
        .unwrap();

    let mut gwas = Ontology::create(
        &mut registry,
        DatasetType::Gwas,
        DatasetName::new("ZmIonome").unwrap(),
        "Maize ionome GWAS",
        Some("Zm5bFGS".to_string()),
    )
    .unwrap();
    let terms = camoco::ontology::read_terms(IONOME_TSV.as_bytes()).unwrap();
    gwas.add_terms(terms, false).unwrap();
    gwas.save(&registry).unwrap();
}

/// Build a GOnt dataset `ZmGO` from [`GO_TSV`] plus unrelated background terms
pub fn seed_gene_ontology(basedir: &Path) {
    let mut registry = Registry::open(basedir).unwrap();
    let mut go = Ontology::create(
        &mut registry,
        DatasetType::GOnt,
        DatasetName::new("ZmGO").unwrap(),
        "Maize GO",
        None,
    )
    .unwrap();
    let mut terms = camoco::ontology::read_terms(GO_TSV.as_bytes()).unwrap();
    for i in 0..30 {
        terms.push(
            Term::new(format!("GO:9{:06}", i), "background")
                .with_loci([format!("GRMZM5G{:06}", i), format!("GRMZM6G{:06}", i)]),
        );
    }
    go.add_terms(terms, false).unwrap();
    go.save(&registry).unwrap();
}

/// Write the default `camoco.toml` so the user's ~/.camoco.toml never leaks into tests
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    write_named_config(dir, "camoco.toml", content)
}

/// Write a config file under its own name, leaving `camoco.toml` alone
pub fn write_named_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
