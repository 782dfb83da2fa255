#![forbid(unsafe_code)]

//! Enrichment result formatters for `camoco enrich`

use crate::ontology::Term;
use serde::Serialize;
use std::io;
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

/// Human-readable formatter for enriched terms
pub struct EnrichmentHumanFormatter {
    pval_cutoff: f64,
}

impl EnrichmentHumanFormatter {
    pub fn new(pval_cutoff: f64) -> Self {
        EnrichmentHumanFormatter { pval_cutoff }
    }

    pub fn format(&self, terms: &[Term]) -> String {
        let mut out = NoColor::new(Vec::new());
        let _ = self.write(&mut out, terms);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn write<W: WriteColor>(&self, out: &mut W, terms: &[Term]) -> io::Result<()> {
        if terms.is_empty() {
            writeln!(out, "No terms enriched at p <= {}", self.pval_cutoff)?;
            return Ok(());
        }

        let id_width = terms
            .iter()
            .map(|t| t.id.chars().count())
            .max()
            .unwrap_or(0)
            .max("Term".len());

        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(
            out,
            "{:<id_width$}  {:>10}  {:>5}  Description",
            "Term",
            "p-value",
            "Size",
            id_width = id_width
        )?;
        out.reset()?;

        for term in terms {
            write!(out, "{:<id_width$}  ", term.id, id_width = id_width)?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{:>10.3e}", term.pval().unwrap_or(f64::NAN))?;
            out.reset()?;
            writeln!(out, "  {:>5}  {}", term.len(), term.desc)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct JsonlTerm<'a> {
    term: &'a str,
    desc: &'a str,
    pval: Option<f64>,
    size: usize,
}

/// JSONL formatter for enriched terms
pub struct EnrichmentJsonlFormatter;

impl EnrichmentJsonlFormatter {
    pub fn new() -> Self {
        EnrichmentJsonlFormatter
    }

    pub fn format(&self, terms: &[Term]) -> Result<String, serde_json::Error> {
        let mut output = String::new();
        for term in terms {
            let record = JsonlTerm {
                term: &term.id,
                desc: &term.desc,
                pval: term.pval(),
                size: term.len(),
            };
            output.push_str(&serde_json::to_string(&record)?);
            output.push('\n');
        }
        Ok(output)
    }
}

impl Default for EnrichmentJsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, pval: f64, loci: &[&str]) -> Term {
        let mut term = Term::new(id, format!("{} desc", id)).with_loci(loci.iter().copied());
        term.attrs.insert("pval".to_string(), pval);
        term
    }

    #[test]
    fn test_human_no_hits() {
        let output = EnrichmentHumanFormatter::new(0.05).format(&[]);
        assert_eq!(output, "No terms enriched at p <= 0.05\n");
    }

    #[test]
    fn test_human_rows() {
        let terms = vec![hit("GO:0009737", 0.00012, &["a", "b", "c"])];
        let output = EnrichmentHumanFormatter::new(0.05).format(&terms);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Term"));
        assert!(lines[1].starts_with("GO:0009737"));
        assert!(lines[1].contains("1.200e-4"));
        assert!(lines[1].ends_with("GO:0009737 desc"));
    }

    #[test]
    fn test_jsonl_records() {
        let terms = vec![hit("Cd", 0.01, &["a", "b"]), hit("Zn", 0.02, &["c"])];
        let output = EnrichmentJsonlFormatter::new().format(&terms).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["term"], "Cd");
        assert_eq!(first["size"], 2);
        assert_eq!(first["pval"], 0.01);
    }
}
