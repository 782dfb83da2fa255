//! Hypergeometric term enrichment
//!
//! For a list of loci, each term sharing at least one locus with the list is
//! tested for over-representation with the hypergeometric survival function.

use super::{Ontology, Term};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Default p-value cutoff for reporting a term
pub const DEFAULT_PVAL_CUTOFF: f64 = 0.05;

/// Default maximum term size; larger terms are skipped as uninformative
pub const DEFAULT_MAX_TERM_SIZE: usize = 300;

/// Log-factorial lookup table for `0..=n`
struct LnFactorial(Vec<f64>);

impl LnFactorial {
    fn new(n: usize) -> Self {
        let mut table = Vec::with_capacity(n + 1);
        let mut acc = 0.0f64;
        table.push(acc);
        for i in 1..=n {
            acc += (i as f64).ln();
            table.push(acc);
        }
        LnFactorial(table)
    }

    fn ln_choose(&self, n: usize, k: usize) -> f64 {
        debug_assert!(k <= n);
        self.0[n] - self.0[k] - self.0[n - k]
    }
}

/// Hypergeometric survival function P(X > k)
///
/// X counts successes in `draws` draws without replacement from a population
/// of `population` items of which `successes` are successes.
pub fn hypergeom_sf(k: usize, population: usize, successes: usize, draws: usize) -> f64 {
    let table = LnFactorial::new(population);
    hypergeom_sf_with(&table, k, population, successes, draws)
}

fn hypergeom_sf_with(
    table: &LnFactorial,
    k: usize,
    population: usize,
    successes: usize,
    draws: usize,
) -> f64 {
    if successes > population || draws > population {
        return f64::NAN;
    }

    let upper = successes.min(draws);
    let lower = (k + 1).max((draws + successes).saturating_sub(population));
    if lower > upper {
        return 0.0;
    }

    let ln_total = table.ln_choose(population, draws);
    let tail: f64 = (lower..=upper)
        .map(|x| {
            let ln_pmf = table.ln_choose(successes, x)
                + table.ln_choose(population - successes, draws - x)
                - ln_total;
            ln_pmf.exp()
        })
        .sum();

    tail.clamp(0.0, 1.0)
}

impl Ontology {
    /// Terms over-represented in `loci`
    ///
    /// The p-value of a term is P(X >= overlap). Only terms with at least one
    /// locus in `loci` are tested, and terms with more than `max_term_size`
    /// loci are skipped. The population is every
    /// locus annotated in the ontology plus any list locus not annotated.
    /// Significant terms carry `attrs["pval"]` and are sorted by p-value,
    /// then id.
    pub fn enrichment<I, S>(&self, loci: I, pval_cutoff: f64, max_term_size: usize) -> Vec<Term>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: BTreeSet<String> = loci.into_iter().map(|l| l.as_ref().to_string()).collect();
        if list.is_empty() {
            return Vec::new();
        }

        let annotated = self.distinct_loci();
        let unannotated = list
            .iter()
            .filter(|l| !annotated.contains(l.as_str()))
            .count();
        let population = annotated.len() + unannotated;
        let draws = list.len();
        let table = LnFactorial::new(population);

        let candidates: Vec<&Term> = self
            .iter_terms()
            .filter(|t| t.loci.iter().any(|l| list.contains(l)))
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            population,
            draws,
            "testing terms for enrichment"
        );

        let mut significant: Vec<Term> = candidates
            .par_iter()
            .filter(|term| term.len() <= max_term_size)
            .filter_map(|term| {
                // candidates overlap the list, so common >= 1
                let common = term.loci.intersection(&list).count();
                let pval =
                    hypergeom_sf_with(&table, common - 1, population, term.len(), draws);
                if pval <= pval_cutoff {
                    let mut hit = (*term).clone();
                    hit.attrs.insert("pval".to_string(), pval);
                    Some(hit)
                } else {
                    None
                }
            })
            .collect();

        significant.sort_by(|a, b| {
            a.pval()
                .partial_cmp(&b.pval())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        significant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DatasetName, DatasetType};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sf_simple_cases() {
        // Population 10, 4 successes, 3 draws.
        // P(X=0)=20/120, P(X=1)=60/120, P(X=2)=36/120, P(X=3)=4/120
        assert!(close(hypergeom_sf(0, 10, 4, 3), 100.0 / 120.0));
        assert!(close(hypergeom_sf(1, 10, 4, 3), 40.0 / 120.0));
        assert!(close(hypergeom_sf(2, 10, 4, 3), 4.0 / 120.0));
        assert!(close(hypergeom_sf(3, 10, 4, 3), 0.0));
    }

    #[test]
    fn test_sf_respects_lower_support() {
        // 8 successes in 10, 5 draws: at least 3 successes are guaranteed.
        assert!(close(hypergeom_sf(2, 10, 8, 5), 1.0));
    }

    #[test]
    fn test_sf_invalid_parameters() {
        assert!(hypergeom_sf(0, 5, 6, 1).is_nan());
        assert!(hypergeom_sf(0, 5, 1, 6).is_nan());
    }

    #[test]
    fn test_sf_large_population_is_finite() {
        let p = hypergeom_sf(5, 40_000, 200, 300);
        assert!(p.is_finite());
        assert!(p > 0.0 && p < 1.0);
    }

    fn ontology() -> Ontology {
        let mut ont = Ontology::new(
            DatasetType::Ontology,
            DatasetName::new("toy").unwrap(),
            "toy ontology",
            None,
        )
        .unwrap();
        let background: Vec<String> = (0..40).map(|i| format!("bg{:02}", i)).collect();
        ont.add_term(
            Term::new("small", "tight cluster").with_loci(["g1", "g2", "g3", "g4"]),
            false,
        )
        .unwrap();
        ont.add_term(
            Term::new("broad", "everything").with_loci(
                background
                    .iter()
                    .cloned()
                    .chain(["g1".to_string(), "g2".to_string()]),
            ),
            false,
        )
        .unwrap();
        ont.add_term(
            Term::new("unrelated", "no overlap").with_loci(["bg00", "bg01"]),
            false,
        )
        .unwrap();
        ont
    }

    #[test]
    fn test_enrichment_finds_tight_cluster() {
        let ont = ontology();
        let hits = ont.enrichment(["g1", "g2", "g3"], 0.05, 300);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "small");
        let p = hits[0].pval().unwrap();
        assert!(p > 0.0 && p < 0.05);
    }

    #[test]
    fn test_enrichment_respects_max_term_size() {
        let ont = ontology();
        let hits = ont.enrichment(["g1", "g2", "g3"], 1.0, 10);
        assert!(hits.iter().all(|t| t.id != "broad"));
        assert!(hits.iter().any(|t| t.id == "small"));
    }

    #[test]
    fn test_enrichment_only_tests_overlapping_terms() {
        let ont = ontology();
        let hits = ont.enrichment(["g1"], 1.0, 300);
        assert!(hits.iter().all(|t| t.id != "unrelated"));
    }

    #[test]
    fn test_enrichment_sorted_by_pval() {
        let ont = ontology();
        let hits = ont.enrichment(["g1", "g2"], 1.0, 300);
        let pvals: Vec<f64> = hits.iter().filter_map(Term::pval).collect();
        assert_eq!(pvals.len(), hits.len());
        assert!(pvals.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_enrichment_empty_list() {
        let ont = ontology();
        let hits = ont.enrichment(Vec::<String>::new(), 1.0, 300);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_enrichment_unannotated_loci_extend_population() {
        let ont = ontology();
        let with_noise = ont.enrichment(["g1", "g2", "g3", "novel1", "novel2"], 1.0, 300);
        let small = with_noise.iter().find(|t| t.id == "small").unwrap();
        // 44 annotated loci plus 2 novel ones; 3 of 5 draws hit the 4-locus term
        // P(X >= 3) = (C(4,3)C(42,2) + C(4,4)C(42,1)) / C(46,5)
        assert!(close(small.pval().unwrap(), 3486.0 / 1_370_754.0));
    }
}
