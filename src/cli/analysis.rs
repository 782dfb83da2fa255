//! plotGWAS, density and locality
//!
//! These commands share one flow: check the COB and GWAS datasets exist,
//! select terms from the GWAS, build an [`AnalysisRequest`] and hand it to
//! the context's backend (or print it for `--dry-run`).

use crate::cli::args::{LocalityArgs, OverlapArgs, PlotGwasArgs};
use crate::cli::backend::{Analysis, AnalysisRequest, DatasetRef};
use crate::cli::common::{Context, HandlerResult};
use crate::error::{CamocoError, OntologyError};
use crate::ontology::Ontology;
use crate::registry::Registry;
use crate::types::DatasetType;
use serde::Serialize;

/// Which GWAS terms an analysis covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSelection {
    All,
    Named(Vec<String>),
}

/// Run `camoco plotGWAS`
pub fn run_plot_gwas(ctx: &Context, args: &PlotGwasArgs) -> HandlerResult {
    args.validate()?;

    let mut options = args.clone();
    options.out = Some(args.out_path());

    let selection = match &args.term {
        Some(term) => TermSelection::Named(vec![term.clone()]),
        None => TermSelection::All,
    };

    forward(
        ctx,
        Plan {
            analysis: Analysis::PlotGwas,
            cob: &args.cob,
            gwas: &args.gwas,
            selection,
            min_term_size: args.min_term_size,
            max_term_size: args.max_term_size,
            dry_run: args.dry_run,
            interactive: false,
        },
        &options,
    )
}

/// Run `camoco density`
pub fn run_density(ctx: &Context, args: &OverlapArgs) -> HandlerResult {
    args.validate()?;
    forward(ctx, Plan::overlap(Analysis::Density, args), args)
}

/// Run `camoco locality`
pub fn run_locality(ctx: &Context, args: &LocalityArgs) -> HandlerResult {
    args.validate()?;
    forward(ctx, Plan::overlap(Analysis::Locality, &args.common), args)
}

struct Plan<'a> {
    analysis: Analysis,
    cob: &'a str,
    gwas: &'a str,
    selection: TermSelection,
    min_term_size: usize,
    max_term_size: Option<usize>,
    dry_run: bool,
    interactive: bool,
}

impl<'a> Plan<'a> {
    fn overlap(analysis: Analysis, args: &'a OverlapArgs) -> Self {
        let selection = if args.all_terms() {
            TermSelection::All
        } else {
            TermSelection::Named(args.terms.clone())
        };
        Plan {
            analysis,
            cob: &args.cob,
            gwas: &args.gwas,
            selection,
            min_term_size: args.min_term_size,
            max_term_size: args.max_term_size,
            dry_run: args.dry_run,
            interactive: args.interactive,
        }
    }
}

fn forward<T: Serialize>(ctx: &Context, plan: Plan<'_>, options: &T) -> HandlerResult {
    let basedir = ctx.basedir()?;
    let registry = Registry::open(&basedir)?;

    let cob = dataset_ref(&registry, DatasetType::Cob, plan.cob)?;
    let gwas_ref = dataset_ref(&registry, DatasetType::Gwas, plan.gwas)?;
    let gwas = Ontology::load(&registry, DatasetType::Gwas, plan.gwas)?;

    let terms = select_terms(
        &gwas,
        &plan.selection,
        plan.min_term_size,
        plan.max_term_size,
    )?;
    if terms.is_empty() {
        tracing::warn!(
            gwas = plan.gwas,
            min_term_size = plan.min_term_size,
            max_term_size = ?plan.max_term_size,
            "no GWAS terms left to analyze"
        );
        return Ok(None);
    }

    let request = AnalysisRequest {
        analysis: plan.analysis,
        basedir,
        cob,
        gwas: gwas_ref,
        terms,
        options: serde_json::to_value(options)?,
        interactive: plan.interactive,
    };

    if plan.dry_run {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(None);
    }

    tracing::info!(
        analysis = plan.analysis.as_str(),
        cob = plan.cob,
        gwas = plan.gwas,
        terms = request.terms.len(),
        "forwarding analysis"
    );
    Ok(ctx.backend().run(&request)?)
}

fn dataset_ref(registry: &Registry, kind: DatasetType, name: &str) -> Result<DatasetRef, CamocoError> {
    let entry = registry.require(kind, name)?;
    Ok(DatasetRef {
        kind,
        name: entry.name.clone(),
        payload: registry.payload_path(kind, &entry.name),
    })
}

/// Resolve a term selection against a GWAS, keeping terms whose size is
/// within `[min_size, max_size]`
///
/// Named terms must exist. Returned ids are unique and in id order.
pub fn select_terms(
    gwas: &Ontology,
    selection: &TermSelection,
    min_size: usize,
    max_size: Option<usize>,
) -> Result<Vec<String>, OntologyError> {
    let candidates = match selection {
        TermSelection::All => gwas.terms(),
        TermSelection::Named(ids) => {
            let mut terms = Vec::with_capacity(ids.len());
            for id in ids {
                let term = gwas
                    .get(id)
                    .ok_or_else(|| OntologyError::TermNotFound(id.clone()))?;
                terms.push(term);
            }
            terms
        }
    };

    let mut selected: Vec<String> = candidates
        .into_iter()
        .filter(|term| {
            let fits = term.len() >= min_size && max_size.is_none_or(|max| term.len() <= max);
            if !fits {
                tracing::debug!(term = %term.id, size = term.len(), "skipping term outside size bounds");
            }
            fits
        })
        .map(|term| term.id.clone())
        .collect();
    selected.sort();
    selected.dedup();
    Ok(selected)
}
