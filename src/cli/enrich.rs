//! Enrich command implementation

use crate::cli::args::{EnrichArgs, OutputFormat};
use crate::cli::common::{Context, HandlerResult};
use crate::ontology::Ontology;
use crate::output::{EnrichmentHumanFormatter, EnrichmentJsonlFormatter};
use std::io::{self, Read};
use termcolor::StandardStream;

/// Run `camoco enrich`
pub fn run_enrich(ctx: &Context, args: &EnrichArgs) -> HandlerResult {
    args.validate()?;

    let loci = if args.loci.len() == 1 && args.loci[0] == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        split_loci(&buf)
    } else {
        args.loci.clone()
    };

    let registry = ctx.open_registry()?;
    let ontology = Ontology::load(&registry, args.kind, &args.ontology)?;
    tracing::debug!(summary = %ontology.summary(), loci = loci.len(), "testing enrichment");

    let hits = ontology.enrichment(&loci, args.pval_cutoff, args.max_term_size);

    match args.format {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(ctx.stdout_color());
            EnrichmentHumanFormatter::new(args.pval_cutoff).write(&mut stdout, &hits)?;
        }
        OutputFormat::Jsonl => {
            print!("{}", EnrichmentJsonlFormatter::new().format(&hits)?);
        }
    }

    Ok(None)
}

/// Split whitespace- or comma-separated locus ids
fn split_loci(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
