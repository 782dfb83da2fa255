//! List command implementation
//!
//! `camoco list [TYPE] [NAME]` prints the catalog entries of the given type
//! (every type when omitted) whose names match the NAME regular expression.

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::common::{Context, HandlerResult};
use crate::output::{DatasetHumanFormatter, DatasetJsonlFormatter};
use termcolor::StandardStream;

/// Run the list command
pub fn run_list(ctx: &Context, args: &ListArgs) -> HandlerResult {
    let registry = ctx.open_registry()?;
    let entries = registry.list(args.kind, &args.name)?;

    tracing::debug!(
        kind = ?args.kind,
        pattern = %args.name,
        matches = entries.len(),
        "listing datasets"
    );

    match args.format {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(ctx.stdout_color());
            DatasetHumanFormatter::new().write(&mut stdout, &entries)?;
        }
        OutputFormat::Jsonl => {
            print!("{}", DatasetJsonlFormatter::new().format(&entries)?);
        }
    }

    Ok(None)
}
