//! Rm command implementation
//!
//! `camoco rm TYPE NAME` removes a dataset from the catalog along with its
//! payload. Unless `--force` is given the user is asked to confirm first.

use crate::cli::args::RmArgs;
use crate::cli::common::{Context, HandlerResult};
use crate::registry::ALL_NAMES;
use std::io::{self, BufRead, Write};

/// Run the rm command, confirming on stdin
pub fn run_rm(ctx: &Context, args: &RmArgs) -> HandlerResult {
    let stdin = io::stdin();
    run_rm_with_input(ctx, args, &mut stdin.lock())
}

/// Run the rm command, reading the confirmation from `input`
pub fn run_rm_with_input(ctx: &Context, args: &RmArgs, input: &mut impl BufRead) -> HandlerResult {
    let mut registry = ctx.open_registry()?;

    // Fail on unknown datasets before asking anything
    if args.name != ALL_NAMES {
        registry.require(args.kind, &args.name)?;
    }

    if !args.force {
        let target = if args.name == ALL_NAMES {
            format!("every {} dataset", args.kind)
        } else {
            format!("{}.{}", args.kind, args.name)
        };
        if !confirm(&format!("Remove {}?", target), input)? {
            eprintln!("Nothing removed.");
            return Ok(None);
        }
    }

    let removed = registry.remove(args.kind, &args.name)?;
    if removed.is_empty() {
        eprintln!("No {} datasets to remove.", args.kind);
    }
    for entry in &removed {
        println!("Removed {}.{}", entry.kind, entry.name);
    }
    Ok(None)
}

/// Ask a yes/no question on stderr; anything but y/yes is a no
fn confirm(question: &str, input: &mut impl BufRead) -> io::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
