//! Command dispatch
//!
//! Every subcommand is bound to a handler taking the shared [`Context`] and
//! its typed options. A handler returns `Ok(None)` on success, `Ok(Some(code))`
//! to exit with a specific status, or an error, which is reported on stderr.

use crate::cli::args::Command;
use crate::cli::common::{Context, EXIT_ERROR, EXIT_SUCCESS, HandlerResult};
use crate::cli::{analysis, build, enrich, help, list, rm};

/// Run the handler bound to `command` and return the process exit status
pub fn dispatch(ctx: &Context, command: &Command) -> i32 {
    let name = command.name();
    tracing::debug!(command = name, "dispatching");

    let result = match command {
        Command::List(args) => list::run_list(ctx, args),
        Command::Rm(args) => rm::run_rm(ctx, args),
        Command::PlotGwas(args) => analysis::run_plot_gwas(ctx, args),
        Command::Density(args) => analysis::run_density(ctx, args),
        Command::Locality(args) => analysis::run_locality(ctx, args),
        Command::Help(args) => help::run_help(args.command.as_deref()),
        Command::BuildOntology(args) => build::run_build_ontology(ctx, args),
        Command::Enrich(args) => enrich::run_enrich(ctx, args),
    };

    exit_code(name, result)
}

/// Map a handler result onto an exit status
pub fn exit_code(command: &str, result: HandlerResult) -> i32 {
    match result {
        Ok(None) => EXIT_SUCCESS,
        Ok(Some(code)) => code,
        Err(e) => {
            tracing::debug!(command, error = ?e, "command failed");
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}
