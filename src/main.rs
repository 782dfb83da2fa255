//! camoco CLI entry point

use camoco::cli::common::EXIT_ERROR;
use camoco::cli::{Cli, Context, dispatch};
use camoco::config::Config;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match Config::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    camoco::logging::init(config.logging.level, cli.verbose, cli.quiet);

    let ctx = Context::from_cli(&cli, config);
    let exit_code = dispatch(&ctx, &cli.command);

    process::exit(exit_code);
}
