//! Help command implementation

use crate::cli::args::Cli;
use crate::cli::common::HandlerResult;
use crate::error::OptionError;
use clap::CommandFactory;

/// Run `camoco help [COMMAND]`
pub fn run_help(command: Option<&str>) -> HandlerResult {
    print!("{}", help_text(command)?);
    Ok(None)
}

/// Long help for camoco, or for one of its commands (aliases accepted)
pub fn help_text(command: Option<&str>) -> Result<String, OptionError> {
    let mut cli = Cli::command();
    cli.build();

    match command {
        None => Ok(cli.render_long_help().to_string()),
        Some(name) => {
            let known: Vec<String> = cli
                .get_subcommands()
                .map(|c| c.get_name().to_string())
                .collect();
            match cli.find_subcommand_mut(name) {
                Some(sub) => Ok(sub.render_long_help().to_string()),
                None => Err(OptionError::new(
                    "COMMAND",
                    format!("unknown command '{}' (expected one of: {})", name, known.join(", ")),
                )),
            }
        }
    }
}
