//! # Command Line Interface
//!
//! The command tree is built in `cli.rs`, the subcommands run in the `commands` module.

mod cli;

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use nextbasic::commands;
use nextbasic::commands::CommandError;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);
    let main_cmd = cli::build_cli();
    let matches = main_cmd.clone().get_matches();

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(main_cmd,cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("renumber") {
        return commands::langx::renumber(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("loader") {
        return commands::langx::loader(cmd);
    }

    error!("No subcommand was found, try `nextbasic --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
