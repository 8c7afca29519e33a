//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod langx;
pub mod completions;

use std::io::Read;
use colored::Colorize;
use crate::lang;
use crate::DYNERR;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("Input source is not supported")]
    UnsupportedFormat
}

/// Read all of stdin as bytes, refusing line entry from the console.
/// `verb` names the subcommand in messages.
fn read_stdin_bytes(verb: &str) -> Result<Vec<u8>,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `{}`, please pipe something in",verb);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut dat = Vec::new();
    std::io::stdin().read_to_end(&mut dat)?;
    if dat.len()==0 {
        log::error!("{} did not receive any data from previous node",verb);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    Ok(dat)
}

/// Read all of stdin as a string, as `read_stdin_bytes`
fn read_stdin_string(verb: &str) -> Result<String,DYNERR> {
    let dat = read_stdin_bytes(verb)?;
    match String::from_utf8(dat) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::error!("the input to {} could not be interpreted as a string",verb);
            Err(Box::new(e))
        }
    }
}

/// Print non-fatal problems on stderr with a summary count
fn eprint_diagnostics(diagnostics: &[lang::Error]) {
    let mut err = 0;
    let mut warn = 0;
    for diag in diagnostics {
        match diag {
            lang::Error::StepTooLarge { .. } => {
                eprintln!("{}: {}","warning".bright_yellow(),diag);
                warn += 1;
            },
            _ => {
                eprintln!("{}: {}","error".red(),diag);
                err += 1;
            }
        }
    }
    if warn > 0 {
        eprintln!("! {} {}",warn.to_string().bright_yellow(),"warnings".bright_yellow());
    }
    if err > 0 {
        eprintln!("\u{2717} {} {}",err.to_string().red(),"errors recovered".red());
    }
}
