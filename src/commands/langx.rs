//! ## Language Transformations
//!
//! Subcommands that read a program from stdin, transform it, and write the result to stdout.

use std::io::Write;
use crate::lang::nextbasic::{self,Directives,parse_records};
use crate::lang::nextbasic::settings::{self,Settings};
use crate::lang::nextbasic::tokenizer::Tokenizer;
use crate::lang::nextbasic::renumber::Renumberer;
use crate::plus3dos::Plus3DosFile;
use crate::{DYNERR,STDRESULT};
use super::{CommandError,read_stdin_bytes,read_stdin_string,eprint_diagnostics};

fn get_settings(cmd: &clap::ArgMatches) -> Result<Settings,DYNERR> {
    match cmd.get_one::<String>("settings") {
        Some(json) => settings::parse(json),
        None => Ok(Settings::new())
    }
}

/// Write tokenized output, framed unless `raw`, as a hex dump if going to the console
fn write_object(cmd: &clap::ArgMatches,tokens: &[u8],autostart: Option<u16>) -> STDRESULT {
    let object = match cmd.get_flag("raw") {
        true => tokens.to_vec(),
        false => Plus3DosFile::from_program(tokens,autostart)?.to_bytes()?
    };
    if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
        crate::display_block(0,&object);
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}

/// Frame lines that are already tokenized
fn frame(cmd: &clap::ArgMatches) -> STDRESULT {
    let dat = read_stdin_bytes("tokenize")?;
    if Plus3DosFile::test(&dat) {
        log::error!("input already has a +3DOS header");
        return Err(Box::new(CommandError::UnsupportedFormat));
    }
    let recs = parse_records(&dat)?;
    if recs.len()==0 {
        log::error!("no program lines were found");
        return Err(Box::new(CommandError::UnsupportedFormat));
    }
    let end: usize = recs.iter().map(|r| r.payload.len() + 4).sum();
    if end < dat.len() {
        log::warn!("ignoring {} bytes after line {}",dat.len()-end,recs[recs.len()-1].number);
    }
    write_object(cmd,&dat[0..end],cmd.get_one::<u16>("autostart").copied())
}

pub fn tokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    if cmd.get_flag("binary") {
        return frame(cmd);
    }
    let program = read_stdin_string("tokenize")?;
    let mut tokenizer = Tokenizer::new();
    tokenizer.set_settings(get_settings(cmd)?);
    let tokens = tokenizer.tokenize(&program)?;
    eprint_diagnostics(tokenizer.diagnostics());
    if tokens.len()==0 {
        log::error!("no program lines were found");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let autostart = match cmd.get_one::<u16>("autostart") {
        Some(line) => Some(*line),
        None => tokenizer.directives().autostart
    };
    if let Some(name) = &tokenizer.directives().name {
        log::info!("tokenized program {}",name);
    }
    write_object(cmd,&tokens,autostart)
}

pub fn detokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let dat = read_stdin_bytes("detokenize")?;
    let mut tokenizer = Tokenizer::new();
    tokenizer.set_settings(get_settings(cmd)?);
    let mut directives = Directives {
        name: cmd.get_one::<String>("name").cloned(),
        autostart: None
    };
    let listing = match Plus3DosFile::test(&dat) {
        true => {
            let file = Plus3DosFile::from_bytes(&dat)?;
            log::debug!("+3DOS header: {:?}",file.header());
            directives.autostart = file.autostart();
            tokenizer.detokenize(file.program())?
        },
        false => {
            log::info!("no +3DOS header, assuming bare line records");
            tokenizer.detokenize(&dat)?
        }
    };
    if listing.len()==0 {
        log::error!("no program lines were found");
        return Err(Box::new(CommandError::UnsupportedFormat));
    }
    print!("{}{}",directives.listing(),listing);
    Ok(())
}

pub fn renumber(cmd: &clap::ArgMatches) -> STDRESULT {
    let program = read_stdin_string("renumber")?;
    let mut renumberer = Renumberer::new();
    renumberer.set_settings(get_settings(cmd)?);
    let result = renumberer.renumber(&program,cmd.get_one::<u16>("step").copied());
    eprint_diagnostics(renumberer.diagnostics());
    match result? {
        Some(new_prog) => print!("{}",new_prog),
        None => print!("{}",program)
    }
    Ok(())
}

pub fn loader(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = match cmd.get_one::<String>("name") {
        Some(n) if n.len() > 0 && !n.contains('"') => n,
        _ => {
            log::error!("loader needs a file name without quotes");
            return Err(Box::new(CommandError::InvalidCommand));
        }
    };
    let start = match cmd.get_one::<u16>("start") {
        Some(addr) => *addr,
        None => nextbasic::DEFAULT_CODE_START
    };
    let mut tokenizer = Tokenizer::new();
    let tokens = tokenizer.tokenize(&nextbasic::loader_source(name,start))?;
    write_object(cmd,&tokens,tokenizer.directives().autostart)
}
