//! # NextBASIC transformations
//!
//! This module is used by the CLI to convert programs for the ZX Spectrum Next.
//! There is no parser in the usual sense, NextBASIC is tokenized by scanning each
//! statement for keywords and numbers, see `tokenizer`.
//!
//! A program in memory is a sequence of line records:
//! * line number, 2 bytes big endian
//! * payload length, 2 bytes little endian
//! * payload, ending with 0x0D
//!
//! There is no end marker.  When reading, the program is assumed to end at the first record
//! whose number is above 9999 or lower than the previous one.

mod token_maps;
mod char_maps;
#[cfg(test)]
mod tokenize_test;
pub mod numeric;
pub mod splitter;
pub mod tokenizer;
pub mod renumber;
pub mod settings;

use log::{debug,trace};
use crate::lang;
use crate::lang::linenum::MAX_LINE_NUMBER;
use crate::DYNERR;

pub const EOL: u8 = 0x0d;
/// precedes the 5 byte form of a number
pub const NUMBER_MARKER: u8 = 0x0e;
pub const QUOTE: u8 = b'"';
pub const REM_TOKEN: u8 = 0xea;
pub const BIN_TOKEN: u8 = 0xc4;
pub const MOD_TOKEN: u8 = 0x8b;
pub const DEF_FN_TOKEN: u8 = 0xce;
/// tokens from here up end an integer expression
pub const INT_EXPR_CLOSE: u8 = 0xca;
/// Default machine code address for the loader
pub const DEFAULT_CODE_START: u16 = 32768;

/// Scanning state within one line, shared by the tokenizer and detokenizer.
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum ScanMode {
    Normal,
    InQuote,
    /// remainder of the line is copied as is
    InComment,
    /// bytes of an encoded number are left to pass
    SkippingNumber(u8),
    /// numbers are integer typed and stored as text only
    InIntegerExpression
}

/// One program line in tokenized form
#[derive(Debug,Clone,PartialEq)]
pub struct LineRecord {
    pub number: u16,
    /// includes the 0x0D terminator
    pub payload: Vec<u8>
}

impl LineRecord {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans = u16::to_be_bytes(self.number).to_vec();
        ans.extend_from_slice(&u16::to_le_bytes(self.payload.len() as u16));
        ans.extend_from_slice(&self.payload);
        ans
    }
}

/// Split program bytes into line records, stopping at the end of program sentinel.
/// A record that runs past the end of the data is an error.
pub fn parse_records(prog: &[u8]) -> Result<Vec<LineRecord>,DYNERR> {
    let mut ans: Vec<LineRecord> = Vec::new();
    let mut ptr = 0;
    while ptr + 4 <= prog.len() {
        let number = u16::from_be_bytes([prog[ptr],prog[ptr+1]]);
        if number > MAX_LINE_NUMBER {
            trace!("end of program at offset {}, line {}",ptr,number);
            break;
        }
        if let Some(prev) = ans.last() {
            if number < prev.number {
                trace!("end of program at offset {}, line {} follows {}",ptr,number,prev.number);
                break;
            }
        }
        let len = u16::from_le_bytes([prog[ptr+2],prog[ptr+3]]) as usize;
        if ptr + 4 + len > prog.len() {
            debug!("line {} wants {} bytes, {} available",number,len,prog.len()-ptr-4);
            return Err(Box::new(lang::Error::Detokenization));
        }
        ans.push(LineRecord { number, payload: prog[ptr+4..ptr+4+len].to_vec() });
        ptr += 4 + len;
    }
    Ok(ans)
}

/// Metadata carried by `#` lines in the text form of a program
#[derive(Debug,Clone,PartialEq,Default)]
pub struct Directives {
    pub name: Option<String>,
    pub autostart: Option<u16>
}

impl Directives {
    /// Interpret a `#` line, returns false if it is only a comment
    pub fn update(&mut self,line: &str) -> Result<bool,DYNERR> {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("#program") => {
                self.name = words.next().map(|s| s.to_string());
                Ok(true)
            },
            Some("#autostart") => {
                self.autostart = match words.next() {
                    Some(n) => match n.parse::<u16>() {
                        Ok(num) if num <= MAX_LINE_NUMBER => Some(num),
                        _ => return Err(Box::new(lang::Error::LineNumber(n.to_string())))
                    },
                    None => Some(0)
                };
                Ok(true)
            },
            _ => Ok(false)
        }
    }
    /// Text form, one directive per line
    pub fn listing(&self) -> String {
        let mut ans = String::new();
        if let Some(name) = &self.name {
            ans += &format!("#program {}\n",name);
        }
        match self.autostart {
            Some(0) => ans += "#autostart\n",
            Some(n) => ans += &format!("#autostart {}\n",n),
            None => {}
        }
        ans
    }
}

/// BASIC program that loads the named code file at `start` and calls it.
/// The LOAD line has no number and picks one up from the line before.
pub fn loader_source(name: &str,start: u16) -> String {
    let mut ans = String::from("#autostart\n");
    ans += &format!("10 CLEAR {}\n",start.saturating_sub(1));
    ans += &format!("LOAD \"{}\" CODE {}\n",name,start);
    ans += &format!("30 RANDOMIZE USR {}\n",start);
    ans
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn records_stop_at_sentinel() {
        let prog = hex::decode("000A0200F50D001402000D0D00050200F50D").expect("hex");
        let recs = parse_records(&prog).expect("parse failed");
        assert_eq!(recs.len(),2);
        assert_eq!(recs[1].number,20);
        assert_eq!(recs[1].to_bytes(),hex::decode("001402000D0D").expect("hex"));
    }
    #[test]
    fn records_stop_above_9999() {
        let prog = hex::decode("000A0200F50D27100200F50D").expect("hex");
        assert_eq!(parse_records(&prog).expect("parse failed").len(),1);
    }
    #[test]
    fn truncated_record() {
        let prog = hex::decode("000A0500F50D").expect("hex");
        assert!(parse_records(&prog).is_err());
    }
    #[test]
    fn directives() {
        let mut d = Directives::default();
        assert!(d.update("#program demo").expect("update failed"));
        assert!(d.update("#autostart").expect("update failed"));
        assert!(!d.update("# just a note").expect("update failed"));
        assert_eq!(d.listing(),"#program demo\n#autostart\n");
        d.update("#autostart 100").expect("update failed");
        assert_eq!(d.autostart,Some(100));
        assert!(d.update("#autostart 10000").is_err());
    }
    #[test]
    fn loader() {
        assert_eq!(loader_source("game",32768),
            "#autostart\n10 CLEAR 32767\nLOAD \"game\" CODE 32768\n30 RANDOMIZE USR 32768\n");
    }
}
