//! # Language Module
//!
//! Language independent pieces live here: the error taxonomy shared by the dialects,
//! the backtick escape notation used to write raw bytes in program text, and helpers
//! for reading JSON settings.  Language specific operations such as tokenization are
//! in the submodules.

pub mod linenum;
pub mod nextbasic;

use thiserror::Error;
use serde_json;

#[derive(Error,Debug)]
pub enum Error {
    #[error("Tokenization error")]
    Tokenization,
    #[error("Detokenization error")]
    Detokenization,
    #[error("Invalid Line Number: {0}")]
    LineNumber(String),
    #[error("Duplicate line number {0}")]
    DuplicateLineNumber(u16),
    #[error("Line {line} refers to missing line {target}")]
    UnresolvedReference { line: u16, target: u16 },
    #[error("Invalid numeric literal `{0}`")]
    InvalidNumericLiteral(String),
    #[error("Numeric literal out of range `{0}`")]
    NumberOverflow(String),
    #[error("Step {requested} too large, using {allowed}")]
    StepTooLarge { requested: u16, allowed: u16 },
    #[error("Invalid renumber step")]
    InvalidStep,
    #[error("Unknown token {0}")]
    UnknownToken(u8),
    #[error("Settings could not be parsed")]
    Settings
}

/// Render a raw byte using the backtick escape, e.g. 0x1B becomes "`x1b".
pub fn escape_byte(byte: u8) -> String {
    format!("`x{:02x}",byte)
}

/// Try to parse a backtick escape starting at `chars[idx]`, which must be the backtick.
/// Accepts `` `ddd `` (1-3 decimal digits, the longest prefix that stays within a byte)
/// or `` `xH `` / `` `xHH `` (hex).
/// Returns the byte and the number of chars consumed, or None if this is a plain backtick.
pub fn parse_escape(chars: &[char], idx: usize) -> Option<(u8,usize)> {
    if idx >= chars.len() || chars[idx] != '`' {
        return None;
    }
    let rest = &chars[idx+1..];
    if rest.len() > 0 && (rest[0]=='x' || rest[0]=='X') {
        let digits: String = rest[1..].iter().take(2).take_while(|c| c.is_ascii_hexdigit()).collect();
        if digits.len()==0 {
            return None;
        }
        let padded = match digits.len() {
            1 => "0".to_string() + &digits,
            _ => digits.clone()
        };
        return match hex::decode(&padded) {
            Ok(v) => Some((v[0], 2 + digits.len())),
            Err(_) => None
        };
    }
    let digits: String = rest.iter().take(3).take_while(|c| c.is_ascii_digit()).collect();
    let mut len = digits.len();
    while len > 0 {
        if let Ok(val) = digits[0..len].parse::<u8>() {
            return Some((val, 1 + len));
        }
        len -= 1;
    }
    None
}

/// Update `curr` if `key` is found in the JSON object `maybe_obj` and holds an integer.
pub fn update_json_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut i64) {
    if let Some(outer) = maybe_obj.as_object() {
        if let Some(x) = outer.get(key) {
            if let Some(val) = x.as_i64() {
                *curr = val;
            }
        }
    }
}

/// Like `update_json_i64`, except an explicit `null` clears the value.
pub fn update_json_opt_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut Option<i64>) {
    if let Some(outer) = maybe_obj.as_object() {
        if let Some(x) = outer.get(key) {
            if x.is_null() {
                *curr = None;
            } else if let Some(val) = x.as_i64() {
                *curr = Some(val);
            }
        }
    }
}
