//! Module containing the NextBASIC tokenizer
//!
//! Tokenization works one statement at a time.  Keywords are replaced by their token using
//! the longest match at each position, whitespace outside strings is dropped, and numeric
//! literals are followed by their 5 byte form.  Strings, comments and dot commands are stored
//! as they are, after character conversion.

use std::collections::HashSet;
use log::{trace,debug,info,warn,error};
use crate::lang;
use crate::lang::linenum::MAX_LINE_NUMBER;
use crate::DYNERR;
use super::token_maps::{TokenTable,FIRST_TOKEN,is_ident_byte,listing_form};
use super::splitter::{split_line,CommentTrigger};
use super::settings::Settings;
use super::{char_maps,numeric};
use super::{ScanMode,LineRecord,Directives,parse_records};
use super::{EOL,NUMBER_MARKER,QUOTE,REM_TOKEN,BIN_TOKEN,MOD_TOKEN,DEF_FN_TOKEN,INT_EXPR_CLOSE};

const SIGILS: [u8;3] = [b'%',b'@',b'$'];

/// Handles tokenization of NextBASIC
pub struct Tokenizer {
    settings: Settings,
    directives: Directives,
    diagnostics: Vec<lang::Error>
}

/// Convert program text to bytes in the Next character set, resolving backtick escapes.
/// Characters with no byte are dropped.
pub fn text_to_bytes(text: &str) -> Vec<u8> {
    let chars: Vec<char> = text.chars().collect();
    let mut ans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some((b,consumed)) = lang::parse_escape(&chars,i) {
            ans.push(b);
            i += consumed;
            continue;
        }
        if c.is_ascii() {
            ans.push(c as u8);
        } else if let Some(b) = char_maps::glyph_to_byte(c) {
            ans.push(b);
        } else {
            warn!("character {} has no equivalent, dropping",c);
        }
        i += 1;
    }
    ans
}

/// Listing form of a byte inside a string or comment
fn literal_char(b: u8) -> String {
    match char_maps::byte_to_glyph(b) {
        Some(c) => c.to_string(),
        None if b >= 0x20 && b <= 0x7e => (b as char).to_string(),
        None => lang::escape_byte(b)
    }
}

/// Position just past a numeric literal starting at `i`, including any exponent
fn literal_end(stmt: &[u8],i: usize) -> usize {
    let mut j = i;
    while j < stmt.len() && (stmt[j].is_ascii_digit() || stmt[j]==b'.') {
        j += 1;
    }
    if j < stmt.len() && (stmt[j]==b'e' || stmt[j]==b'E') {
        let mut k = j + 1;
        if k < stmt.len() && (stmt[k]==b'+' || stmt[k]==b'-') {
            k += 1;
        }
        if k < stmt.len() && stmt[k].is_ascii_digit() {
            while k < stmt.len() && stmt[k].is_ascii_digit() {
                k += 1;
            }
            j = k;
        }
    }
    j
}

/// Copy the function name and parameter list following DEF FN.
/// Each parameter gets a marker and 5 empty bytes for the interpreter to fill.
fn def_fn_params(stmt: &[u8],mut i: usize,ans: &mut Vec<u8>) -> usize {
    while i < stmt.len() && stmt[i] != b'(' {
        if !stmt[i].is_ascii_whitespace() {
            ans.push(stmt[i]);
        }
        i += 1;
    }
    if i < stmt.len() {
        ans.push(b'(');
        i += 1;
    }
    let param_byte = |b: u8| is_ident_byte(b) || b==b'$';
    while i < stmt.len() && stmt[i] != b')' {
        let c = stmt[i];
        i += 1;
        if c.is_ascii_whitespace() {
            continue;
        }
        ans.push(c);
        if param_byte(c) && (i >= stmt.len() || !param_byte(stmt[i])) {
            ans.push(NUMBER_MARKER);
            ans.extend_from_slice(&[0;5]);
        }
    }
    i
}

impl Tokenizer {
    /// Create a new `Tokenizer` structure
    pub fn new() -> Self {
        Self {
            settings: Settings::new(),
            directives: Directives::default(),
            diagnostics: Vec::new()
        }
    }
    pub fn set_settings(&mut self,settings: Settings) {
        self.settings = settings;
    }
    /// Directives found by the last call to `tokenize`
    pub fn directives(&self) -> &Directives {
        &self.directives
    }
    /// Problems found by the last call to `tokenize` that did not stop it
    pub fn diagnostics(&self) -> &Vec<lang::Error> {
        &self.diagnostics
    }
    /// Tokenize one statement, mode starts as normal.
    fn tokenize_statement(&self,stmt: &[u8]) -> Result<Vec<u8>,DYNERR> {
        let table = TokenTable::get();
        let mut ans = Vec::new();
        let mut i = 0;
        while i < stmt.len() && stmt[i].is_ascii_whitespace() {
            i += 1;
        }
        // dot commands are handed to the command as typed
        if i < stmt.len() && stmt[i]==b'.' && !(i+1 < stmt.len() && stmt[i+1].is_ascii_digit()) {
            ans.extend_from_slice(stmt[i..].trim_ascii_end());
            return Ok(ans);
        }
        let mut mode = ScanMode::Normal;
        while i < stmt.len() {
            let c = stmt[i];
            if mode==ScanMode::InQuote {
                ans.push(c);
                if c==QUOTE {
                    mode = ScanMode::Normal;
                }
                i += 1;
                continue;
            }
            if c==QUOTE {
                ans.push(c);
                mode = ScanMode::InQuote;
                i += 1;
                continue;
            }
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if let Some((tok,end)) = table.longest_match(stmt,i) {
                trace!("token {} at {}",tok,i);
                ans.push(tok);
                i = end;
                if tok==MOD_TOKEN {
                    mode = ScanMode::InIntegerExpression;
                } else if tok >= INT_EXPR_CLOSE {
                    mode = ScanMode::Normal;
                }
                if tok==BIN_TOKEN {
                    while i < stmt.len() && stmt[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    let start = i;
                    while i < stmt.len() && (stmt[i]==b'0' || stmt[i]==b'1') {
                        i += 1;
                    }
                    if i > start {
                        let digits = String::from_utf8_lossy(&stmt[start..i]).to_string();
                        ans.extend_from_slice(&stmt[start..i]);
                        ans.push(NUMBER_MARKER);
                        ans.extend_from_slice(&numeric::encode_bin(&digits)?);
                    }
                }
                if tok==DEF_FN_TOKEN {
                    i = def_fn_params(stmt,i,&mut ans);
                }
                continue;
            }
            let after_ident = i > 0 && is_ident_byte(stmt[i-1]);
            if SIGILS.contains(&c) && !after_ident {
                ans.push(c);
                mode = ScanMode::InIntegerExpression;
                i += 1;
                continue;
            }
            if mode==ScanMode::InIntegerExpression && (c==b',' || c==b'=') {
                ans.push(c);
                mode = ScanMode::Normal;
                i += 1;
                continue;
            }
            let starts_number = c.is_ascii_digit() || (c==b'.' && i+1 < stmt.len() && stmt[i+1].is_ascii_digit());
            if starts_number && !after_ident {
                let end = literal_end(stmt,i);
                let text = String::from_utf8_lossy(&stmt[i..end]).to_string();
                ans.extend_from_slice(&stmt[i..end]);
                if mode==ScanMode::InIntegerExpression && !numeric::is_literal(&text) {
                    return Err(Box::new(lang::Error::InvalidNumericLiteral(text)));
                }
                if mode==ScanMode::Normal {
                    ans.push(NUMBER_MARKER);
                    ans.extend_from_slice(&numeric::encode(&text)?);
                }
                i = end;
                continue;
            }
            ans.push(c);
            i += 1;
        }
        Ok(ans)
    }
    /// Tokenize the text of one line (without line number), producing the payload.
    pub fn tokenize_line(&self,text: &str) -> Result<Vec<u8>,DYNERR> {
        let line = text_to_bytes(text);
        let split = split_line(&line);
        let mut ans = Vec::new();
        for (n,rng) in split.statements.iter().enumerate() {
            if n > 0 {
                ans.push(b':');
            }
            ans.append(&mut self.tokenize_statement(&line[rng.clone()])?);
        }
        if let Some(comment) = split.comment {
            if split.statements.len() > 0 {
                ans.push(b':');
            }
            ans.push(match comment.trigger {
                CommentTrigger::Rem => REM_TOKEN,
                CommentTrigger::Semicolon => b';'
            });
            ans.extend_from_slice(&line[comment.text]);
        }
        ans.push(EOL);
        Ok(ans)
    }
    /// Tokenize a program contained in a UTF8 string, result is the sequence of line records.
    /// Directives are collected and can be retrieved afterwards.
    pub fn tokenize(&mut self,program: &str) -> Result<Vec<u8>,DYNERR> {
        self.directives = Directives::default();
        self.diagnostics = Vec::new();
        let mut ans = Vec::new();
        let mut used = HashSet::new();
        let mut prev: Option<u16> = None;
        for raw in program.lines() {
            let line = raw.trim();
            if line.len()==0 {
                continue;
            }
            if line.starts_with('#') {
                if !self.directives.update(line)? {
                    trace!("skipping comment {}",line);
                }
                continue;
            }
            let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
            let number = match digits.len() {
                0 => (prev.unwrap_or(0) as i64).checked_add(self.settings.tokenizer.auto_step).unwrap_or(i64::MAX),
                _ => match digits.parse::<i64>() {
                    Ok(n) => n,
                    Err(_) => i64::MAX
                }
            };
            if number > MAX_LINE_NUMBER as i64 {
                error!("line number {} is too large",number);
                return Err(Box::new(lang::Error::LineNumber(number.to_string())));
            }
            let number = number as u16;
            if used.contains(&number) {
                error!("duplicate line number {}, line dropped",number);
                self.diagnostics.push(lang::Error::DuplicateLineNumber(number));
                continue;
            }
            if let Some(p) = prev {
                if number < p {
                    warn!("line {} follows line {}, the program will end there when loaded",number,p);
                }
            }
            let payload = match self.tokenize_line(&line[digits.len()..]) {
                Ok(p) => p,
                Err(e) => {
                    error!("line {}: {}",number,e);
                    return Err(e);
                }
            };
            if payload.len() > u16::MAX as usize {
                error!("line {} is too long",number);
                return Err(Box::new(lang::Error::Tokenization));
            }
            debug!("line {} has {} bytes",number,payload.len());
            ans.append(&mut LineRecord { number, payload }.to_bytes());
            used.insert(number);
            prev = Some(number);
        }
        Ok(ans)
    }
    /// Detokenize one line payload into its listing, without line number
    pub fn detokenize_line(&self,payload: &[u8]) -> Result<String,DYNERR> {
        let table = TokenTable::get();
        let mut code = String::new();
        let mut mode = ScanMode::Normal;
        for (i,b) in payload.iter().enumerate() {
            let b = *b;
            if let ScanMode::SkippingNumber(n) = mode {
                mode = match n {
                    1 => ScanMode::Normal,
                    _ => ScanMode::SkippingNumber(n-1)
                };
                continue;
            }
            if b==EOL && i+1==payload.len() {
                break;
            }
            match mode {
                ScanMode::InQuote => {
                    code += &literal_char(b);
                    if b==QUOTE {
                        mode = ScanMode::Normal;
                    }
                },
                ScanMode::InComment => {
                    code += &literal_char(b);
                },
                _ => {
                    if b==NUMBER_MARKER {
                        mode = ScanMode::SkippingNumber(5);
                    } else if b==QUOTE {
                        code.push('"');
                        mode = ScanMode::InQuote;
                    } else if b==REM_TOKEN {
                        let kw = listing_form("REM",&code);
                        code += &kw;
                        mode = ScanMode::InComment;
                    } else if b==b';' && (code.trim().len()==0 || code.trim_end().ends_with(':')) {
                        code.push(';');
                        mode = ScanMode::InComment;
                    } else if b==b':' {
                        code.truncate(code.trim_end().len());
                        code.push(':');
                    } else if b >= FIRST_TOKEN {
                        match table.decode(b) {
                            Some(kw) => {
                                let listed = listing_form(kw,&code);
                                code += &listed;
                            },
                            None => return Err(Box::new(lang::Error::UnknownToken(b)))
                        }
                    } else if b >= 0x20 && b <= 0x7e {
                        code += &literal_char(b);
                    } else {
                        code += &lang::escape_byte(b);
                    }
                }
            }
        }
        if let ScanMode::SkippingNumber(n) = mode {
            debug!("line ends {} bytes into a number",5-n);
        }
        Ok(code.trim_end().to_string())
    }
    /// Detokenize from byte array into a UTF8 string, one listing line per record.
    pub fn detokenize(&self,prog: &[u8]) -> Result<String,DYNERR> {
        let recs = parse_records(prog)?;
        let width = self.settings.detokenizer.line_number_width as usize;
        let mut code = String::new();
        for (count,rec) in recs.iter().enumerate() {
            if count as i64 >= self.settings.detokenizer.max_lines {
                warn!("stopping after {} lines",count);
                break;
            }
            let text = self.detokenize_line(&rec.payload)?;
            code += &format!("{:>width$} {}\n",rec.number,text,width=width);
        }
        info!("detokenized {} lines",recs.len());
        Ok(code)
    }
}
