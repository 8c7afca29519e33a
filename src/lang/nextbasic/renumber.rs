//! ## NextBASIC Renumber Module
//!
//! Works on the text form of a program.  Every line is renumbered in file order,
//! and references following `GO TO`, `GO SUB`, `RESTORE`, and `SAVE "name" LINE`
//! are rewritten, as is the `#autostart` directive.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;
use regex::Regex;
use log::{trace,debug,info,warn,error};
use crate::lang;
use crate::lang::linenum::{LineNumberMap,MAX_LINE_NUMBER};
use crate::DYNERR;
use super::splitter::split_line;
use super::settings::Settings;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*(.*)$").expect("bad regex"));
static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:\bgo\s*to|\bgo\s*sub|\brestore|\bsave\s*"[^"]*"\s*line)\s*(\d+)"#).expect("bad regex")
});

enum Entry {
    Numbered { number: u16, rest: String },
    Directive(String),
    Other(String)
}

pub struct Renumberer {
    settings: Settings,
    diagnostics: Vec<lang::Error>
}

/// true if `idx` is inside a string, counting quotes from the start of `stmt`
fn in_quote(stmt: &str,idx: usize) -> bool {
    stmt[..idx].bytes().filter(|b| *b==b'"').count() % 2 == 1
}

impl Renumberer {
    pub fn new() -> Self {
        Self {
            settings: Settings::new(),
            diagnostics: Vec::new()
        }
    }
    pub fn set_settings(&mut self,settings: Settings) {
        self.settings = settings;
    }
    /// Problems found by the last call to `renumber`
    pub fn diagnostics(&self) -> &Vec<lang::Error> {
        &self.diagnostics
    }
    fn parse(&mut self,program: &str) -> Result<Vec<Entry>,DYNERR> {
        let mut ans = Vec::new();
        for raw in program.lines() {
            if raw.trim().len()==0 {
                continue;
            }
            if raw.trim_start().starts_with('#') {
                ans.push(Entry::Directive(raw.trim().to_string()));
                continue;
            }
            match LINE_RE.captures(raw) {
                Some(caps) => {
                    let number = match caps[1].parse::<u16>() {
                        Ok(n) if n <= MAX_LINE_NUMBER => n,
                        _ => return Err(Box::new(lang::Error::LineNumber(caps[1].to_string())))
                    };
                    ans.push(Entry::Numbered { number, rest: caps[2].trim_end().to_string() });
                },
                None => {
                    warn!("line without a number passed through: {}",raw);
                    ans.push(Entry::Other(raw.to_string()));
                }
            }
        }
        Ok(ans)
    }
    /// Rewrite references in the statements of one line, the comment is left alone.
    /// A statement with any unresolved reference is left unchanged.
    fn rewrite_refs(&mut self,line: u16,text: &str,map: &LineNumberMap) -> String {
        let split = split_line(text.as_bytes());
        let mut edits: Vec<(Range<usize>,u16)> = Vec::new();
        for rng in split.statements {
            let stmt = &text[rng.clone()];
            let mut stmt_edits = Vec::new();
            let mut resolved = true;
            for caps in REF_RE.captures_iter(stmt) {
                let (whole,digits) = match (caps.get(0),caps.get(1)) {
                    (Some(w),Some(d)) => (w,d),
                    _ => continue
                };
                if in_quote(stmt,whole.start()) {
                    continue;
                }
                let target = digits.as_str().parse::<u16>().unwrap_or(u16::MAX);
                match map.get(target) {
                    Some(new_num) => {
                        trace!("line {}: reference {} -> {}",line,target,new_num);
                        stmt_edits.push((rng.start+digits.start()..rng.start+digits.end(),new_num));
                    },
                    None => {
                        error!("line {} refers to missing line {}",line,digits.as_str());
                        self.diagnostics.push(lang::Error::UnresolvedReference { line, target });
                        resolved = false;
                    }
                }
            }
            if resolved {
                edits.append(&mut stmt_edits);
            }
        }
        let mut ans = text.to_string();
        for (rng,new_num) in edits.iter().rev() {
            ans.replace_range(rng.clone(),&new_num.to_string());
        }
        ans
    }
    fn rewrite_directive(&mut self,line: &str,map: &LineNumberMap) -> String {
        let mut words = line.split_whitespace();
        if let (Some("#autostart"),Some(num)) = (words.next(),words.next()) {
            if let Ok(old) = num.parse::<u16>() {
                match map.get(old) {
                    Some(new_num) => return format!("#autostart {}",new_num),
                    None => {
                        error!("autostart refers to missing line {}",old);
                        self.diagnostics.push(lang::Error::UnresolvedReference { line: 0, target: old });
                    }
                }
            }
        }
        line.to_string()
    }
    /// Renumber a program in text form.  If `step` is None the settings or the
    /// program size determine it.  Returns None if no line would change.
    pub fn renumber(&mut self,program: &str,step: Option<u16>) -> Result<Option<String>,DYNERR> {
        self.diagnostics = Vec::new();
        let entries = self.parse(program)?;
        let mut distinct = Vec::new();
        let mut seen = HashSet::new();
        for entry in &entries {
            if let Entry::Numbered { number, .. } = entry {
                if !seen.insert(*number) {
                    error!("duplicate line number {}, first one is used",number);
                    self.diagnostics.push(lang::Error::DuplicateLineNumber(*number));
                    continue;
                }
                distinct.push(*number);
            }
        }
        let requested = match step {
            Some(s) => Some(s),
            None => match self.settings.renumber.step {
                Some(s) if s >= 0 && s <= u16::MAX as i64 => Some(s as u16),
                Some(_) => return Err(Box::new(lang::Error::InvalidStep)),
                None => None
            }
        };
        let map = LineNumberMap::build(&distinct,requested)?;
        if let Some(lang::Error::StepTooLarge { requested, allowed }) = map.clamped() {
            self.diagnostics.push(lang::Error::StepTooLarge { requested: *requested, allowed: *allowed });
        }
        if map.is_identity() {
            info!("Nothing to do");
            return Ok(None);
        }
        debug!("renumbering {} lines with step {}",distinct.len(),map.step());
        let width = self.settings.detokenizer.line_number_width as usize;
        let mut ans = String::new();
        for entry in &entries {
            match entry {
                Entry::Numbered { number, rest } => {
                    // every number is in the map, duplicates share the first mapping
                    let new_num = map.get(*number).unwrap_or(*number);
                    let text = self.rewrite_refs(*number,rest,&map);
                    let listed = format!("{:>width$} {}",new_num,text,width=width);
                    ans += listed.trim_end();
                    ans += "\n";
                },
                Entry::Directive(line) => {
                    ans += &self.rewrite_directive(line,&map);
                    ans += "\n";
                },
                Entry::Other(line) => {
                    ans += line;
                    ans += "\n";
                }
            }
        }
        Ok(Some(ans))
    }
}
