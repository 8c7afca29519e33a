//! Statement splitter
//!
//! Splits the text of one line (number already removed) into statements separated by `:`,
//! with `:` inside a string never counting as a separator.  A statement that begins with
//! `;` or `REM` starts the comment, which runs to the end of the line.

use std::ops::Range;
use super::token_maps::TokenTable;
use super::REM_TOKEN;

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum CommentTrigger {
    Rem,
    Semicolon
}

#[derive(Debug,Clone,PartialEq)]
pub struct Comment {
    pub trigger: CommentTrigger,
    /// index of the trigger
    pub start: usize,
    /// the comment text proper, after the trigger and one optional space following REM
    pub text: Range<usize>
}

#[derive(Debug,Clone,PartialEq)]
pub struct SplitLine {
    /// statement ranges in order, empty statements are kept
    pub statements: Vec<Range<usize>>,
    pub comment: Option<Comment>
}

/// If a comment trigger is at `idx` return it with the start of the comment text.
fn comment_at(line: &[u8],idx: usize) -> Option<(CommentTrigger,usize)> {
    if idx >= line.len() {
        return None;
    }
    if line[idx]==b';' {
        return Some((CommentTrigger::Semicolon,idx+1));
    }
    if line.len() >= idx+3 && line[idx..idx+3].eq_ignore_ascii_case(b"REM") {
        // REMOUNT is a command
        if let Some((tok,_)) = TokenTable::get().longest_match(line,idx) {
            if tok != REM_TOKEN {
                return None;
            }
        }
        let mut text_start = idx + 3;
        if text_start < line.len() && line[text_start]==b' ' {
            text_start += 1;
        }
        return Some((CommentTrigger::Rem,text_start));
    }
    None
}

/// Split a line into statements and a trailing comment.
/// Unterminated strings simply run to the end of the line.
pub fn split_line(line: &[u8]) -> SplitLine {
    let mut statements = Vec::new();
    let mut in_quote = false;
    let mut seg_start = 0;
    let mut at_boundary = true;
    let mut i = 0;
    loop {
        if at_boundary {
            let mut j = i;
            while j < line.len() && line[j].is_ascii_whitespace() {
                j += 1;
            }
            if let Some((trigger,text_start)) = comment_at(line,j) {
                return SplitLine {
                    statements,
                    comment: Some(Comment { trigger, start: j, text: text_start..line.len() })
                };
            }
            at_boundary = false;
        }
        if i >= line.len() {
            statements.push(seg_start..line.len());
            break;
        }
        match line[i] {
            b'"' => in_quote = !in_quote,
            b':' if !in_quote => {
                statements.push(seg_start..i);
                seg_start = i + 1;
                at_boundary = true;
            },
            _ => {}
        }
        i += 1;
    }
    SplitLine { statements, comment: None }
}
