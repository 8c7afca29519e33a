//! Parse settings string sent by any client.
//!
//! The JSON object may carry any subset of the keys, others are ignored:
//! `{"tokenizer":{"autoStep":10},"detokenizer":{"lineNumberWidth":4,"maxLines":10000},"renumber":{"step":5}}`

use serde_json;
use log::error;
use crate::lang;
use crate::lang::{update_json_i64,update_json_opt_i64};
use crate::DYNERR;

#[derive(Clone)]
pub struct Tokenizer {
    /// increment for lines entered without a number
    pub auto_step: i64
}
#[derive(Clone)]
pub struct Detokenizer {
    pub line_number_width: i64,
    pub max_lines: i64
}
#[derive(Clone)]
pub struct Renumber {
    /// None means choose by program size
    pub step: Option<i64>
}
#[derive(Clone)]
pub struct Settings {
    pub tokenizer: Tokenizer,
    pub detokenizer: Detokenizer,
    pub renumber: Renumber
}

impl Settings {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer {
                auto_step: 10
            },
            detokenizer: Detokenizer {
                line_number_width: 4,
                max_lines: 10000
            },
            renumber: Renumber {
                step: None
            }
        }
    }
}

pub fn parse(json: &str) -> Result<Settings,DYNERR> {
    let mut ans = Settings::new();
    let root = match serde_json::from_str::<serde_json::Value>(json) {
        Ok(r) => r,
        Err(e) => {
            error!("settings: {}",e);
            return Err(Box::new(lang::Error::Settings));
        }
    };
    if let Some(obj) = root.as_object() {
        for (key,val) in obj {
            match key.as_str() {
                "tokenizer" => {
                    update_json_i64(val,"autoStep",&mut ans.tokenizer.auto_step);
                },
                "detokenizer" => {
                    update_json_i64(val,"lineNumberWidth",&mut ans.detokenizer.line_number_width);
                    update_json_i64(val,"maxLines",&mut ans.detokenizer.max_lines);
                },
                "renumber" => {
                    update_json_opt_i64(val,"step",&mut ans.renumber.step);
                },
                _ => {}
            }
        }
    }
    if ans.tokenizer.auto_step < 1 || ans.detokenizer.line_number_width < 0 || ans.detokenizer.max_lines < 1 {
        error!("settings out of range");
        return Err(Box::new(lang::Error::Settings));
    }
    Ok(ans)
}
