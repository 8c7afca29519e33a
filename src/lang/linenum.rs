//! # Module for handling line numbers
//!
//! A task we want to support for any BASIC dialect is renumbering.
//! This provides tools that any dialect should be able to use.

use std::collections::HashMap;
use log::{trace,warn};
use crate::lang;
use crate::DYNERR;

/// Highest line number a program may use.
pub const MAX_LINE_NUMBER: u16 = 9999;

/// Spacing chosen by program size: larger programs get a tighter step so they fit below 10000.
pub fn policy_step(line_count: usize) -> u16 {
    match line_count {
        n if n < 1000 => 10,
        n if n < 2000 => 5,
        n if n < 5000 => 2,
        _ => 1
    }
}

/// Mapping from old line numbers to new ones, built in one pass over the program.
/// New numbers start at the step and increase by the step in file order.
pub struct LineNumberMap {
    map: HashMap<u16,u16>,
    step: u16,
    identity: bool,
    clamped: Option<lang::Error>
}

impl LineNumberMap {
    /// Build the map from the line numbers in file order.
    /// A `requested` step larger than the policy step is clamped, see `clamped`.
    /// Repeated numbers keep the mapping of their first occurrence.
    pub fn build(numbers: &[u16], requested: Option<u16>) -> Result<Self,DYNERR> {
        let allowed = policy_step(numbers.len());
        let step = match requested {
            Some(0) => return Err(Box::new(lang::Error::InvalidStep)),
            Some(s) if s > allowed => {
                warn!("step {} too large for {} lines, using {}",s,numbers.len(),allowed);
                allowed
            },
            Some(s) => s,
            None => allowed
        };
        let clamped = match requested {
            Some(s) if s > allowed => Some(lang::Error::StepTooLarge { requested: s, allowed }),
            _ => None
        };
        let mut map = HashMap::new();
        let mut identity = true;
        let mut next = step as usize;
        for num in numbers {
            if map.contains_key(num) {
                continue;
            }
            if next > MAX_LINE_NUMBER as usize {
                return Err(Box::new(lang::Error::LineNumber(format!("renumbering exceeds {}",MAX_LINE_NUMBER))));
            }
            trace!("map {} -> {}",num,next);
            identity &= *num as usize == next;
            map.insert(*num,next as u16);
            next += step as usize;
        }
        Ok(Self { map, step, identity, clamped })
    }
    pub fn get(&self, old: u16) -> Option<u16> {
        self.map.get(&old).copied()
    }
    /// True if no line would change
    pub fn is_identity(&self) -> bool {
        self.identity
    }
    pub fn step(&self) -> u16 {
        self.step
    }
    /// If the requested step had to be reduced, this holds the diagnostic.
    pub fn clamped(&self) -> Option<&lang::Error> {
        self.clamped.as_ref()
    }
}
