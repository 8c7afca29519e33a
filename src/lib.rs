//! # `nextbasic` main library
//!
//! This library converts ZX Spectrum Next BASIC programs between their listing (text) form
//! and the tokenized form the interpreter keeps in memory and saves to disk.
//!
//! ## Architecture
//!
//! Language services are in `lang`.  The dialect itself is in `lang::nextbasic`:
//! * `lang::nextbasic::tokenizer` handles (de)tokenization of program lines
//! * `lang::nextbasic::renumber` rewrites line numbers and the references to them
//! * `lang::nextbasic::numeric` packs literals into the 5-byte numeric format
//!
//! Dialect independent line number tools are in `lang::linenum`.
//!
//! ## Files
//!
//! Tokenized programs are stored on disk inside a +3DOS header, see `plus3dos`.
//! The header is only a frame, the tokenizer itself never needs it.

pub mod lang;
pub mod plus3dos;
pub mod commands;

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display binary to stdout in columns of hex and ascii
pub fn display_block(start_addr: u16,block: &[u8]) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("| {}",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}
