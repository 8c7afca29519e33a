//! ### +3DOS files
//!
//! Files saved by the Next (and the +3 before it) begin with a 128 byte header.
//! It holds a signature, the total file length, a BASIC style sub-header giving the
//! file type and its parameters, and a checksum over the first 126 bytes.
//! This module uses the `binrw` crate to read and write the header.

use std::io::Cursor;
use binrw::{BinRead,BinWrite};
use num_traits::FromPrimitive;
use num_derive::FromPrimitive;
use thiserror::Error;
use log::{debug,trace};
use crate::lang::nextbasic::parse_records;
use crate::lang::linenum::MAX_LINE_NUMBER;
use crate::DYNERR;

pub const HEADER_SIZE: usize = 128;
const PADDING: usize = 104;
/// autostart value meaning the program does not run when loaded
pub const NO_AUTOSTART: u16 = 0x8000;

#[derive(Error,Debug)]
pub enum Error {
    #[error("+3DOS signature not found")]
    Signature,
    #[error("+3DOS checksum mismatch, expected {expected}, found {actual}")]
    Checksum { expected: u8, actual: u8 },
    #[error("+3DOS file type {0} is not a program")]
    NotAProgram(u8),
    #[error("+3DOS file is truncated")]
    Truncated,
    #[error("program of {0} bytes is too large for +3DOS")]
    TooLarge(usize)
}

#[derive(FromPrimitive,Debug,PartialEq)]
pub enum FileType {
    Program = 0,
    NumberArray = 1,
    CharacterArray = 2,
    Code = 3
}

#[derive(BinRead, BinWrite, Debug, Clone)]
#[brw(little, magic = b"PLUS3DOS")]
#[br(assert(soft_eof == 0x1a, "soft EOF is {:X}", soft_eof))]
pub struct Header {
    pub soft_eof: u8,
    pub issue: u8,
    pub version: u8,
    /// header plus content
    pub total_length: u32,
    pub file_type: u8,
    pub program_length: u16,
    /// autostart line for programs, `NO_AUTOSTART` for none
    pub autostart: u16,
    /// offset to the variables, equal to the program length when there are none
    pub variables_offset: u16,
    pub reserved: u8,
    #[br(count = PADDING)]
    pub padding: Vec<u8>,
    pub checksum: u8
}

/// Sum of bytes 0 through 125, modulo 256, byte 126 is not included
fn checksum(header_bytes: &[u8]) -> u8 {
    header_bytes[0..HEADER_SIZE-2].iter().fold(0u8,|acc,b| acc.wrapping_add(*b))
}

impl Header {
    fn new_program(length: u16,autostart: Option<u16>) -> Self {
        Self {
            soft_eof: 0x1a,
            issue: 1,
            version: 0,
            total_length: HEADER_SIZE as u32 + length as u32,
            file_type: FileType::Program as u8,
            program_length: length,
            autostart: autostart.unwrap_or(NO_AUTOSTART),
            variables_offset: length,
            reserved: 0,
            padding: vec![0;PADDING],
            checksum: 0
        }
    }
}

/// A BASIC program with its +3DOS header
pub struct Plus3DosFile {
    header: Header,
    program: Vec<u8>
}

impl Plus3DosFile {
    /// Quick check whether the data starts with a +3DOS header
    pub fn test(dat: &[u8]) -> bool {
        dat.len() >= HEADER_SIZE && dat[0..8]==*b"PLUS3DOS"
    }
    /// Frame tokenized program lines, `autostart` is the line to run after loading
    pub fn from_program(program: &[u8],autostart: Option<u16>) -> Result<Self,DYNERR> {
        if program.len() > u16::MAX as usize {
            return Err(Box::new(Error::TooLarge(program.len())));
        }
        Ok(Self {
            header: Header::new_program(program.len() as u16,autostart),
            program: program.to_vec()
        })
    }
    /// Interpret file data, the header must be valid and describe a program
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if dat.len() < HEADER_SIZE {
            return Err(Box::new(Error::Truncated));
        }
        let header = match Header::read(&mut Cursor::new(&dat[0..HEADER_SIZE])) {
            Ok(h) => h,
            Err(e) => {
                debug!("{}",e);
                return Err(Box::new(Error::Signature));
            }
        };
        let expected = checksum(dat);
        if header.checksum != expected {
            return Err(Box::new(Error::Checksum { expected, actual: header.checksum }));
        }
        match FileType::from_u8(header.file_type) {
            Some(FileType::Program) => {},
            _ => return Err(Box::new(Error::NotAProgram(header.file_type)))
        }
        let body = &dat[HEADER_SIZE..];
        let mut end = usize::min(header.variables_offset as usize,body.len());
        if (header.total_length as usize) < HEADER_SIZE + end {
            trace!("total length {} is short",header.total_length);
            end = (header.total_length as usize).saturating_sub(HEADER_SIZE);
        }
        // the variables offset is not always right, the line sentinel has the final say
        let lines: usize = parse_records(&body[0..end])?.iter().map(|r| r.payload.len() + 4).sum();
        debug!("program is {} bytes, {} bytes of lines",end,lines);
        Ok(Self {
            program: body[0..lines].to_vec(),
            header
        })
    }
    /// File image: header with fresh checksum followed by the program
    pub fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let mut writer = Cursor::new(Vec::new());
        self.header.write(&mut writer)?;
        let mut ans = writer.into_inner();
        ans[HEADER_SIZE-1] = checksum(&ans);
        ans.extend_from_slice(&self.program);
        Ok(ans)
    }
    /// Autostart line, None if the program does not run by itself
    pub fn autostart(&self) -> Option<u16> {
        match self.header.autostart {
            n if n <= MAX_LINE_NUMBER => Some(n),
            _ => None
        }
    }
    /// The tokenized program lines
    pub fn program(&self) -> &[u8] {
        &self.program
    }
    pub fn header(&self) -> &Header {
        &self.header
    }
}
