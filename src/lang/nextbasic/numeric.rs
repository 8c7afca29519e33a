//! # Numeric literal codec
//!
//! Literals in a program line are stored twice: the ASCII text as typed, then the marker
//! byte 0x0E, then 5 bytes holding the value.  Small integers use the integer form
//! `00 sign lo hi 00`.  Everything else uses the floating form, an exponent byte biased
//! by 128 followed by a 32 bit big endian mantissa whose leading 1 is replaced by the sign.

use std::sync::LazyLock;
use num_traits::Float;
use regex::Regex;
use log::trace;
use crate::lang;
use crate::DYNERR;

static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("bad regex"));
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]*\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)$").expect("bad regex")
});
static BIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[01]{1,16}$").expect("bad regex"));

/// Integer form, caller guarantees the range.
fn encode_int(val: i64) -> [u8;5] {
    let (sign,biased) = match val < 0 {
        true => (0xff,val + 65536),
        false => (0x00,val)
    };
    let [lo,hi] = u16::to_le_bytes(biased as u16);
    [0,sign,lo,hi,0]
}

/// Floating form of a nonzero finite value.
fn encode_float(val: f64,text: &str) -> Result<[u8;5],DYNERR> {
    if !val.is_finite() {
        return Err(Box::new(lang::Error::NumberOverflow(text.to_string())));
    }
    if !val.is_normal() {
        return Ok(encode_int(0));
    }
    let (mant,exp,sign) = val.integer_decode();
    // normalized so that val = 0.1xxx (binary) * 2^e
    let e = exp as i32 + 53;
    let biased = e + 128;
    if biased <= 0 {
        trace!("{} is too small, storing 0",text);
        return Ok(encode_int(0));
    }
    if biased > 255 {
        return Err(Box::new(lang::Error::NumberOverflow(text.to_string())));
    }
    let bits33 = mant >> 20;
    let mut word = (bits33 >> 1) as u32;
    if bits33 & 1 == 1 {
        word |= 1;
    }
    word &= 0x7fff_ffff;
    if sign < 0 {
        word |= 0x8000_0000;
    }
    let [b1,b2,b3,b4] = u32::to_be_bytes(word);
    Ok([biased as u8,b1,b2,b3,b4])
}

/// Encode the text of a numeric literal.
/// Integer text in (-65536,65536) takes the integer form, as does a zero written as a float.
pub fn encode(text: &str) -> Result<[u8;5],DYNERR> {
    if INT_RE.is_match(text) {
        if let Ok(val) = text.parse::<i64>() {
            if val > -65536 && val < 65536 {
                return Ok(encode_int(val));
            }
        }
        return match text.parse::<f64>() {
            Ok(val) => encode_float(val,text),
            Err(_) => Err(Box::new(lang::Error::InvalidNumericLiteral(text.to_string())))
        };
    }
    if FLOAT_RE.is_match(text) {
        return match text.parse::<f64>() {
            Ok(val) if val==0.0 => Ok(encode_int(0)),
            Ok(val) => encode_float(val,text),
            Err(_) => Err(Box::new(lang::Error::InvalidNumericLiteral(text.to_string())))
        };
    }
    Err(Box::new(lang::Error::InvalidNumericLiteral(text.to_string())))
}

/// Encode the digits following `BIN`, up to 16 binary digits, using the integer form.
pub fn encode_bin(digits: &str) -> Result<[u8;5],DYNERR> {
    if !BIN_RE.is_match(digits) {
        return Err(Box::new(lang::Error::InvalidNumericLiteral(digits.to_string())));
    }
    match u16::from_str_radix(digits,2) {
        Ok(val) => Ok(encode_int(val as i64)),
        Err(_) => Err(Box::new(lang::Error::InvalidNumericLiteral(digits.to_string())))
    }
}

/// Value held by 5 encoded bytes
pub fn decode(bytes: &[u8;5]) -> f64 {
    if bytes[0]==0 {
        let mag = u16::from_le_bytes([bytes[2],bytes[3]]) as f64;
        return match bytes[1] {
            0xff => mag - 65536.0,
            _ => mag
        };
    }
    let word = u32::from_be_bytes([bytes[1],bytes[2],bytes[3],bytes[4]]);
    let negative = word & 0x8000_0000 != 0;
    let mant = (word | 0x8000_0000) as f64 / 4294967296.0;
    let ans = mant * 2f64.powi(bytes[0] as i32 - 128);
    match negative {
        true => -ans,
        false => ans
    }
}

/// True if the text is a numeric literal this codec accepts
pub fn is_literal(text: &str) -> bool {
    INT_RE.is_match(text) || FLOAT_RE.is_match(text)
}
