//! Character table: the glyphs that have their own byte in the Next character set.
//!
//! Pound and copyright replace ASCII backtick and DEL, 0x81-0x8F are the block graphics.
//! Byte 0x80 (blank block) is plain space on screen and is left to the escape notation.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const CHARS: [(u8,char);17] = [
    (0x60,'£'),
    (0x7f,'©'),
    (0x81,'\u{259D}'), // quadrant upper right
    (0x82,'\u{2598}'), // quadrant upper left
    (0x83,'\u{2580}'), // upper half
    (0x84,'\u{2597}'), // quadrant lower right
    (0x85,'\u{2590}'), // right half
    (0x86,'\u{259A}'),
    (0x87,'\u{259C}'),
    (0x88,'\u{2596}'), // quadrant lower left
    (0x89,'\u{259E}'),
    (0x8a,'\u{258C}'), // left half
    (0x8b,'\u{259B}'),
    (0x8c,'\u{2584}'), // lower half
    (0x8d,'\u{259F}'),
    (0x8e,'\u{2599}'),
    (0x8f,'\u{2588}')  // full block
];

struct CharTable {
    to_byte: HashMap<char,u8>,
    to_char: HashMap<u8,char>
}

static TABLE: LazyLock<CharTable> = LazyLock::new(|| {
    let mut to_byte = HashMap::new();
    let mut to_char = HashMap::new();
    for (b,c) in CHARS {
        assert!(to_byte.insert(c,b).is_none(),"glyph {} assigned twice",c);
        assert!(to_char.insert(b,c).is_none(),"byte {} assigned twice",b);
    }
    CharTable { to_byte, to_char }
});

/// Byte for a glyph that is not ASCII
pub fn glyph_to_byte(c: char) -> Option<u8> {
    TABLE.to_byte.get(&c).copied()
}

/// Glyph for a byte that has one
pub fn byte_to_glyph(b: u8) -> Option<char> {
    TABLE.to_char.get(&b).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn both_ways() {
        for (b,c) in CHARS {
            assert_eq!(glyph_to_byte(c),Some(b));
            assert_eq!(byte_to_glyph(b),Some(c));
        }
        assert_eq!(glyph_to_byte('a'),None);
        assert_eq!(byte_to_glyph(0x80),None);
    }
}
