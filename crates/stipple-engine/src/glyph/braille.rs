/// First code point of the Braille Patterns block (the empty pattern).
pub const BRAILLE_BASE: u32 = 0x2800;

/// Pixel columns covered by one glyph cell.
pub const CELL_COLS: u32 = 2;

/// Pixel rows covered by one glyph cell.
pub const CELL_ROWS: u32 = 4;

pub const CELL_DOTS: usize = (CELL_COLS * CELL_ROWS) as usize;

/// Dot bit for each sub-position of a cell, indexed `gx + gy * CELL_COLS`.
///
/// Terminals draw the Braille block literally, so this order must not change:
///
/// ```text
/// 0x01 0x08
/// 0x02 0x10
/// 0x04 0x20
/// 0x40 0x80
/// ```
pub const DOT_BITS: [u8; CELL_DOTS] = [
    0x01, 0x08, //
    0x02, 0x10, //
    0x04, 0x20, //
    0x40, 0x80, //
];

/// Returns the dot bit for sub-position `(gx, gy)` inside a cell.
///
/// `gx < CELL_COLS` and `gy < CELL_ROWS` are preconditions.
#[inline]
pub const fn dot_bit(gx: u32, gy: u32) -> u8 {
    debug_assert!(gx < CELL_COLS && gy < CELL_ROWS);
    DOT_BITS[(gx + gy * CELL_COLS) as usize]
}

/// Code point of the Braille glyph for a dot mask.
#[inline]
pub const fn glyph_codepoint(mask: u8) -> u32 {
    BRAILLE_BASE + mask as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_expected_bits() {
        assert_eq!(dot_bit(0, 0), 0x01);
        assert_eq!(dot_bit(1, 0), 0x08);
        assert_eq!(dot_bit(0, 3), 0x40);
        assert_eq!(dot_bit(1, 3), 0x80);
    }

    #[test]
    fn bits_are_distinct_and_cover_the_byte() {
        let mut seen = 0u8;
        for bit in DOT_BITS {
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0, "bit {bit:#04x} repeated");
            seen |= bit;
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn glyph_codepoint_spans_braille_block() {
        assert_eq!(glyph_codepoint(0x00), 0x2800);
        assert_eq!(glyph_codepoint(0x01), 0x2801);
        assert_eq!(glyph_codepoint(0xFF), 0x28FF);
    }
}
