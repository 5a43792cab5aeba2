//! Braille glyph layout.
//!
//! A glyph cell packs a 2×4 block of pixels into one character of the Unicode
//! Braille Patterns block (U+2800..=U+28FF). Each pixel maps to one dot bit.

mod braille;

pub use braille::{dot_bit, glyph_codepoint, BRAILLE_BASE, CELL_COLS, CELL_ROWS, CELL_DOTS, DOT_BITS};
