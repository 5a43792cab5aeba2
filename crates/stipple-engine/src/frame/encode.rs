//! ANSI escape and UTF-8 emission helpers used by frame serialization.
//!
//! Everything writes into a caller-owned `String` so a whole frame is built
//! in one buffer and handed to the terminal in a single write.

use crate::coords::Rgb8;

/// Resets all SGR attributes.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Clears the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Moves the cursor to the top-left cell.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Appends the UTF-8 encoding of `codepoint`.
///
/// Returns `false` (and appends nothing) for surrogates and values above
/// U+10FFFF.
#[inline]
pub fn push_codepoint(out: &mut String, codepoint: u32) -> bool {
    match char::from_u32(codepoint) {
        Some(c) => {
            out.push(c);
            true
        }
        None => false,
    }
}

/// Appends a 24-bit foreground color escape: `ESC [ 38 ; 2 ; r ; g ; b m`.
pub fn push_fg_color(out: &mut String, color: Rgb8) {
    out.push_str("\x1b[38;2;");
    push_decimal(out, color.r);
    out.push(';');
    push_decimal(out, color.g);
    out.push(';');
    push_decimal(out, color.b);
    out.push('m');
}

fn push_decimal(out: &mut String, v: u8) {
    if v >= 100 {
        out.push(char::from(b'0' + v / 100));
    }
    if v >= 10 {
        out.push(char::from(b'0' + (v / 10) % 10));
    }
    out.push(char::from(b'0' + v % 10));
}
