//! Pixel and glyph-grid geometry shared by the frame buffer and the runtime.
//!
//! Canonical space:
//! - Integer pixels, origin top-left
//! - +X right, +Y down
//! - One glyph cell covers a 2×4 pixel block

mod color;
mod dims;

pub use color::Rgb8;
pub use dims::{div_round_up, round_down_to_multiple, GlyphDims, PixelDims};
