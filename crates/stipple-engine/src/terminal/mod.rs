//! Terminal size negotiation.
//!
//! The raster is sized so its glyph grid fits the terminal with one spare
//! row and column, quantized to whole glyph cells.

mod size;

pub use size::{desired_dims, negotiate, StdoutTerminal, TermSize, TerminalProbe, MIN_DIMS};
