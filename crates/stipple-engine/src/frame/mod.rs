//! Raster frame buffer and its terminal text encoding.
//!
//! Per frame the runtime:
//! - resets the frame
//! - copies the backend raster in (`write_raster` / `raster_mut`)
//! - folds pixels into glyph cells (`convert`)
//! - serializes the cells into escape-coded text (`serialize`)

mod buffer;
pub mod encode;

pub use buffer::{Frame, GlyphCell, RasterSizeError, BYTES_PER_PIXEL};
