//! Stipple engine crate.
//!
//! Renders frames from a headless wgpu device into a terminal as colored
//! Braille text. This crate owns the GPU runtime, the raster-to-glyph
//! pipeline and the render loop; scene code plugs in as layers.

pub mod core;
pub mod device;
pub mod runtime;
pub mod time;

pub mod coords;
pub mod diagnostics;
pub mod frame;
pub mod glyph;
pub mod logging;
pub mod render;
pub mod terminal;
