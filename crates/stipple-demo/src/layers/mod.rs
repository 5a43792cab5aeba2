//! Demo scenes drawn through the engine's layer interface.

mod colorwheel;
mod flame;
mod pipeline;

pub use colorwheel::ColorWheel;
pub use flame::{Flame, Palette};
