//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the render loop and the
//! scene code plugged into it: the [`Layer`] trait and the per-frame
//! [`LayerCtx`] handed to every layer call.

mod ctx;
mod layer;

pub use ctx::LayerCtx;
pub use layer::Layer;
