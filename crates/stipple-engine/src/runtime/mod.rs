//! Render loop.
//!
//! Owns the backend, the frame buffer and the layers, and drives them one
//! frame at a time until an error, a cancellation or a stop request.

mod backend;
mod cancel;
mod controller;

pub use backend::RenderBackend;
pub use cancel::Cancellation;
pub use controller::{LoopExit, RunState, Runtime, RuntimeConfig};
