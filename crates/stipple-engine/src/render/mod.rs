//! Renderer-facing handles for layers drawing with wgpu.
//!
//! Convention:
//! - the target is an offscreen `Rgba8Unorm` texture, origin top-left
//! - each layer records into its own encoder; passes load the existing target

mod ctx;
mod pass;

pub use ctx::{RenderCtx, RenderTarget};
pub use pass::begin_pass;
