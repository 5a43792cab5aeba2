//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - owning the offscreen render target and reading it back as RGB
//! - collecting uncaptured device errors

mod error;
mod gpu;
mod target;

pub use error::PendingErrors;
pub use gpu::{Gpu, GpuInit};
pub use target::TARGET_FORMAT;
