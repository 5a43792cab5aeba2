use crate::coords::PixelDims;
use crate::diagnostics::{BackendError, ErrorQuery};

/// Rendering backend driven by the [`Runtime`](super::Runtime).
///
/// Errors from `resize`, `clear` and layer draws are not returned; they are
/// reported through [`ErrorQuery`] and collected at the runtime's checkpoints.
pub trait RenderBackend: ErrorQuery {
    /// Current size of the drawing target.
    fn dims(&self) -> PixelDims;

    /// Reallocates the drawing target at `dims`, discarding its contents.
    fn resize(&mut self, dims: PixelDims);

    /// Clears the drawing target to black.
    fn clear(&mut self);

    /// Waits for all submitted work, then copies the target into `raster` as
    /// packed RGB, top row first.
    ///
    /// `raster` must be exactly `dims().area() * 3` bytes; implementations
    /// reject any other length without writing.
    fn finish_and_read(&mut self, raster: &mut [u8]) -> Result<(), BackendError>;
}
