use crate::coords::PixelDims;
use crate::device::Gpu;

use super::ctx::LayerCtx;

/// Scene code driven by the runtime once per frame.
///
/// Each frame the runtime calls `update` on every layer in registration
/// order, then `render` on every layer in the same order, so all layers can
/// stage state before any of them draws.
///
/// `B` is the rendering backend; production layers draw with [`Gpu`].
pub trait Layer<B: ?Sized = Gpu> {
    /// Advances layer state. `elapsed` is seconds since the loop started,
    /// `dims` is the current raster size.
    fn update(&mut self, ctx: &mut LayerCtx<'_, B>, elapsed: f32, dims: PixelDims) {
        let _ = (ctx, elapsed, dims);
    }

    /// Issues draw calls against the backend's target.
    fn render(&mut self, ctx: &mut LayerCtx<'_, B>);
}
