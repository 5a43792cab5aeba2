use crate::coords::PixelDims;

/// Device handles plus the shape of the offscreen target.
///
/// Borrowed from the backend for one layer call; pipelines built from it must
/// use `target_format`.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target_format: wgpu::TextureFormat,
    pub dims: PixelDims, // raster px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target_format: wgpu::TextureFormat,
        dims: PixelDims,
    ) -> Self {
        Self {
            device,
            queue,
            target_format,
            dims,
        }
    }

    /// Width over height of the target; 1.0 for an empty target.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.dims.aspect()
    }
}

/// One submission's worth of recording: the encoder and the view passes
/// draw into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
