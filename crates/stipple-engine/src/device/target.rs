use crate::coords::PixelDims;

/// Color format of the offscreen render target.
///
/// Non-sRGB so the bytes read back are exactly what the shaders wrote.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const TARGET_BYTES_PER_PIXEL: u32 = 4;

/// Offscreen color texture plus the staging buffer it is read back through.
pub(crate) struct OffscreenTarget {
    staging: wgpu::Buffer,
    view: wgpu::TextureView,
    texture: wgpu::Texture,
    dims: PixelDims,
    padded_bytes_per_row: u32,
}

impl OffscreenTarget {
    pub(crate) fn new(device: &wgpu::Device, dims: PixelDims) -> Self {
        let width = dims.width.max(1);
        let height = dims.height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("stipple offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_bytes_per_row(width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stipple readback staging"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            staging,
            view,
            texture,
            dims,
            padded_bytes_per_row,
        }
    }

    pub(crate) fn dims(&self) -> PixelDims {
        self.dims
    }

    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(crate) fn staging(&self) -> &wgpu::Buffer {
        &self.staging
    }

    pub(crate) fn padded_bytes_per_row(&self) -> u32 {
        self.padded_bytes_per_row
    }

    /// Records a copy of the whole texture into the staging buffer.
    pub(crate) fn encode_readback(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.texture.height()),
                },
            },
            self.texture.size(),
        );
    }
}

/// Row pitch of the staging buffer; wgpu requires 256-byte aligned rows.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * TARGET_BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Copies padded RGBA rows into a packed RGB raster of `dims`.
///
/// Writes exactly `dims.area() * 3` bytes; `dst` must be that long.
pub(crate) fn rgba_rows_to_rgb(src: &[u8], padded_bytes_per_row: u32, dims: PixelDims, dst: &mut [u8]) {
    let row_px = dims.width as usize;
    let src_row_len = row_px * TARGET_BYTES_PER_PIXEL as usize;
    let dst_row_len = row_px * 3;

    if dst_row_len == 0 {
        return;
    }

    for (src_row, dst_row) in src
        .chunks(padded_bytes_per_row as usize)
        .zip(dst.chunks_exact_mut(dst_row_len))
    {
        for (rgba, rgb) in src_row[..src_row_len]
            .chunks_exact(4)
            .zip(dst_row.chunks_exact_mut(3))
        {
            rgb.copy_from_slice(&rgba[..3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_pitch_is_aligned() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(200), 1024);
    }

    #[test]
    fn rgba_rows_drop_alpha_and_padding() {
        let dims = PixelDims::new(2, 2);
        let pitch = 12u32;
        #[rustfmt::skip]
        let src = [
            1, 2, 3, 255,   4, 5, 6, 255,   0xEE, 0xEE, 0xEE, 0xEE,
            7, 8, 9, 255,  10, 11, 12, 255, 0xEE, 0xEE, 0xEE, 0xEE,
        ];
        let mut dst = [0u8; 12];
        rgba_rows_to_rgb(&src, pitch, dims, &mut dst);
        assert_eq!(dst, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }
}
