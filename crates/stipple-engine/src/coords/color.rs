use bytemuck::{Pod, Zeroable};

/// 24-bit RGB color as stored in the raster (one byte per channel).
///
/// Layout matches one raster pixel, so a raster slice can be viewed as
/// `&[Rgb8]` with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns `true` when every channel is zero.
    ///
    /// Black pixels are treated as unlit by the glyph conversion.
    #[inline]
    pub const fn is_black(self) -> bool {
        (self.r | self.g | self.b) == 0
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
