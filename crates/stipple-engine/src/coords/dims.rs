use crate::glyph::{CELL_COLS, CELL_ROWS};

/// Integer division rounding towards positive infinity.
#[inline]
pub const fn div_round_up(n: u32, by: u32) -> u32 {
    n.div_ceil(by)
}

/// Largest multiple of `m` that is `<= n`.
#[inline]
pub const fn round_down_to_multiple(n: u32, m: u32) -> u32 {
    (n / m) * m
}

/// Raster size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelDims {
    pub width: u32,
    pub height: u32,
}

impl PixelDims {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in the raster.
    #[inline]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Glyph grid covering this raster; trailing partial blocks get a cell.
    #[inline]
    pub const fn glyph_dims(self) -> GlyphDims {
        GlyphDims {
            cols: div_round_up(self.width, CELL_COLS),
            rows: div_round_up(self.height, CELL_ROWS),
        }
    }

    /// Smallest whole-cell raster that contains this one.
    #[inline]
    pub const fn round_up_to_cells(self) -> Self {
        Self {
            width: div_round_up(self.width, CELL_COLS) * CELL_COLS,
            height: div_round_up(self.height, CELL_ROWS) * CELL_ROWS,
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Pixel size as `[width, height]` floats, the layout shaders expect.
    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Width over height; 1.0 when either side is zero.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Glyph grid size in terminal character cells.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct GlyphDims {
    pub cols: u32,
    pub rows: u32,
}

impl GlyphDims {
    #[inline]
    pub const fn cell_count(self) -> usize {
        self.cols as usize * self.rows as usize
    }
}
