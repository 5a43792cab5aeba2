use std::fmt;

use crate::coords::{GlyphDims, PixelDims, Rgb8};
use crate::glyph::{self, CELL_COLS, CELL_ROWS};

use super::encode;

/// Raster bytes per pixel (packed RGB, no alpha).
pub const BYTES_PER_PIXEL: usize = 3;

/// One glyph cell: the lit dots of a 2×4 block and the color it is drawn in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GlyphCell {
    pub mask: u8,
    pub color: Rgb8,
}

/// Returned when a raster write does not match the frame size exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSizeError {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for RasterSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "raster size mismatch: expected {} bytes, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for RasterSizeError {}

/// CPU-side frame: RGB raster plus the glyph grid derived from it.
///
/// Invariants:
/// - `raster.len() == width * height * BYTES_PER_PIXEL`
/// - the glyph grid is always `ceil(width / 2) × ceil(height / 4)`
///
/// Dimensions are fixed for the lifetime of a `Frame`; a resize allocates a
/// new one.
#[derive(Debug, Clone)]
pub struct Frame {
    dims: PixelDims,
    glyphs: GlyphDims,

    /// Row-major, top-to-bottom RGB pixels.
    raster: Vec<u8>,

    /// Dot masks, one per glyph cell, row-major.
    masks: Vec<u8>,

    /// Cell colors, parallel to `masks`.
    colors: Vec<Rgb8>,
}

impl Frame {
    /// Allocates a zeroed frame for a raster of `dims`.
    pub fn new(dims: PixelDims) -> Self {
        let glyphs = dims.glyph_dims();
        Self {
            dims,
            glyphs,
            raster: vec![0; dims.area() * BYTES_PER_PIXEL],
            masks: vec![0; glyphs.cell_count()],
            colors: vec![Rgb8::BLACK; glyphs.cell_count()],
        }
    }

    #[inline]
    pub fn dims(&self) -> PixelDims {
        self.dims
    }

    #[inline]
    pub fn glyph_dims(&self) -> GlyphDims {
        self.glyphs
    }

    /// Raw raster bytes.
    #[inline]
    pub fn raster(&self) -> &[u8] {
        &self.raster
    }

    /// Mutable raster bytes; the slice length is the write bound.
    #[inline]
    pub fn raster_mut(&mut self) -> &mut [u8] {
        &mut self.raster
    }

    /// Replaces the raster with `src`, which must be exactly the raster size.
    pub fn write_raster(&mut self, src: &[u8]) -> Result<(), RasterSizeError> {
        if src.len() != self.raster.len() {
            return Err(RasterSizeError {
                expected: self.raster.len(),
                actual: src.len(),
            });
        }
        self.raster.copy_from_slice(src);
        Ok(())
    }

    /// Zeroes raster, masks and colors.
    pub fn reset(&mut self) {
        self.raster.fill(0);
        self.masks.fill(0);
        self.colors.fill(Rgb8::BLACK);
    }

    /// Color of pixel `(x, y)`. Requires `x < width` and `y < height`.
    #[inline]
    pub fn pixel_color(&self, x: u32, y: u32) -> Rgb8 {
        let i = self.pixel_index(x, y) * BYTES_PER_PIXEL;
        Rgb8::new(self.raster[i], self.raster[i + 1], self.raster[i + 2])
    }

    /// Sets pixel `(x, y)`. Requires `x < width` and `y < height`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb8) {
        let i = self.pixel_index(x, y) * BYTES_PER_PIXEL;
        self.raster[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
    }

    /// Glyph cell at column `gx`, row `gy`.
    #[inline]
    pub fn cell(&self, gx: u32, gy: u32) -> GlyphCell {
        let i = self.cell_index(gx, gy);
        GlyphCell {
            mask: self.masks[i],
            color: self.colors[i],
        }
    }

    /// Folds the raster into glyph cells.
    ///
    /// Every non-black pixel sets its dot bit in the owning cell and
    /// overwrites the cell color, so with several lit pixels in one cell the
    /// last one in scan order decides the color. Black pixels never light a
    /// dot. Masks are OR-ed in; call [`reset`](Self::reset) between frames.
    pub fn convert(&mut self) {
        let width = self.dims.width as usize;
        if width == 0 {
            return;
        }
        let glyph_cols = self.glyphs.cols as usize;

        let pixels: &[Rgb8] = bytemuck::cast_slice(self.raster.as_slice());
        for (i, &px) in pixels.iter().enumerate() {
            if px.is_black() {
                continue;
            }

            let (cell, bit) = locate(i, width, glyph_cols);
            self.masks[cell] |= bit;
            self.colors[cell] = px;
        }
    }

    /// Writes the glyph grid as terminal text into `out` (cleared first).
    ///
    /// Output layout:
    /// - clear screen, cursor home
    /// - one line per glyph row; blank cells are spaces
    /// - a color escape only when a lit cell's color differs from the last
    ///   color emitted on the same row
    /// - a color reset at the end of any row that set a color
    pub fn serialize(&self, out: &mut String) {
        out.clear();
        out.push_str(encode::CLEAR_SCREEN);
        out.push_str(encode::CURSOR_HOME);

        let cols = self.glyphs.cols as usize;
        if cols == 0 {
            return;
        }

        for (masks, colors) in self.masks.chunks_exact(cols).zip(self.colors.chunks_exact(cols)) {
            // Color state never carries over from the previous row.
            let mut current: Option<Rgb8> = None;

            for (&mask, &color) in masks.iter().zip(colors) {
                if mask == 0 {
                    out.push(' ');
                    continue;
                }
                if current != Some(color) {
                    encode::push_fg_color(out, color);
                    current = Some(color);
                }
                encode::push_codepoint(out, glyph::glyph_codepoint(mask));
            }

            if current.is_some() {
                out.push_str(encode::COLOR_RESET);
            }
            out.push('\n');
        }
    }

    /// Convenience wrapper around [`serialize`](Self::serialize).
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.serialize(&mut out);
        out
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.dims.width, "x {x} out of range");
        debug_assert!(y < self.dims.height, "y {y} out of range");
        x as usize + y as usize * self.dims.width as usize
    }

    #[inline]
    fn cell_index(&self, gx: u32, gy: u32) -> usize {
        debug_assert!(gx < self.glyphs.cols, "gx {gx} out of range");
        debug_assert!(gy < self.glyphs.rows, "gy {gy} out of range");
        gx as usize + gy as usize * self.glyphs.cols as usize
    }
}

/// Cell index and dot bit for the pixel at raster index `i`.
///
/// Index math stays in `usize`; rasters can exceed `u32::MAX` pixels.
#[inline]
fn locate(i: usize, width: usize, glyph_cols: usize) -> (usize, u8) {
    const COLS: usize = CELL_COLS as usize;
    const ROWS: usize = CELL_ROWS as usize;

    let (x, y) = (i % width, i / width);
    let cell = x / COLS + (y / ROWS) * glyph_cols;
    (cell, glyph::dot_bit((x % COLS) as u32, (y % ROWS) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\x1b[2J\x1b[H";

    fn body(text: &str) -> &str {
        text.strip_prefix(HEADER).expect("missing clear/home header")
    }

    fn color_escapes(text: &str) -> usize {
        text.matches("\x1b[38;2;").count()
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn buffers_match_dims() {
        for (w, h) in [(1, 1), (2, 4), (3, 5), (200, 100), (7, 9)] {
            let f = Frame::new(PixelDims::new(w, h));
            assert_eq!(f.raster().len(), (w * h) as usize * BYTES_PER_PIXEL);
            assert_eq!(f.glyph_dims().cols, w.div_ceil(2));
            assert_eq!(f.glyph_dims().rows, h.div_ceil(4));
        }
    }

    #[test]
    fn write_raster_rejects_wrong_size() {
        let mut f = Frame::new(PixelDims::new(2, 2));
        let err = f.write_raster(&[0; 11]).unwrap_err();
        assert_eq!(err, RasterSizeError { expected: 12, actual: 11 });
        assert!(f.write_raster(&[0; 13]).is_err());
        assert!(f.write_raster(&[1; 12]).is_ok());
        assert_eq!(f.pixel_color(1, 1), Rgb8::new(1, 1, 1));
    }

    // ── convert ───────────────────────────────────────────────────────────

    #[test]
    fn black_raster_leaves_cells_empty() {
        let mut f = Frame::new(PixelDims::new(10, 12));
        f.convert();
        for gy in 0..f.glyph_dims().rows {
            for gx in 0..f.glyph_dims().cols {
                assert_eq!(f.cell(gx, gy), GlyphCell::default());
            }
        }
    }

    #[test]
    fn top_left_pixel_sets_first_dot() {
        let mut f = Frame::new(PixelDims::new(4, 8));
        f.set_pixel(0, 0, Rgb8::new(10, 20, 30));
        f.convert();

        assert_eq!(
            f.cell(0, 0),
            GlyphCell { mask: 0x01, color: Rgb8::new(10, 20, 30) }
        );
        assert_eq!(f.cell(1, 0), GlyphCell::default());
        assert_eq!(f.cell(0, 1), GlyphCell::default());
        assert_eq!(f.cell(1, 1), GlyphCell::default());
    }

    #[test]
    fn bottom_right_sub_position_sets_high_dot() {
        let mut f = Frame::new(PixelDims::new(2, 4));
        f.set_pixel(1, 3, Rgb8::new(1, 1, 1));
        f.convert();
        assert_eq!(f.cell(0, 0).mask, 0x80);
    }

    #[test]
    fn every_sub_position_maps_through_table() {
        for gy in 0..CELL_ROWS {
            for gx in 0..CELL_COLS {
                let mut f = Frame::new(PixelDims::new(4, 8));
                f.set_pixel(2 + gx, 4 + gy, Rgb8::new(9, 9, 9));
                f.convert();
                assert_eq!(f.cell(1, 1).mask, glyph::dot_bit(gx, gy));
            }
        }
    }

    #[test]
    fn black_pixel_never_lights_even_next_to_lit() {
        let mut f = Frame::new(PixelDims::new(2, 4));
        f.set_pixel(0, 0, Rgb8::new(255, 0, 0));
        f.set_pixel(1, 0, Rgb8::BLACK);
        f.convert();
        assert_eq!(f.cell(0, 0).mask, 0x01);
    }

    #[test]
    fn last_lit_pixel_in_scan_order_sets_color() {
        let mut f = Frame::new(PixelDims::new(2, 4));
        f.set_pixel(1, 0, Rgb8::new(1, 0, 0));
        f.set_pixel(0, 2, Rgb8::new(0, 2, 0));
        f.set_pixel(0, 1, Rgb8::new(0, 0, 3));
        f.convert();

        let cell = f.cell(0, 0);
        assert_eq!(cell.mask, 0x08 | 0x04 | 0x02);
        assert_eq!(cell.color, Rgb8::new(0, 2, 0));
    }

    #[test]
    fn partial_trailing_cells() {
        let mut f = Frame::new(PixelDims::new(3, 5));
        assert_eq!(f.glyph_dims(), GlyphDims { cols: 2, rows: 2 });

        f.set_pixel(2, 4, Rgb8::new(5, 5, 5));
        f.convert();
        assert_eq!(f.cell(1, 1).mask, 0x01);
        assert_eq!(f.cell(0, 0).mask, 0);
    }

    #[test]
    fn reset_then_convert_is_repeatable() {
        let mut f = Frame::new(PixelDims::new(6, 8));
        let input: Vec<u8> = (0..f.raster().len()).map(|i| (i * 37 % 7) as u8).collect();

        f.reset();
        f.write_raster(&input).unwrap();
        f.convert();
        let first = (f.raster().to_vec(), f.masks.clone(), f.colors.clone());

        f.reset();
        f.write_raster(&input).unwrap();
        f.convert();
        let second = (f.raster().to_vec(), f.masks.clone(), f.colors.clone());

        assert_eq!(first, second);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut f = Frame::new(PixelDims::new(4, 4));
        f.set_pixel(3, 3, Rgb8::new(1, 2, 3));
        f.convert();
        f.reset();
        assert!(f.raster().iter().all(|&b| b == 0));
        assert!(f.masks.iter().all(|&m| m == 0));
        assert!(f.colors.iter().all(|c| c.is_black()));
    }

    #[test]
    fn locate_matches_cell_geometry() {
        // 6x8 raster -> 3 glyph columns.
        assert_eq!(locate(0, 6, 3), (0, 0x01));
        assert_eq!(locate(1, 6, 3), (0, 0x08));
        assert_eq!(locate(6 * 3 + 1, 6, 3), (0, 0x80));
        assert_eq!(locate(6 * 4 + 5, 6, 3), (5, 0x08));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn locate_past_u32_pixel_count() {
        let width = 70_000usize;
        let i = width * 70_000 + 3;
        assert!(i > u32::MAX as usize);
        // x = 3, y = 70_000 -> cell (1, 17_500) in a 35_000-column grid.
        assert_eq!(locate(i, width, 35_000), (1 + 17_500 * 35_000, 0x08));
    }

    // ── serialize ─────────────────────────────────────────────────────────

    #[test]
    fn empty_grid_is_rows_of_spaces() {
        let f = Frame::new(PixelDims::new(10, 12));
        let text = f.to_text();
        let body = body(&text);

        let lines: Vec<&str> = body.split_terminator('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| *l == "     "));
        assert_eq!(color_escapes(&text), 0);
        assert!(!text.contains("\x1b[0m"));
    }

    #[test]
    fn single_lit_cell_line() {
        let mut f = Frame::new(PixelDims::new(4, 4));
        f.set_pixel(2, 0, Rgb8::new(10, 20, 30));
        f.convert();

        assert_eq!(
            body(&f.to_text()),
            " \x1b[38;2;10;20;30m\u{2801}\x1b[0m\n"
        );
    }

    #[test]
    fn same_color_run_emits_one_escape() {
        let mut f = Frame::new(PixelDims::new(4, 4));
        let c = Rgb8::new(200, 100, 50);
        f.set_pixel(0, 0, c);
        f.set_pixel(2, 0, c);
        f.convert();

        let text = f.to_text();
        assert_eq!(color_escapes(&text), 1);
        assert_eq!(body(&text), "\x1b[38;2;200;100;50m\u{2801}\u{2801}\x1b[0m\n");
    }

    #[test]
    fn color_change_within_row_emits_new_escape() {
        let mut f = Frame::new(PixelDims::new(6, 4));
        f.set_pixel(0, 0, Rgb8::new(1, 0, 0));
        f.set_pixel(2, 0, Rgb8::new(0, 1, 0));
        f.set_pixel(4, 0, Rgb8::new(0, 1, 0));
        f.convert();
        assert_eq!(color_escapes(&f.to_text()), 2);
    }

    #[test]
    fn blank_cell_does_not_break_color_run() {
        let mut f = Frame::new(PixelDims::new(6, 4));
        let c = Rgb8::new(7, 7, 7);
        f.set_pixel(0, 0, c);
        f.set_pixel(4, 0, c);
        f.convert();
        assert_eq!(color_escapes(&f.to_text()), 1);
    }

    #[test]
    fn color_context_resets_each_row() {
        let mut f = Frame::new(PixelDims::new(2, 8));
        let c = Rgb8::new(3, 3, 3);
        f.set_pixel(0, 0, c);
        f.set_pixel(0, 4, c);
        f.convert();

        let text = f.to_text();
        assert_eq!(color_escapes(&text), 2);
        assert_eq!(text.matches("\x1b[0m").count(), 2);
    }

    #[test]
    fn reset_only_on_rows_with_color() {
        let mut f = Frame::new(PixelDims::new(2, 8));
        f.set_pixel(1, 7, Rgb8::new(3, 3, 3));
        f.convert();

        let text = f.to_text();
        let lines: Vec<&str> = body(&text).split_terminator('\n').collect();
        assert_eq!(lines[0], " ");
        assert_eq!(lines[1], "\x1b[38;2;3;3;3m\u{2880}\x1b[0m");
    }

    #[test]
    fn serialize_reuses_buffer() {
        let f = Frame::new(PixelDims::new(2, 4));
        let mut out = String::from("stale");
        f.serialize(&mut out);
        assert_eq!(out, format!("{HEADER} \n"));
    }
}
