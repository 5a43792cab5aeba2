use crate::coords::{round_down_to_multiple, PixelDims};
use crate::glyph::{CELL_COLS, CELL_ROWS};

/// Smallest raster the runtime will render.
pub const MIN_DIMS: PixelDims = PixelDims::new(200, 100);

/// Terminal size in character cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TermSize {
    pub rows: u16,
    pub cols: u16,
}

/// Source of the current terminal size.
///
/// Returns `None` when the size cannot be determined (e.g. output is not a
/// terminal).
pub trait TerminalProbe {
    fn size(&self) -> Option<TermSize>;
}

/// Probes the terminal attached to standard output.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdoutTerminal;

impl TerminalProbe for StdoutTerminal {
    fn size(&self) -> Option<TermSize> {
        let (terminal_size::Width(cols), terminal_size::Height(rows)) =
            terminal_size::terminal_size_of(std::io::stdout())?;
        Some(TermSize { rows, cols })
    }
}

impl<F> TerminalProbe for F
where
    F: Fn() -> Option<TermSize>,
{
    fn size(&self) -> Option<TermSize> {
        self()
    }
}

/// Raster size for a terminal of `size`, never smaller than `min`.
///
/// One row and one column are left free so the final newline does not
/// scroll the screen. The result is always whole glyph cells; an unaligned
/// `min` is rounded up.
pub fn desired_dims(size: TermSize, min: PixelDims) -> PixelDims {
    let cols = u32::from(size.cols).saturating_sub(1) * CELL_COLS;
    let rows = u32::from(size.rows).saturating_sub(1) * CELL_ROWS;

    PixelDims::new(
        round_down_to_multiple(cols, CELL_COLS),
        round_down_to_multiple(rows, CELL_ROWS),
    )
    .max(min.round_up_to_cells())
}

/// Queries `probe` and returns the raster size to use next.
///
/// A failed query keeps `current`.
pub fn negotiate<P>(probe: &P, current: PixelDims, min: PixelDims) -> PixelDims
where
    P: TerminalProbe + ?Sized,
{
    match probe.size() {
        Some(size) => desired_dims(size, min),
        None => {
            log::trace!("terminal size unavailable; keeping {}x{}", current.width, current.height);
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(rows: u16, cols: u16) -> TermSize {
        TermSize { rows, cols }
    }

    #[test]
    fn small_terminal_clamps_to_minimum() {
        assert_eq!(desired_dims(term(25, 101), MIN_DIMS), PixelDims::new(200, 100));
    }

    #[test]
    fn large_terminal_uses_cells() {
        assert_eq!(desired_dims(term(51, 201), MIN_DIMS), PixelDims::new(400, 200));
    }

    #[test]
    fn one_dimension_clamped_independently() {
        assert_eq!(desired_dims(term(60, 80), MIN_DIMS), PixelDims::new(200, 236));
    }

    #[test]
    fn zero_sized_terminal_does_not_underflow() {
        assert_eq!(desired_dims(term(0, 0), MIN_DIMS), MIN_DIMS);
    }

    #[test]
    fn result_is_cell_aligned() {
        let min = PixelDims::new(2, 4);
        for rows in 1..40u16 {
            for cols in 1..40u16 {
                let d = desired_dims(term(rows, cols), min);
                assert_eq!(d.width % CELL_COLS, 0);
                assert_eq!(d.height % CELL_ROWS, 0);
            }
        }
    }

    #[test]
    fn unaligned_minimum_is_rounded_up_to_cells() {
        let d = desired_dims(term(5, 5), PixelDims::new(201, 101));
        assert_eq!(d, PixelDims::new(202, 104));
        assert_eq!(d.width % CELL_COLS, 0);
        assert_eq!(d.height % CELL_ROWS, 0);

        // A larger terminal still wins over the padded minimum.
        assert_eq!(desired_dims(term(51, 201), PixelDims::new(201, 101)), PixelDims::new(400, 200));
    }

    #[test]
    fn failed_query_keeps_current() {
        let current = PixelDims::new(320, 120);
        let probe = || None::<TermSize>;
        assert_eq!(negotiate(&probe, current, MIN_DIMS), current);
    }

    #[test]
    fn successful_query_replaces_current() {
        let probe = || Some(term(41, 161));
        assert_eq!(
            negotiate(&probe, MIN_DIMS, MIN_DIMS),
            PixelDims::new(320, 160)
        );
    }
}
