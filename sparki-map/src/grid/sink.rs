//! Evidence sink seam toward an external renderer.
//!
//! The mapper reports every multiplier it applies, then commits a frame at
//! the end of each sweep. A renderer typically accumulates evidence into its
//! own image and recolors on `commit_frame`.

use super::storage::ConfidenceGrid;

/// Receiver of per-cell evidence
pub trait GridSink {
    /// One multiplicative update for the cell at `row` (Y), `col` (X)
    fn submit_evidence(&mut self, row: usize, col: usize, multiplier: f64);

    /// A full sweep has been submitted
    fn commit_frame(&mut self);
}

/// Sink that discards everything (headless runs)
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl GridSink for NullSink {
    #[inline]
    fn submit_evidence(&mut self, _row: usize, _col: usize, _multiplier: f64) {}

    #[inline]
    fn commit_frame(&mut self) {}
}

/// A second grid can mirror the mapper's grid (e.g., a display buffer)
impl GridSink for ConfidenceGrid {
    #[inline]
    fn submit_evidence(&mut self, row: usize, col: usize, multiplier: f64) {
        self.apply_evidence(row, col, multiplier);
    }

    #[inline]
    fn commit_frame(&mut self) {
        ConfidenceGrid::commit_frame(self);
    }
}

impl<S: GridSink + ?Sized> GridSink for &mut S {
    #[inline]
    fn submit_evidence(&mut self, row: usize, col: usize, multiplier: f64) {
        (**self).submit_evidence(row, col, multiplier);
    }

    #[inline]
    fn commit_frame(&mut self) {
        (**self).commit_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_as_sink() {
        let mut mirror = ConfidenceGrid::new(2, 2, 1.0);
        {
            let sink: &mut dyn GridSink = &mut mirror;
            sink.submit_evidence(1, 0, 1.2);
            sink.commit_frame();
        }
        assert_relative_eq!(mirror.get(0, 1).unwrap(), 1.2);
        assert_eq!(mirror.frames(), 1);
    }
}
