//! Confidence grid storage.
//!
//! Row-major `f64` cells, one per centimeter. Confidence is an unbounded
//! multiplicative accumulator: values below the initial confidence mean
//! "probably free", values above mean "probably occupied". There is no
//! renormalization; that is left to whoever renders the grid.

use super::config::GridConfig;

/// Confidence grid
///
/// Rows are Y, columns are X: cell `(x, y)` lives at `row = y, col = x`.
/// Every cell stays strictly positive; products that would leave the
/// finite positive range saturate at its bounds.
#[derive(Clone, Debug)]
pub struct ConfidenceGrid {
    cells: Vec<f64>,
    width: usize,
    height: usize,
    initial_confidence: f64,
    /// Number of completed sweep frames
    frames: u64,
}

/// Summary of a grid's cells relative to the initial confidence
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridStats {
    /// Cells below the initial confidence
    pub free: usize,
    /// Cells above the initial confidence
    pub occupied: usize,
    /// Cells never moved off the initial confidence
    pub untouched: usize,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl ConfidenceGrid {
    /// Create a grid with every cell at `initial_confidence`
    pub fn new(width: usize, height: usize, initial_confidence: f64) -> Self {
        Self {
            cells: vec![initial_confidence; width * height],
            width,
            height,
            initial_confidence,
            frames: 0,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.width, config.height, config.initial_confidence)
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn initial_confidence(&self) -> f64 {
        self.initial_confidence
    }

    /// Number of sweep frames committed so far
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Raw row-major cell values (for renderers)
    #[inline]
    pub fn cells_raw(&self) -> &[f64] {
        &self.cells
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    /// Confidence of the cell at `(x, y)`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.index(y, x).map(|i| self.cells[i])
    }

    /// Multiply a cell's confidence by `multiplier`
    ///
    /// Returns false (and leaves the cell alone) for out-of-bounds cells or
    /// multipliers that are not finite and positive.
    pub fn apply_evidence(&mut self, row: usize, col: usize, multiplier: f64) -> bool {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            log::warn!(
                "ConfidenceGrid: Rejected multiplier {} for ({}, {})",
                multiplier,
                row,
                col
            );
            return false;
        }
        let Some(i) = self.index(row, col) else {
            return false;
        };
        self.cells[i] = (self.cells[i] * multiplier).clamp(f64::MIN_POSITIVE, f64::MAX);
        true
    }

    /// Mark the end of one sweep
    pub fn commit_frame(&mut self) {
        self.frames += 1;
    }

    /// Reinitialize every cell to the initial confidence
    pub fn reset(&mut self) {
        self.cells.fill(self.initial_confidence);
        self.frames = 0;
        log::debug!(
            "ConfidenceGrid: Reset {}x{} to {}",
            self.width,
            self.height,
            self.initial_confidence
        );
    }

    /// Count free/occupied/untouched cells
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            min_confidence: f64::MAX,
            max_confidence: f64::MIN_POSITIVE,
            ..GridStats::default()
        };
        for &c in &self.cells {
            if c < self.initial_confidence {
                stats.free += 1;
            } else if c > self.initial_confidence {
                stats.occupied += 1;
            } else {
                stats.untouched += 1;
            }
            stats.min_confidence = stats.min_confidence.min(c);
            stats.max_confidence = stats.max_confidence.max(c);
        }
        stats
    }
}
