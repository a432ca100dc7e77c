//! Downwind/crosswind sampling grid
//!
//! The grid is pure geometry: it never depends on the source parameters, so
//! the standard grid is built once per process and shared.
//!
//! Layout is row-major with one row per crosswind sample and one column per
//! downwind sample, i.e. cell `(row, col)` sits at `(x[col], y[row])` and has
//! flat index `row * nx + col`.

use crate::config::GridConfig;
use crate::error::Result;
use std::sync::OnceLock;

static STANDARD_GRID: OnceLock<PlumeGrid> = OnceLock::new();

/// Rectilinear sampling of downwind distance `x` and crosswind offset `y`
#[derive(Debug, Clone, PartialEq)]
pub struct PlumeGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// `n` evenly spaced samples from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}

impl PlumeGrid {
    /// Build a grid from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            xs: linspace(config.x_min, config.x_max, config.nx),
            ys: linspace(config.y_min, config.y_max, config.ny),
        })
    }

    /// The default 100×100 grid over [100, 15000] m × [-7500, 7500] m
    pub fn standard() -> &'static PlumeGrid {
        STANDARD_GRID.get_or_init(|| {
            let config = GridConfig::default();
            Self {
                xs: linspace(config.x_min, config.x_max, config.nx),
                ys: linspace(config.y_min, config.y_max, config.ny),
            }
        })
    }

    /// Number of downwind samples (columns)
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    /// Number of crosswind samples (rows)
    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Downwind sample positions (m)
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Crosswind sample positions (m)
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.nx() + col
    }

    /// `(x, y)` of the cell at a flat index
    #[inline]
    pub fn position(&self, index: usize) -> (f64, f64) {
        let nx = self.nx();
        (self.xs[index % nx], self.ys[index / nx])
    }

    /// Iterate `(x, y)` over all cells in flat-index order
    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_grid_shape() {
        let grid = PlumeGrid::standard();
        assert_eq!(grid.nx(), 100);
        assert_eq!(grid.ny(), 100);
        assert_eq!(grid.len(), 10_000);
        assert_eq!(grid.xs()[0], 100.0);
        assert_eq!(grid.xs()[99], 15_000.0);
        assert_eq!(grid.ys()[0], -7_500.0);
        assert_eq!(grid.ys()[99], 7_500.0);
    }

    #[test]
    fn test_standard_grid_is_shared() {
        assert!(std::ptr::eq(PlumeGrid::standard(), PlumeGrid::standard()));
    }

    #[test]
    fn test_uniform_spacing() {
        let grid = PlumeGrid::standard();
        let dx = grid.xs()[1] - grid.xs()[0];
        for pair in grid.xs().windows(2) {
            assert_relative_eq!(pair[1] - pair[0], dx, epsilon = 1e-9);
        }
        assert_relative_eq!(dx, 14_900.0 / 99.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_index_layout() {
        let grid = PlumeGrid::new(&GridConfig {
            nx: 4,
            ny: 3,
            ..Default::default()
        })
        .unwrap();
        let idx = grid.index(2, 1);
        assert_eq!(idx, 9);
        let (x, y) = grid.position(idx);
        assert_eq!(x, grid.xs()[1]);
        assert_eq!(y, grid.ys()[2]);
        assert_eq!(grid.positions().nth(idx), Some((x, y)));
        assert_eq!(grid.positions().count(), 12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GridConfig {
            nx: 0,
            ..Default::default()
        };
        assert!(PlumeGrid::new(&config).is_err());
    }
}
