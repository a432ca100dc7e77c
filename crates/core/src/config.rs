//! Model configuration
//!
//! Every tunable constant of the plume pipeline lives here. The defaults
//! reproduce the reference model: a 100×100 grid covering 100 m to 15 km
//! downwind and ±7.5 km crosswind, linear spread coefficients of 0.08/0.06,
//! a 100 m near-source exclusion zone and a 0.1% relative intensity cutoff.

use crate::core_types::geo::METERS_PER_DEGREE;
use crate::dispersion::{SpreadCoefficients, MIN_EXCLUSION_DISTANCE};
use crate::error::{PlumeError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on `nx × ny`, and so on the number of emitted heat points
pub const MAX_GRID_CELLS: usize = 10_000;

/// Sampling extents and resolution of the downwind/crosswind grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First downwind sample (m)
    pub x_min: f64,
    /// Last downwind sample (m)
    pub x_max: f64,
    /// Number of downwind samples
    pub nx: usize,

    /// First crosswind sample (m)
    pub y_min: f64,
    /// Last crosswind sample (m)
    pub y_max: f64,
    /// Number of crosswind samples
    pub ny: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: 100.0,
            x_max: 15_000.0,
            nx: 100,
            y_min: -7_500.0,
            y_max: 7_500.0,
            ny: 100,
        }
    }
}

impl GridConfig {
    /// Check extents and sample counts.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` for non-finite or inverted extents,
    /// fewer than two samples per axis, more than [`MAX_GRID_CELLS`] cells,
    /// or a negative downwind start.
    pub fn validate(&self) -> Result<()> {
        if !(self.x_min.is_finite() && self.x_max.is_finite()) {
            return Err(PlumeError::invalid_config("grid.x", "extents must be finite"));
        }
        if !(self.y_min.is_finite() && self.y_max.is_finite()) {
            return Err(PlumeError::invalid_config("grid.y", "extents must be finite"));
        }
        if self.x_min < 0.0 {
            return Err(PlumeError::invalid_config(
                "grid.x_min",
                format!("downwind samples start at or after the source, got {}", self.x_min),
            ));
        }
        if self.x_max <= self.x_min {
            return Err(PlumeError::invalid_config("grid.x_max", "must exceed x_min"));
        }
        if self.y_max <= self.y_min {
            return Err(PlumeError::invalid_config("grid.y_max", "must exceed y_min"));
        }
        if self.nx < 2 {
            return Err(PlumeError::invalid_config("grid.nx", "must be at least 2"));
        }
        if self.ny < 2 {
            return Err(PlumeError::invalid_config("grid.ny", "must be at least 2"));
        }
        match self.nx.checked_mul(self.ny) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(PlumeError::invalid_config(
                    "grid",
                    format!(
                        "{}x{} samples exceed the {} cell limit",
                        self.nx, self.ny, MAX_GRID_CELLS
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for the whole single-frame pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeConfig {
    pub grid: GridConfig,

    /// Linear growth rates of σy and σz with downwind distance
    pub spread: SpreadCoefficients,

    /// Cells closer than this downwind distance (m) are forced to zero.
    /// Keeps σ away from the x = 0 singularity. At least 100 m.
    pub exclusion_distance: f64,

    /// Cells at or below `relative_threshold × peak` are dropped
    pub relative_threshold: f64,

    /// Meters per degree of latitude for the equirectangular projection
    pub meters_per_degree: f64,

    /// Absolute origin latitude (degrees) above which projection precision
    /// is reported as degraded
    pub polar_warning_latitude: f64,
}

impl Default for PlumeConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            spread: SpreadCoefficients::default(),
            exclusion_distance: MIN_EXCLUSION_DISTANCE,
            relative_threshold: 0.001,
            meters_per_degree: METERS_PER_DEGREE,
            polar_warning_latitude: 85.0,
        }
    }
}

impl PlumeConfig {
    /// Validate every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `PlumeError::InvalidConfig` encountered.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.spread.validate()?;

        if !self.exclusion_distance.is_finite() || self.exclusion_distance < MIN_EXCLUSION_DISTANCE {
            return Err(PlumeError::invalid_config(
                "exclusion_distance",
                format!(
                    "must be finite and at least {} m, got {}",
                    MIN_EXCLUSION_DISTANCE, self.exclusion_distance
                ),
            ));
        }
        if !(0.0..1.0).contains(&self.relative_threshold) {
            return Err(PlumeError::invalid_config(
                "relative_threshold",
                format!("must lie in [0, 1), got {}", self.relative_threshold),
            ));
        }
        if !self.meters_per_degree.is_finite() || self.meters_per_degree <= 0.0 {
            return Err(PlumeError::invalid_config(
                "meters_per_degree",
                "must be finite and positive",
            ));
        }
        if !(0.0..=90.0).contains(&self.polar_warning_latitude) {
            return Err(PlumeError::invalid_config(
                "polar_warning_latitude",
                "must lie in [0, 90]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlumeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_grid() {
        let config = PlumeConfig {
            grid: GridConfig {
                x_min: 5_000.0,
                x_max: 100.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.parameter(), "grid.x_max");
    }

    #[test]
    fn test_rejects_single_sample_axis() {
        let grid = GridConfig {
            ny: 1,
            ..Default::default()
        };
        assert_eq!(grid.validate().unwrap_err().parameter(), "grid.ny");
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        for threshold in [-0.1, 1.0, f64::NAN] {
            let config = PlumeConfig {
                relative_threshold: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "threshold {threshold} accepted");
        }
    }

    #[test]
    fn test_rejects_exclusion_below_minimum() {
        for distance in [0.0, 99.9, -1.0, f64::NAN, f64::INFINITY] {
            let config = PlumeConfig {
                exclusion_distance: distance,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.parameter(), "exclusion_distance", "distance {distance}");
        }
        let wider = PlumeConfig {
            exclusion_distance: 250.0,
            ..Default::default()
        };
        assert!(wider.validate().is_ok());
    }

    #[test]
    fn test_rejects_grid_above_cell_limit() {
        for (nx, ny) in [(200, 200), (10_001, 2), (usize::MAX, 2)] {
            let grid = GridConfig {
                nx,
                ny,
                ..Default::default()
            };
            assert_eq!(grid.validate().unwrap_err().parameter(), "grid", "{nx}x{ny}");
        }
        let at_limit = GridConfig {
            nx: 50,
            ny: 200,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_rejects_upwind_grid() {
        let grid = GridConfig {
            x_min: -50.0,
            ..Default::default()
        };
        assert_eq!(grid.validate().unwrap_err().parameter(), "grid.x_min");
    }
}
