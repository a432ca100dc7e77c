//! Steady-state Gaussian plume concentration field
//!
//! Evaluates the Gaussian plume equation (no ground reflection term) on a fixed
//! downwind/crosswind grid:
//!
//! ```text
//! C(x, y) = Q / (2π · U · σy · σz) · exp(−y² / (2σy²)) · exp(−H² / (2σz²))
//! ```
//!
//! where Q is the emission rate, U the wind speed, H the release height and
//! the spread parameters grow linearly with downwind distance:
//!
//! ```text
//! σy = a · x · f        σz = b · x · f
//! ```
//!
//! with `a = 0.08`, `b = 0.06` by default and `f` the spread-scale factor
//! (1.0 for a single frame, swept by the animation). The linear growth stands
//! in for stability-class dispersion curves.
//!
//! Cells closer than the exclusion distance (never less than
//! [`MIN_EXCLUSION_DISTANCE`]) are exactly zero: σ → 0 as x → 0 and the
//! equation is singular at the source.

use crate::config::PlumeConfig;
use crate::error::{PlumeError, Result};
use crate::grid::PlumeGrid;
use crate::source::SourceSpec;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Downwind distance (m) inside which every cell is zero
pub const MIN_EXCLUSION_DISTANCE: f64 = 100.0;

/// Linear growth rates of the plume's standard deviations with distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadCoefficients {
    /// σy per meter downwind
    pub horizontal: f64,
    /// σz per meter downwind
    pub vertical: f64,
}

impl Default for SpreadCoefficients {
    fn default() -> Self {
        Self {
            horizontal: 0.08,
            vertical: 0.06,
        }
    }
}

impl SpreadCoefficients {
    /// (σy, σz) at downwind distance `x` for spread factor `factor`
    #[inline]
    #[must_use]
    pub fn sigmas(&self, x: f64, factor: f64) -> (f64, f64) {
        (self.horizontal * x * factor, self.vertical * x * factor)
    }

    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` unless both coefficients are finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !self.horizontal.is_finite() || self.horizontal <= 0.0 {
            return Err(PlumeError::invalid_config(
                "spread.horizontal",
                "must be finite and positive",
            ));
        }
        if !self.vertical.is_finite() || self.vertical <= 0.0 {
            return Err(PlumeError::invalid_config(
                "spread.vertical",
                "must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Concentration at a single downwind/crosswind point.
///
/// No exclusion zone is applied here; callers must keep `x > 0`.
#[inline]
#[must_use]
pub fn concentration_at(
    x: f64,
    y: f64,
    emission_rate: f64,
    wind_speed: f64,
    release_height: f64,
    spread_factor: f64,
    spread: &SpreadCoefficients,
) -> f64 {
    let (sigma_y, sigma_z) = spread.sigmas(x, spread_factor);

    let centerline = emission_rate / (2.0 * PI * wind_speed * sigma_y * sigma_z);
    let crosswind = (-(y * y) / (2.0 * sigma_y * sigma_y)).exp();
    let vertical = (-(release_height * release_height) / (2.0 * sigma_z * sigma_z)).exp();

    centerline * crosswind * vertical
}

/// Concentration values aligned with a [`PlumeGrid`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationField {
    values: Vec<f64>,
    nx: usize,
    ny: usize,
}

impl ConcentrationField {
    /// Wrap precomputed values; `values.len()` must equal `nx * ny`.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` on a shape mismatch.
    pub fn from_values(values: Vec<f64>, nx: usize, ny: usize) -> Result<Self> {
        if values.len() != nx * ny {
            return Err(PlumeError::invalid_config(
                "field",
                format!("expected {}x{} = {} values, got {}", nx, ny, nx * ny, values.len()),
            ));
        }
        Ok(Self {
            values,
            nx,
            ny,
        })
    }

    /// Flat, row-major values (rows are crosswind samples)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.nx + col]
    }

    /// Maximum concentration; NaN propagates so callers can detect it
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(0.0_f64, |acc, c| {
            if c.is_nan() || acc.is_nan() {
                f64::NAN
            } else {
                acc.max(c)
            }
        })
    }

    /// Flat index of the maximum cell, `None` for an all-zero field
    pub fn peak_index(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Evaluates the plume equation over a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionField {
    spread: SpreadCoefficients,
    exclusion_distance: f64,
}

impl Default for DispersionField {
    fn default() -> Self {
        Self::from_config(&PlumeConfig::default())
    }
}

impl DispersionField {
    /// Exclusion distances below [`MIN_EXCLUSION_DISTANCE`] (or NaN) are raised to it.
    #[must_use]
    pub fn new(spread: SpreadCoefficients, exclusion_distance: f64) -> Self {
        Self {
            spread,
            exclusion_distance: exclusion_distance.max(MIN_EXCLUSION_DISTANCE),
        }
    }

    #[must_use]
    pub fn from_config(config: &PlumeConfig) -> Self {
        Self::new(config.spread, config.exclusion_distance)
    }

    /// Evaluate the field for a source.
    ///
    /// # Arguments
    ///
    /// * `grid` - Sampling grid
    /// * `source` - Validated release parameters
    /// * `spread_factor` - Scale on σy and σz, 1.0 for the steady plume
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidInput` if `spread_factor` is not finite and positive.
    pub fn evaluate(
        &self,
        grid: &PlumeGrid,
        source: &SourceSpec,
        spread_factor: f64,
    ) -> Result<ConcentrationField> {
        self.evaluate_with_emission(grid, source, source.emission_rate(), spread_factor)
    }

    /// Evaluate with an overridden emission rate.
    ///
    /// Used by the emission-ramp animation mode; the geometry and wind come
    /// from `source`.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidInput` if `spread_factor` or `emission_rate`
    /// is not finite and positive.
    pub fn evaluate_with_emission(
        &self,
        grid: &PlumeGrid,
        source: &SourceSpec,
        emission_rate: f64,
        spread_factor: f64,
    ) -> Result<ConcentrationField> {
        if !spread_factor.is_finite() || spread_factor <= 0.0 {
            return Err(PlumeError::invalid_input(
                "spread_factor",
                spread_factor,
                "must be finite and greater than zero",
            ));
        }
        if !emission_rate.is_finite() || emission_rate <= 0.0 {
            return Err(PlumeError::invalid_input(
                "emission_rate",
                emission_rate,
                "must be finite and greater than zero",
            ));
        }

        let nx = grid.nx();
        let wind_speed = *source.wind_speed();
        let release_height = *source.release_height();
        let xs = grid.xs();
        let mut values = vec![0.0; grid.len()];

        values
            .par_chunks_mut(nx)
            .zip(grid.ys().par_iter())
            .for_each(|(row, &y)| {
                for (cell, &x) in row.iter_mut().zip(xs) {
                    // Near-source exclusion: never evaluate the singular region
                    if x < self.exclusion_distance {
                        *cell = 0.0;
                        continue;
                    }
                    *cell = concentration_at(
                        x,
                        y,
                        emission_rate,
                        wind_speed,
                        release_height,
                        spread_factor,
                        &self.spread,
                    );
                }
            });

        let field = ConcentrationField {
            values,
            nx,
            ny: grid.ny(),
        };

        debug!(
            "Evaluated {}x{} plume field: factor={:.3}, Q={:e}, peak={:e}",
            nx,
            grid.ny(),
            spread_factor,
            emission_rate,
            field.peak()
        );

        Ok(field)
    }
}
