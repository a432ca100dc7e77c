//! Reduction of a projected concentration field to weighted heat points

use crate::core_types::{wrap_longitude, GeoCoord};
use crate::dispersion::ConcentrationField;
use crate::error::{PlumeError, PlumeWarning, Result};
use crate::projection::ProjectedGrid;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One renderable sample of the plume: position plus weight in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    /// Concentration normalized by the field maximum
    pub weight: f64,
}

impl HeatPoint {
    pub fn coord(&self) -> GeoCoord {
        GeoCoord::new(self.lat, self.lon)
    }
}

/// Points retained from one field, plus the degenerate-field warning if the
/// field had no usable maximum
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub points: Vec<HeatPoint>,
    pub warning: Option<PlumeWarning>,
}

/// Thresholds and normalizes a field into [`HeatPoint`]s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPointExtractor {
    relative_threshold: f64,
}

impl Default for HeatPointExtractor {
    fn default() -> Self {
        Self {
            relative_threshold: 0.001,
        }
    }
}

impl HeatPointExtractor {
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidInput` unless the threshold lies in [0, 1).
    pub fn new(relative_threshold: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&relative_threshold) {
            return Err(PlumeError::invalid_input(
                "relative_threshold",
                relative_threshold,
                "must lie in [0, 1)",
            ));
        }
        Ok(Self { relative_threshold })
    }

    /// Keep every cell with `C > threshold × peak`, weighted by `C / peak`.
    ///
    /// A zero or non-finite peak yields no points and a
    /// [`PlumeWarning::DegenerateField`]; nothing is ever divided by it.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` if `coords` is not aligned with `field`.
    pub fn extract(&self, field: &ConcentrationField, coords: &ProjectedGrid) -> Result<Extraction> {
        if field.len() != coords.len() {
            return Err(PlumeError::invalid_config(
                "coords",
                format!(
                    "projected grid has {} cells but field has {}",
                    coords.len(),
                    field.len()
                ),
            ));
        }

        let peak = field.peak();
        if !peak.is_finite() || peak <= 0.0 {
            let warning = PlumeWarning::DegenerateField { peak };
            warn!("{warning}");
            return Ok(Extraction {
                points: Vec::new(),
                warning: Some(warning),
            });
        }

        let cutoff = self.relative_threshold * peak;
        let points: Vec<HeatPoint> = field
            .values()
            .iter()
            .zip(coords.coords())
            .filter(|(c, _)| **c > cutoff)
            .map(|(c, coord)| HeatPoint {
                lat: coord.lat,
                lon: coord.lon,
                weight: (c / peak).min(1.0),
            })
            .collect();

        debug!(
            "Extracted {}/{} heat points (threshold {:.4} of peak {:e})",
            points.len(),
            field.len(),
            self.relative_threshold,
            peak
        );

        Ok(Extraction {
            points,
            warning: None,
        })
    }
}

/// Weight-averaged position of a point set, `None` if it carries no weight
pub fn weighted_centroid(points: &[HeatPoint]) -> Option<GeoCoord> {
    let total: f64 = points.iter().map(|p| p.weight).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let lat = points.iter().map(|p| p.lat * p.weight).sum::<f64>() / total;
    // Average longitude differences from one member so a set straddling
    // the antimeridian does not collapse toward 0°
    let reference = points[0].lon;
    let mean_delta = points
        .iter()
        .map(|p| wrap_longitude(p.lon - reference) * p.weight)
        .sum::<f64>()
        / total;
    Some(GeoCoord::new(lat, wrap_longitude(reference + mean_delta)))
}

/// Largest weight in a point set; 1.0 for any non-empty extraction
pub fn max_weight(points: &[HeatPoint]) -> Option<f64> {
    points.iter().map(|p| p.weight).max_by(f64::total_cmp)
}
