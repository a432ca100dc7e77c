//! Single-frame and animation entry points
//!
//! [`PlumeModel`] wires the stages together for a given configuration. The
//! free functions [`compute_heat_points`] and [`compute_animation_frames`]
//! are the scalar call surface used by presentation layers and the FFI
//! crate; they run the default model.

use crate::animation::{AnimationConfig, AnimationSequencer, Frame};
use crate::config::PlumeConfig;
use crate::core_types::GeoCoord;
use crate::dispersion::DispersionField;
use crate::error::{PlumeWarning, Result};
use crate::grid::PlumeGrid;
use crate::heat_points::{weighted_centroid, HeatPoint, HeatPointExtractor};
use crate::projection::GeoProjector;
use crate::source::SourceSpec;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::info;

/// Everything a renderer needs for one frame: the source marker and the
/// weighted point cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumeOutput {
    /// Position of the source marker
    pub origin: GeoCoord,
    pub source: SourceSpec,
    pub points: Vec<HeatPoint>,
    /// Maximum concentration of the underlying field
    pub peak_concentration: f64,
    pub warnings: Vec<PlumeWarning>,
}

impl PlumeOutput {
    /// Weight-averaged position of the plume
    pub fn centroid(&self) -> Option<GeoCoord> {
        weighted_centroid(&self.points)
    }

    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PlumeWarning::DegenerateField { .. }))
    }
}

/// The composed dispersion → projection → extraction pipeline
#[derive(Debug, Clone)]
pub struct PlumeModel {
    config: PlumeConfig,
    grid: Cow<'static, PlumeGrid>,
}

impl Default for PlumeModel {
    fn default() -> Self {
        Self {
            config: PlumeConfig::default(),
            grid: Cow::Borrowed(PlumeGrid::standard()),
        }
    }
}

impl PlumeModel {
    /// Build a model; the shared standard grid is reused when the grid
    /// configuration is the default one.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: PlumeConfig) -> Result<Self> {
        config.validate()?;
        let grid = if config.grid == PlumeConfig::default().grid {
            Cow::Borrowed(PlumeGrid::standard())
        } else {
            Cow::Owned(PlumeGrid::new(&config.grid)?)
        };
        Ok(Self { config, grid })
    }

    pub fn config(&self) -> &PlumeConfig {
        &self.config
    }

    pub fn grid(&self) -> &PlumeGrid {
        &self.grid
    }

    /// Run the steady plume (spread factor 1.0) for a source.
    ///
    /// # Errors
    ///
    /// Propagates stage errors; a degenerate field is a warning, not an error.
    pub fn compute_heat_points(&self, source: &SourceSpec) -> Result<PlumeOutput> {
        let field = DispersionField::from_config(&self.config).evaluate(&self.grid, source, 1.0)?;
        let coords = GeoProjector::from_config(&self.config).project(
            &self.grid,
            source.origin(),
            source.wind_from(),
        );
        let extraction =
            HeatPointExtractor::new(self.config.relative_threshold)?.extract(&field, &coords)?;

        let warnings: Vec<PlumeWarning> = coords
            .warning()
            .into_iter()
            .chain(extraction.warning)
            .collect();

        info!(
            "Plume for {}: {} heat points, {} warning(s)",
            source,
            extraction.points.len(),
            warnings.len()
        );

        Ok(PlumeOutput {
            origin: source.origin(),
            source: *source,
            points: extraction.points,
            peak_concentration: field.peak(),
            warnings,
        })
    }

    /// Sequencer over this model's grid and configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `animation` is invalid.
    pub fn sequencer(
        &self,
        source: &SourceSpec,
        animation: AnimationConfig,
    ) -> Result<AnimationSequencer<'_>> {
        AnimationSequencer::new(*source, &self.grid, animation, &self.config)
    }

    /// Compute every animation frame in order.
    ///
    /// # Errors
    ///
    /// Returns an error if `animation` is invalid.
    pub fn compute_animation_frames(
        &self,
        source: &SourceSpec,
        animation: AnimationConfig,
    ) -> Result<Vec<Frame>> {
        self.sequencer(source, animation)?.frames().collect()
    }
}

/// Single-frame plume from bare scalars.
///
/// # Errors
///
/// Returns `PlumeError::InvalidInput` for out-of-domain inputs.
pub fn compute_heat_points(
    origin_lat: f64,
    origin_lon: f64,
    emission_rate: f64,
    wind_speed: f64,
    wind_from: f64,
    release_height: f64,
) -> Result<PlumeOutput> {
    let source = SourceSpec::from_scalars(
        origin_lat,
        origin_lon,
        emission_rate,
        wind_speed,
        wind_from,
        release_height,
    )?;
    PlumeModel::default().compute_heat_points(&source)
}

/// Spreading-plume frames from bare scalars, using the default factor range
/// and spread-only ramp.
///
/// # Errors
///
/// Returns `PlumeError::InvalidInput` for out-of-domain inputs or zero steps.
pub fn compute_animation_frames(
    origin_lat: f64,
    origin_lon: f64,
    emission_rate: f64,
    wind_speed: f64,
    wind_from: f64,
    release_height: f64,
    steps: usize,
) -> Result<Vec<Frame>> {
    let source = SourceSpec::from_scalars(
        origin_lat,
        origin_lon,
        emission_rate,
        wind_speed,
        wind_from,
        release_height,
    )?;
    PlumeModel::default().compute_animation_frames(&source, AnimationConfig::with_steps(steps))
}
