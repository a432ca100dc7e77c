//! Spreading-plume animation
//!
//! Sweeps the spread-scale factor from a small value up to the steady-state
//! plume, rerunning dispersion, projection and extraction for each frame.
//! Frames share nothing: any frame can be recomputed from
//! `(source, grid, factor)` alone, frames can be computed in parallel, and
//! dropping a [`FrameSequence`] part way through releases everything.

use crate::config::PlumeConfig;
use crate::dispersion::DispersionField;
use crate::error::{PlumeError, PlumeWarning, Result};
use crate::grid::PlumeGrid;
use crate::heat_points::{HeatPoint, HeatPointExtractor};
use crate::pipeline::PlumeOutput;
use crate::projection::GeoProjector;
use crate::source::SourceSpec;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What grows from frame to frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RampMode {
    /// Only σy/σz scale with the factor (canonical)
    #[default]
    SpreadOnly,
    /// The emission rate is scaled by the same factor as σy/σz, so early
    /// frames are both narrower and weaker
    SpreadAndEmission,
}

/// Frame count and factor range of an animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub steps: usize,
    pub start_factor: f64,
    pub end_factor: f64,
    pub ramp: RampMode,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: 12,
            start_factor: 0.2,
            end_factor: 1.0,
            ramp: RampMode::SpreadOnly,
        }
    }
}

impl AnimationConfig {
    /// Default range with a custom frame count
    #[must_use]
    pub fn with_steps(steps: usize) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    /// # Errors
    ///
    /// Returns `PlumeError::InvalidInput` for zero steps, non-positive or
    /// non-finite factors, or a range that does not increase.
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(PlumeError::invalid_input("steps", 0.0, "must be at least 1"));
        }
        if !self.start_factor.is_finite() || self.start_factor <= 0.0 {
            return Err(PlumeError::invalid_input(
                "start_factor",
                self.start_factor,
                "must be finite and greater than zero",
            ));
        }
        if !self.end_factor.is_finite() || self.end_factor <= 0.0 {
            return Err(PlumeError::invalid_input(
                "end_factor",
                self.end_factor,
                "must be finite and greater than zero",
            ));
        }
        if self.steps > 1 && self.end_factor <= self.start_factor {
            return Err(PlumeError::invalid_input(
                "end_factor",
                self.end_factor,
                "must exceed start_factor when animating more than one frame",
            ));
        }
        Ok(())
    }

    /// Spread factor of frame `index`, uniform from start to end inclusive
    #[must_use]
    pub fn factor_at(&self, index: usize) -> f64 {
        if self.steps <= 1 {
            return self.end_factor;
        }
        if index + 1 >= self.steps {
            return self.end_factor;
        }
        let t = index as f64 / (self.steps - 1) as f64;
        self.start_factor + (self.end_factor - self.start_factor) * t
    }

    /// Every frame's spread factor, strictly increasing
    #[must_use]
    pub fn factors(&self) -> Vec<f64> {
        (0..self.steps).map(|i| self.factor_at(i)).collect()
    }
}

/// One animation frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    pub spread_factor: f64,
    /// Multiplier applied to the emission rate (1.0 unless ramping emission)
    pub emission_scale: f64,
    /// Maximum concentration of this frame's field
    pub peak_concentration: f64,
    pub points: Vec<HeatPoint>,
    pub warnings: Vec<PlumeWarning>,
}

impl Frame {
    /// This frame as a renderable plume output for `source`
    pub fn into_output(self, source: SourceSpec) -> PlumeOutput {
        PlumeOutput {
            origin: source.origin(),
            source,
            points: self.points,
            peak_concentration: self.peak_concentration,
            warnings: self.warnings,
        }
    }
}

/// Drives the single-frame pipeline across a sweep of spread factors
#[derive(Debug, Clone)]
pub struct AnimationSequencer<'a> {
    source: SourceSpec,
    grid: &'a PlumeGrid,
    config: AnimationConfig,
    dispersion: DispersionField,
    projector: GeoProjector,
    extractor: HeatPointExtractor,
}

impl<'a> AnimationSequencer<'a> {
    /// Create a sequencer.
    ///
    /// # Errors
    ///
    /// Returns an error if the animation or model configuration is invalid.
    pub fn new(
        source: SourceSpec,
        grid: &'a PlumeGrid,
        config: AnimationConfig,
        model: &PlumeConfig,
    ) -> Result<Self> {
        config.validate()?;
        model.validate()?;

        info!(
            "Animation sequence: {} frames, factor {:.2}..{:.2}, {:?}",
            config.steps, config.start_factor, config.end_factor, config.ramp
        );

        Ok(Self {
            source,
            grid,
            config,
            dispersion: DispersionField::from_config(model),
            projector: GeoProjector::from_config(model),
            extractor: HeatPointExtractor::new(model.relative_threshold)?,
        })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn source(&self) -> &SourceSpec {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.config.steps
    }

    pub fn is_empty(&self) -> bool {
        self.config.steps == 0
    }

    /// Compute frame `index` from scratch.
    ///
    /// # Errors
    ///
    /// Returns `PlumeError::InvalidInput` if `index` is out of range.
    pub fn frame_at(&self, index: usize) -> Result<Frame> {
        if index >= self.config.steps {
            return Err(PlumeError::invalid_input(
                "frame_index",
                index as f64,
                "beyond the last frame",
            ));
        }

        let spread_factor = self.config.factor_at(index);
        let emission_scale = match self.config.ramp {
            RampMode::SpreadOnly => 1.0,
            RampMode::SpreadAndEmission => spread_factor,
        };

        let field = self.dispersion.evaluate_with_emission(
            self.grid,
            &self.source,
            self.source.emission_rate() * emission_scale,
            spread_factor,
        )?;
        let coords = self
            .projector
            .project(self.grid, self.source.origin(), self.source.wind_from());
        let extraction = self.extractor.extract(&field, &coords)?;

        let warnings = coords
            .warning()
            .into_iter()
            .chain(extraction.warning)
            .collect();

        Ok(Frame {
            index,
            spread_factor,
            emission_scale,
            peak_concentration: field.peak(),
            points: extraction.points,
            warnings,
        })
    }

    /// Lazily computed frames in order
    pub fn frames(&self) -> FrameSequence<'_, 'a> {
        FrameSequence {
            sequencer: self,
            next: 0,
        }
    }

    /// Compute every frame up front on the rayon pool, preserving order
    ///
    /// # Errors
    ///
    /// Returns the first error any frame produced.
    pub fn precompute_parallel(&self) -> Result<Vec<Frame>> {
        (0..self.config.steps)
            .into_par_iter()
            .map(|i| self.frame_at(i))
            .collect()
    }
}

/// Iterator over the frames of an [`AnimationSequencer`]
#[derive(Debug)]
pub struct FrameSequence<'s, 'a> {
    sequencer: &'s AnimationSequencer<'a>,
    next: usize,
}

impl Iterator for FrameSequence<'_, '_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.sequencer.len() {
            return None;
        }
        let frame = self.sequencer.frame_at(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequencer.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSequence<'_, '_> {}
