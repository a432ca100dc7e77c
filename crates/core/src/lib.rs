//! Gaussian Plume Dispersion Core Library
//!
//! Computes a steady-state Gaussian plume concentration field for a single
//! point source, anchors it at a real-world origin, and reduces it to a sparse
//! set of weighted heat points for map rendering.
//!
//! ## Pipeline
//!
//! 1. [`DispersionField`] evaluates the plume equation on a fixed
//!    downwind/crosswind [`PlumeGrid`].
//! 2. [`GeoProjector`] rotates the grid onto the wind-to bearing and converts
//!    planar offsets to latitude/longitude.
//! 3. [`HeatPointExtractor`] thresholds and normalizes the field into
//!    [`HeatPoint`]s.
//! 4. [`AnimationSequencer`] optionally sweeps the spread factor to produce
//!    a sequence of frames.
//!
//! Every stage is a pure function of its inputs.
//!
//! ```
//! use plume_core::compute_heat_points;
//!
//! let output = compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0).unwrap();
//! assert!(!output.points.is_empty());
//! assert!(output.points.iter().all(|p| p.weight > 0.0 && p.weight <= 1.0));
//! ```

// Core types and utilities
pub mod core_types;

pub mod animation;
pub mod config;
pub mod dispersion;
pub mod error;
pub mod grid;
pub mod heat_points;
pub mod pipeline;
pub mod projection;
pub mod source;

// Re-export core types
pub use core_types::{wrap_longitude, Degrees, GeoCoord, Meters, MetersPerSecond, PlanarOffset};

pub use animation::{AnimationConfig, AnimationSequencer, Frame, FrameSequence, RampMode};
pub use config::{GridConfig, PlumeConfig, MAX_GRID_CELLS};
pub use dispersion::{
    concentration_at, ConcentrationField, DispersionField, SpreadCoefficients, MIN_EXCLUSION_DISTANCE,
};
pub use error::{PlumeError, PlumeWarning, Result};
pub use grid::PlumeGrid;
pub use heat_points::{max_weight, weighted_centroid, Extraction, HeatPoint, HeatPointExtractor};
pub use pipeline::{compute_animation_frames, compute_heat_points, PlumeModel, PlumeOutput};
pub use projection::{wind_to_bearing, GeoProjector, ProjectedGrid};
pub use source::{CaseStudy, SourceSpec};
