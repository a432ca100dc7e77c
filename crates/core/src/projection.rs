//! Projection of the plume grid onto geographic coordinates
//!
//! The downwind axis of the grid is turned onto the wind-to bearing θ with a
//! standard 2-D rotation. Bearings are compass angles (clockwise from north),
//! so the rotation acts on `(north, east)` pairs:
//!
//! ```text
//! north = x·cosθ − y·sinθ
//! east  = x·sinθ + y·cosθ
//! ```
//!
//! A positive crosswind offset `y` lies to the right of the direction of
//! travel. Offsets are then converted with the local equirectangular
//! approximation in [`GeoCoord::offset_by`].
//!
//! The conversion divides by `cos(origin latitude)`. Near the poles that
//! factor collapses and longitude offsets blow up; this is a precision limit
//! of the approximation and is reported as [`PlumeWarning::ProjectionLimit`]
//! rather than an error.

use crate::config::PlumeConfig;
use crate::core_types::{Degrees, GeoCoord, PlanarOffset};
use crate::error::PlumeWarning;
use crate::grid::PlumeGrid;
use nalgebra::{Rotation2, Vector2};
use tracing::warn;

/// Bearing the plume travels toward, given the meteorological wind-from bearing
#[inline]
#[must_use]
pub fn wind_to_bearing(wind_from: Degrees) -> Degrees {
    Degrees::new((*wind_from + 180.0).rem_euclid(360.0))
}

/// Rotation taking grid `(x, y)` onto `(north, east)` for wind-to bearing θ
#[inline]
fn rotation(wind_to: Degrees) -> Rotation2<f64> {
    Rotation2::new(wind_to.to_radians())
}

/// Rotate a downwind/crosswind point onto the local plane
#[inline]
#[must_use]
pub fn rotate(x: f64, y: f64, wind_to: Degrees) -> PlanarOffset {
    let v = rotation(wind_to) * Vector2::new(x, y);
    PlanarOffset::new(v.x, v.y)
}

/// Recover downwind/crosswind `(x, y)` from a planar offset
#[inline]
#[must_use]
pub fn inverse_rotate(offset: PlanarOffset, wind_to: Degrees) -> (f64, f64) {
    let v = rotation(wind_to).inverse() * Vector2::new(offset.north, offset.east);
    (v.x, v.y)
}

/// Geographic coordinates for every grid cell, in flat-index order
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedGrid {
    coords: Vec<GeoCoord>,
    warning: Option<PlumeWarning>,
}

impl ProjectedGrid {
    pub fn coords(&self) -> &[GeoCoord] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Projection precision warning, if the origin is near a pole
    pub fn warning(&self) -> Option<PlumeWarning> {
        self.warning
    }
}

/// Maps grid cells to latitude/longitude around a source origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    meters_per_degree: f64,
    polar_warning_latitude: f64,
}

impl Default for GeoProjector {
    fn default() -> Self {
        Self::from_config(&PlumeConfig::default())
    }
}

impl GeoProjector {
    #[must_use]
    pub fn from_config(config: &PlumeConfig) -> Self {
        Self {
            meters_per_degree: config.meters_per_degree,
            polar_warning_latitude: config.polar_warning_latitude,
        }
    }

    pub fn meters_per_degree(&self) -> f64 {
        self.meters_per_degree
    }

    /// Precision warning for an origin, if any
    pub fn check_origin(&self, origin: GeoCoord) -> Option<PlumeWarning> {
        (origin.lat.abs() > self.polar_warning_latitude).then_some(PlumeWarning::ProjectionLimit {
            latitude: origin.lat,
        })
    }

    /// Planar offset of a grid point for a wind-from bearing
    #[must_use]
    pub fn planar_offset(&self, x: f64, y: f64, wind_from: Degrees) -> PlanarOffset {
        rotate(x, y, wind_to_bearing(wind_from))
    }

    /// Project every cell of `grid` around `origin`.
    ///
    /// The unscaled grid is rotated; spread factors only ever affect σy/σz,
    /// never the cell geometry.
    pub fn project(&self, grid: &PlumeGrid, origin: GeoCoord, wind_from: Degrees) -> ProjectedGrid {
        let warning = self.check_origin(origin);
        if let Some(w) = warning {
            warn!("{w}");
        }

        let rot = rotation(wind_to_bearing(wind_from));
        let coords = grid
            .positions()
            .map(|(x, y)| {
                let v = rot * Vector2::new(x, y);
                origin.offset_by(PlanarOffset::new(v.x, v.y), self.meters_per_degree)
            })
            .collect();

        ProjectedGrid { coords, warning }
    }
}
