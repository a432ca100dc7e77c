//! Geographic and local planar coordinates
//!
//! Conversions use a local equirectangular approximation: one degree of
//! latitude is a fixed number of meters, and one degree of longitude shrinks
//! with `cos(latitude)` of the origin. This holds for offsets that are small
//! relative to Earth's radius (tens of kilometers) and degrades near the
//! poles, where `cos(latitude) -> 0`. Longitudes are wrapped into
//! [-180, 180), so offsets across the antimeridian stay well formed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Meters per degree of latitude used by the equirectangular approximation
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Wrap a longitude into [-180, 180); values already in range are returned unchanged
#[must_use]
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Move this coordinate by a planar offset.
    ///
    /// Δlat = north / m, Δlon = east / (m · cos(lat)), with m meters per degree.
    #[must_use]
    pub fn offset_by(self, offset: PlanarOffset, meters_per_degree: f64) -> Self {
        let cos_lat = self.lat.to_radians().cos();
        Self {
            lat: self.lat + offset.north / meters_per_degree,
            lon: wrap_longitude(self.lon + offset.east / (meters_per_degree * cos_lat)),
        }
    }

    /// Planar offset from `self` to `other`, inverse of [`GeoCoord::offset_by`]
    #[must_use]
    pub fn offset_to(self, other: GeoCoord, meters_per_degree: f64) -> PlanarOffset {
        let cos_lat = self.lat.to_radians().cos();
        PlanarOffset {
            north: (other.lat - self.lat) * meters_per_degree,
            east: wrap_longitude(other.lon - self.lon) * meters_per_degree * cos_lat,
        }
    }

    /// Compass bearing in [0, 360) from `self` to `other` on the local plane
    #[must_use]
    pub fn bearing_to(self, other: GeoCoord) -> f64 {
        self.offset_to(other, METERS_PER_DEGREE).bearing()
    }
}

impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{} {:.4}°{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// Offset in meters on the local tangent plane around an origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarOffset {
    pub north: f64,
    pub east: f64,
}

impl PlanarOffset {
    #[must_use]
    pub const fn new(north: f64, east: f64) -> Self {
        Self { north, east }
    }

    #[must_use]
    pub fn distance(self) -> f64 {
        self.north.hypot(self.east)
    }

    /// Compass bearing in [0, 360) of this offset (0 = north, 90 = east)
    #[must_use]
    pub fn bearing(self) -> f64 {
        self.east.atan2(self.north).to_degrees().rem_euclid(360.0)
    }
}
