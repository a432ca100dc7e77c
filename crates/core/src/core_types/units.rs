//! Semantic unit types for the plume inputs
//!
//! Newtype wrappers keep release heights, wind speeds and bearings from being
//! swapped at call sites that take several bare `f64`s.
//!
//! # Design Philosophy
//! - All quantities are f64; the plume equation spans many orders of magnitude
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Constructors do not validate; physical validation lives in `SourceSpec`
//!
//! # Usage
//! ```
//! use plume_core::core_types::units::{Degrees, Meters};
//!
//! let bearing = Degrees::new(135.0);
//! assert!((bearing.opposite().value() - 315.0).abs() < 1e-12);
//!
//! let height = Meters::new(80.0);
//! assert_eq!(*height, 80.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// SPATIAL TYPES
// ============================================================================

/// Distance or height in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Meters {
    /// Create a new distance in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to kilometers
    #[inline]
    #[must_use]
    pub fn to_kilometers(self) -> f64 {
        self.0 / 1000.0
    }
}

impl From<f64> for Meters {
    fn from(v: f64) -> Self {
        Meters(v)
    }
}

impl From<Meters> for f64 {
    fn from(m: Meters) -> f64 {
        m.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

// ============================================================================
// VELOCITY TYPES
// ============================================================================

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

impl Eq for MetersPerSecond {}

impl PartialOrd for MetersPerSecond {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetersPerSecond {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MetersPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MetersPerSecond {
    /// Create a new speed in m/s
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to km/h
    #[inline]
    #[must_use]
    pub fn to_kmh(self) -> f64 {
        self.0 * 3.6
    }
}

impl From<f64> for MetersPerSecond {
    fn from(v: f64) -> Self {
        MetersPerSecond(v)
    }
}

impl From<MetersPerSecond> for f64 {
    fn from(v: MetersPerSecond) -> f64 {
        v.0
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m/s", self.0)
    }
}

// ============================================================================
// ANGLE TYPES
// ============================================================================

/// Compass bearing in degrees, clockwise from true north
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Eq for Degrees {}

impl PartialOrd for Degrees {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Degrees {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Degrees {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Wrap into [0, 360)
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        Degrees(self.0.rem_euclid(360.0))
    }

    /// The reciprocal bearing, wrapped into [0, 360)
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        Degrees(self.0 + 180.0).normalized()
    }
}

impl From<f64> for Degrees {
    fn from(v: f64) -> Self {
        Degrees(v)
    }
}

impl From<Degrees> for f64 {
    fn from(d: Degrees) -> f64 {
        d.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_opposite_wraps() {
        assert_eq!(Degrees::new(0.0).opposite(), Degrees::new(180.0));
        assert_eq!(Degrees::new(135.0).opposite(), Degrees::new(315.0));
        assert_eq!(Degrees::new(270.0).opposite(), Degrees::new(90.0));
    }

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees::new(-90.0).normalized(), Degrees::new(270.0));
        assert_eq!(Degrees::new(360.0).normalized(), Degrees::new(0.0));
        assert_eq!(Degrees::new(725.0).normalized(), Degrees::new(5.0));
    }

    #[test]
    fn test_total_ordering_handles_nan() {
        let nan = Meters::new(f64::NAN);
        assert!(Meters::new(1.0e9) < nan);
        assert_eq!(Meters::new(2.0).max(Meters::new(3.0)), Meters::new(3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Meters::new(80.0).to_string(), "80.0 m");
        assert_eq!(MetersPerSecond::new(4.0).to_string(), "4.0 m/s");
        assert_eq!(Degrees::new(135.0).to_string(), "135.0°");
    }

    #[test]
    fn test_speed_conversion() {
        assert!((MetersPerSecond::new(10.0).to_kmh() - 36.0).abs() < 1e-12);
        assert!((Meters::new(1500.0).to_kilometers() - 1.5).abs() < 1e-12);
    }
}
