//! Core types and utilities

pub mod geo;
pub mod units;

pub use geo::{wrap_longitude, GeoCoord, PlanarOffset};
pub use units::*;
