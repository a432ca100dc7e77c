//! C ABI for the plume core
//!
//! Exposes the single-frame and animation calls to non-Rust presentation
//! layers. Results are returned in caller-owned buffers that must be released
//! with the matching `plume_free_*` function. Errors are reported through a
//! `PlumeErrorCode` return value plus a thread-local message
//! (`plume_get_last_error`). Non-fatal conditions (degenerate field, polar
//! origin) are reported as `PLUME_WARNING_*` flags through
//! `plume_get_last_warnings` and on each `PlumeFrame`.

mod buffers;
mod error;
mod helpers;
mod warnings;

pub use buffers::{PlumeFrame, PlumeHeatPoint};
pub use error::{plume_get_last_error, plume_get_last_error_code, PlumeErrorCode};
pub use warnings::{
    plume_get_last_warnings, PLUME_WARNING_DEGENERATE_FIELD, PLUME_WARNING_NONE,
    PLUME_WARNING_PROJECTION_LIMIT,
};

use crate::buffers::{frames_to_raw, free_frames, free_raw_buffer, heat_points_to_raw};
use crate::error::DefaultPlumeError;
use crate::helpers::{clear_last_error, track_error, track_result};
use crate::warnings::{set_last_warnings, warning_flags};
use std::ptr;
use tracing::debug;

/// Compute the steady plume and return its heat points.
///
/// # Parameters
/// - `origin_lat`, `origin_lon`: Source location in decimal degrees
/// - `emission_rate`: Q, must be > 0
/// - `wind_speed`: U in m/s, must be > 0
/// - `wind_from_deg`: Bearing the wind blows from, in [0, 360)
/// - `release_height`: H in meters, must be ≥ 0
/// - `out_points`: Receives the point buffer (null when no points)
/// - `out_len`: Receives the number of points
///
/// # Returns
/// - `PlumeErrorCode::Ok` on success. An empty result (degenerate field) is a success
///   with `*out_len == 0`; check `plume_get_last_warnings()` to tell the conditions apart.
/// - `PlumeErrorCode::NullPointer` if an out-pointer is null
/// - `PlumeErrorCode::InvalidInput` if any parameter is out of range
///
/// # Safety
/// `out_points` and `out_len` must be valid, writable pointers. The caller owns the
/// returned buffer and MUST release it with `plume_free_heat_points` exactly once.
#[no_mangle]
pub unsafe extern "C" fn plume_compute_heat_points(
    origin_lat: f64,
    origin_lon: f64,
    emission_rate: f64,
    wind_speed: f64,
    wind_from_deg: f64,
    release_height: f64,
    out_points: *mut *mut PlumeHeatPoint,
    out_len: *mut usize,
) -> PlumeErrorCode {
    set_last_warnings(PLUME_WARNING_NONE);
    if out_points.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("out_points"));
    }
    if out_len.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("out_len"));
    }

    let result = plume_core::compute_heat_points(
        origin_lat,
        origin_lon,
        emission_rate,
        wind_speed,
        wind_from_deg,
        release_height,
    );

    match track_result(result) {
        Ok(output) => {
            let (points, len) = heat_points_to_raw(&output.points);
            debug!("FFI: returning {} heat points", len);
            unsafe {
                *out_points = points;
                *out_len = len;
            }
            set_last_warnings(warning_flags(&output.warnings));
            clear_last_error();
            PlumeErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Null out on error (per documentation contract)
                *out_points = ptr::null_mut();
                *out_len = 0;
            }
            code
        }
    }
}

/// Release a buffer returned by `plume_compute_heat_points`.
///
/// Null pointers are ignored.
///
/// # Safety
/// `points`/`len` must be exactly what `plume_compute_heat_points` returned and must
/// not have been freed already.
#[no_mangle]
pub unsafe extern "C" fn plume_free_heat_points(points: *mut PlumeHeatPoint, len: usize) {
    unsafe { free_raw_buffer(points, len) }
}

/// Compute a spreading-plume animation with `steps` frames.
///
/// Spread factors run uniformly from 0.2 to 1.0 inclusive; only σy/σz are
/// ramped, the emission rate stays fixed.
///
/// # Returns
/// - `PlumeErrorCode::Ok` on success
/// - `PlumeErrorCode::NullPointer` if an out-pointer is null
/// - `PlumeErrorCode::InvalidInput` if any parameter is out of range or `steps` is 0
///
/// # Safety
/// `out_frames` and `out_len` must be valid, writable pointers. The caller owns the
/// returned frames (including their point buffers) and MUST release them with
/// `plume_free_animation_frames` exactly once.
#[no_mangle]
pub unsafe extern "C" fn plume_compute_animation_frames(
    origin_lat: f64,
    origin_lon: f64,
    emission_rate: f64,
    wind_speed: f64,
    wind_from_deg: f64,
    release_height: f64,
    steps: usize,
    out_frames: *mut *mut PlumeFrame,
    out_len: *mut usize,
) -> PlumeErrorCode {
    set_last_warnings(PLUME_WARNING_NONE);
    if out_frames.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("out_frames"));
    }
    if out_len.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("out_len"));
    }

    let result = plume_core::compute_animation_frames(
        origin_lat,
        origin_lon,
        emission_rate,
        wind_speed,
        wind_from_deg,
        release_height,
        steps,
    );

    match track_result(result) {
        Ok(frames) => {
            let (raw, len) = frames_to_raw(&frames);
            unsafe {
                *out_frames = raw;
                *out_len = len;
            }
            let flags = frames
                .iter()
                .fold(PLUME_WARNING_NONE, |acc, f| acc | warning_flags(&f.warnings));
            set_last_warnings(flags);
            clear_last_error();
            PlumeErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_frames = ptr::null_mut();
                *out_len = 0;
            }
            code
        }
    }
}

/// Release frames returned by `plume_compute_animation_frames`, including
/// every frame's point buffer.
///
/// # Safety
/// `frames`/`len` must be exactly what `plume_compute_animation_frames` returned and
/// must not have been freed already. Individual frame point buffers must not be
/// freed separately.
#[no_mangle]
pub unsafe extern "C" fn plume_free_animation_frames(frames: *mut PlumeFrame, len: usize) {
    unsafe { free_frames(frames, len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_compute_and_free_heat_points() {
        let mut points: *mut PlumeHeatPoint = ptr::null_mut();
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0, &mut points, &mut len)
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        assert!(!points.is_null());
        assert!(len > 0 && len <= 10_000);

        let slice = unsafe { std::slice::from_raw_parts(points, len) };
        assert!(slice.iter().all(|p| p.weight > 0.0 && p.weight <= 1.0));
        assert!(plume_get_last_error().is_null());
        assert_eq!(plume_get_last_warnings(), PLUME_WARNING_NONE);

        unsafe { plume_free_heat_points(points, len) };
    }

    #[test]
    fn test_invalid_input_sets_last_error() {
        let mut points: *mut PlumeHeatPoint = ptr::null_mut();
        let mut len = 7usize;
        let code = unsafe {
            plume_compute_heat_points(37.421, 141.032, -5.0, 4.0, 135.0, 80.0, &mut points, &mut len)
        };
        assert_eq!(code, PlumeErrorCode::InvalidInput);
        assert_eq!(plume_get_last_error_code(), PlumeErrorCode::InvalidInput);
        assert!(points.is_null());
        assert_eq!(len, 0);

        let msg = unsafe { CStr::from_ptr(plume_get_last_error()) };
        assert!(msg.to_str().unwrap().contains("emission_rate"));
    }

    #[test]
    fn test_null_out_pointer() {
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_heat_points(
                37.421,
                141.032,
                1e13,
                4.0,
                135.0,
                80.0,
                ptr::null_mut(),
                &mut len,
            )
        };
        assert_eq!(code, PlumeErrorCode::NullPointer);
    }

    #[test]
    fn test_animation_frames_round_trip() {
        let mut frames: *mut PlumeFrame = ptr::null_mut();
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_animation_frames(
                51.389, 30.099, 1e13, 4.0, 0.0, 80.0, 12, &mut frames, &mut len,
            )
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        assert_eq!(len, 12);

        let slice = unsafe { std::slice::from_raw_parts(frames, len) };
        for pair in slice.windows(2) {
            assert!(pair[1].spread_factor > pair[0].spread_factor);
        }
        assert!(slice.iter().all(|f| f.len > 0 && !f.points.is_null()));
        assert!(slice.iter().all(|f| f.peak_concentration > 0.0));
        assert!(slice.iter().all(|f| f.warnings == PLUME_WARNING_NONE));

        unsafe { plume_free_animation_frames(frames, len) };
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut frames: *mut PlumeFrame = ptr::null_mut();
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_animation_frames(
                51.389, 30.099, 1e13, 4.0, 0.0, 80.0, 0, &mut frames, &mut len,
            )
        };
        assert_eq!(code, PlumeErrorCode::InvalidInput);
        assert!(frames.is_null());
    }

    #[test]
    fn test_degenerate_field_is_empty_success() {
        let mut points: *mut PlumeHeatPoint = ptr::null_mut();
        let mut len = 3usize;
        let code = unsafe {
            plume_compute_heat_points(
                37.421,
                141.032,
                1e13,
                f64::MAX,
                135.0,
                80.0,
                &mut points,
                &mut len,
            )
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        assert!(points.is_null());
        assert_eq!(len, 0);
        assert_eq!(plume_get_last_warnings(), PLUME_WARNING_DEGENERATE_FIELD);
        unsafe { plume_free_heat_points(points, len) };
    }

    #[test]
    fn test_polar_origin_reports_projection_warning() {
        let mut points: *mut PlumeHeatPoint = ptr::null_mut();
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_heat_points(87.0, 10.0, 1e13, 4.0, 200.0, 80.0, &mut points, &mut len)
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        assert!(len > 0);
        assert_ne!(plume_get_last_warnings() & PLUME_WARNING_PROJECTION_LIMIT, 0);
        assert_eq!(plume_get_last_warnings() & PLUME_WARNING_DEGENERATE_FIELD, 0);
        unsafe { plume_free_heat_points(points, len) };

        // A later clean call resets the flags
        let code = unsafe {
            plume_compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0, &mut points, &mut len)
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        assert_eq!(plume_get_last_warnings(), PLUME_WARNING_NONE);
        unsafe { plume_free_heat_points(points, len) };
    }

    #[test]
    fn test_polar_animation_flags_every_frame() {
        let mut frames: *mut PlumeFrame = ptr::null_mut();
        let mut len = 0usize;
        let code = unsafe {
            plume_compute_animation_frames(
                87.0, 10.0, 1e13, 4.0, 200.0, 80.0, 4, &mut frames, &mut len,
            )
        };
        assert_eq!(code, PlumeErrorCode::Ok);
        let slice = unsafe { std::slice::from_raw_parts(frames, len) };
        assert!(slice
            .iter()
            .all(|f| f.warnings & PLUME_WARNING_PROJECTION_LIMIT != 0));
        assert_eq!(plume_get_last_warnings(), PLUME_WARNING_PROJECTION_LIMIT);
        unsafe { plume_free_animation_frames(frames, len) };
    }
}
