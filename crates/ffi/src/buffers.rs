use crate::warnings::warning_flags;
use plume_core::{Frame, HeatPoint};
use std::ptr;

/// FFI-friendly heat point. Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeHeatPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Concentration normalized by the field maximum, in (0, 1].
    pub weight: f64,
}

impl From<&HeatPoint> for PlumeHeatPoint {
    fn from(point: &HeatPoint) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            weight: point.weight,
        }
    }
}

/// One animation frame with an owned point buffer.
#[repr(C)]
#[derive(Debug)]
pub struct PlumeFrame {
    /// Frame position in the sequence (0-based).
    pub index: usize,
    /// Scale applied to σy and σz for this frame.
    pub spread_factor: f64,
    /// Scale applied to the emission rate (1.0 unless ramping emission).
    pub emission_scale: f64,
    /// Maximum concentration of this frame's field.
    pub peak_concentration: f64,
    /// Heat points; null when `len` is 0. Owned by the enclosing frame array.
    pub points: *mut PlumeHeatPoint,
    /// Number of heat points.
    pub len: usize,
    /// `PLUME_WARNING_*` flags raised by this frame.
    pub warnings: u32,
}

/// Move a slice of values into a heap buffer owned by the caller.
/// Empty input yields a null pointer.
pub(crate) fn into_raw_buffer<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let len = items.len();
    let raw = Box::into_raw(items.into_boxed_slice());
    (raw.cast::<T>(), len)
}

/// Reclaim a buffer created by `into_raw_buffer`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_buffer` and not have been freed.
pub(crate) unsafe fn free_raw_buffer<T>(ptr: *mut T, len: usize) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: caller guarantees the pointer/length pair came from
    // `Box::<[T]>::into_raw` in `into_raw_buffer`.
    unsafe {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)));
    }
}

pub(crate) fn heat_points_to_raw(points: &[HeatPoint]) -> (*mut PlumeHeatPoint, usize) {
    into_raw_buffer(points.iter().map(PlumeHeatPoint::from).collect())
}

pub(crate) fn frames_to_raw(frames: &[Frame]) -> (*mut PlumeFrame, usize) {
    let frames = frames
        .iter()
        .map(|frame| {
            let (points, len) = heat_points_to_raw(&frame.points);
            PlumeFrame {
                index: frame.index,
                spread_factor: frame.spread_factor,
                emission_scale: frame.emission_scale,
                peak_concentration: frame.peak_concentration,
                points,
                len,
                warnings: warning_flags(&frame.warnings),
            }
        })
        .collect();
    into_raw_buffer(frames)
}

/// Reclaim a frame array and every point buffer it owns.
///
/// # Safety
/// `ptr`/`len` must come from `frames_to_raw` and not have been freed.
pub(crate) unsafe fn free_frames(ptr: *mut PlumeFrame, len: usize) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: caller guarantees ptr/len describe a live frame array.
    unsafe {
        for frame in std::slice::from_raw_parts(ptr, len) {
            free_raw_buffer(frame.points, frame.len);
        }
        free_raw_buffer(ptr, len);
    }
}
