use plume_core::PlumeWarning;
use std::cell::Cell;

/// No warning was raised.
pub const PLUME_WARNING_NONE: u32 = 0;

/// The concentration field had a zero or non-finite peak; the point set is empty.
pub const PLUME_WARNING_DEGENERATE_FIELD: u32 = 1 << 0;

/// The origin lies close enough to a pole that the projection is imprecise.
pub const PLUME_WARNING_PROJECTION_LIMIT: u32 = 1 << 1;

/// Fold core warnings into a `PLUME_WARNING_*` bitmask.
pub(crate) fn warning_flags(warnings: &[PlumeWarning]) -> u32 {
    warnings.iter().fold(PLUME_WARNING_NONE, |flags, warning| {
        flags
            | match warning {
                PlumeWarning::DegenerateField { .. } => PLUME_WARNING_DEGENERATE_FIELD,
                PlumeWarning::ProjectionLimit { .. } => PLUME_WARNING_PROJECTION_LIMIT,
            }
    })
}

thread_local! {
    /// Warning bitmask of the most recent compute call on this thread.
    static LAST_WARNINGS: Cell<u32> = const { Cell::new(PLUME_WARNING_NONE) };
}

pub(crate) fn set_last_warnings(flags: u32) {
    LAST_WARNINGS.set(flags);
}

/// Warnings raised by the most recent compute call on this thread, as a
/// bitmask of `PLUME_WARNING_*` flags.
///
/// For an animation this is the union over all frames; each `PlumeFrame`
/// also carries its own flags. Returns `PLUME_WARNING_NONE` (0) after a clean
/// run or a failed call.
///
/// Example:
/// ```c
/// if (plume_compute_heat_points(87.5, 10.0, 1e13, 4.0, 200.0, 80.0, &points, &len) == Ok
///     && (plume_get_last_warnings() & PLUME_WARNING_PROJECTION_LIMIT)) {
///     printf("Projection imprecise near the pole\n");
/// }
/// ```
#[no_mangle]
pub extern "C" fn plume_get_last_warnings() -> u32 {
    LAST_WARNINGS.get()
}
