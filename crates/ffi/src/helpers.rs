use crate::error::{with_last_error_mut, DefaultPlumeError, PlumeErrorCode, PlumeFfiError};
use plume_core::PlumeError;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing the `PlumeFfiError` trait.
pub(crate) fn set_last_error(error: &impl PlumeFfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl PlumeFfiError) -> PlumeErrorCode {
    set_last_error(error);
    error.code()
}

/// Record a core error (if any) and convert the result's error to its code.
pub(crate) fn track_result<T>(result: Result<T, PlumeError>) -> Result<T, PlumeErrorCode> {
    result.map_err(|e| track_error(&DefaultPlumeError::from(&e)))
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PlumeErrorCode::Ok;
    });
}
