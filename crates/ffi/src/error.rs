use plume_core::PlumeError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait PlumeFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> PlumeErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `PlumeFfiError` for FFI-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultPlumeError {
    code: PlumeErrorCode,
    msg: String,
}

impl DefaultPlumeError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_points"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PlumeErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }
}

impl From<&PlumeError> for DefaultPlumeError {
    fn from(error: &PlumeError) -> Self {
        let code = match error {
            PlumeError::InvalidInput { .. } => PlumeErrorCode::InvalidInput,
            PlumeError::InvalidConfig { .. } => PlumeErrorCode::InvalidConfig,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl PlumeFfiError for DefaultPlumeError {
    fn code(&self) -> PlumeErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by plume functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid input: emission rate or wind speed not positive, negative release height,
    /// bearing outside [0, 360), origin outside the valid latitude/longitude range,
    /// or zero animation steps.
    InvalidInput = 2,

    /// Invalid model configuration.
    InvalidConfig = 3,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer returned to callers stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, PlumeErrorCode)> = const { RefCell::new((None, PlumeErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PlumeErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PlumeErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next plume FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// PlumeHeatPoint* points = NULL;
/// size_t len = 0;
/// if (plume_compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0, &points, &len) != Ok) {
///     const char* error = plume_get_last_error();
///     if (error) {
///         printf("Plume computation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn plume_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code on this thread.
///
/// Returns `PlumeErrorCode::Ok` (0) if the last call succeeded.
#[no_mangle]
pub extern "C" fn plume_get_last_error_code() -> PlumeErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
