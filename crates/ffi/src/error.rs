use fire_behavior_core::FireBehaviorError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// # Design
/// - `code()` - Returns the error code handed back to the caller
/// - `msg()` - Returns the message kept for `fire_behavior_get_last_error`
pub(crate) trait FfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireBehaviorErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Error code plus message, built either directly for argument problems or
/// from a core [`FireBehaviorError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: FireBehaviorErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_landscape"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireBehaviorErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Caller buffer length does not match the landscape.
    pub fn buffer_length(param_name: &str, expected: usize, found: usize) -> Self {
        Self::invalid_parameter(format!(
            "Buffer '{param_name}' holds {found} values, landscape has {expected} cells"
        ))
    }

    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireBehaviorErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> FireBehaviorErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<FireBehaviorError> for DefaultFfiError {
    fn from(error: FireBehaviorError) -> Self {
        let code = match &error {
            FireBehaviorError::UnknownFuelModel { .. } => FireBehaviorErrorCode::UnknownFuelModel,
            FireBehaviorError::InvalidEnvironmentalConditions { .. } => {
                FireBehaviorErrorCode::InvalidConditions
            }
            FireBehaviorError::MisalignedLandscapeGrids { .. }
            | FireBehaviorError::InvalidLandscapeValue { .. } => {
                FireBehaviorErrorCode::InvalidLandscape
            }
            FireBehaviorError::InvalidSimulationParameters(_)
            | FireBehaviorError::IgnitionOutsideGrid { .. } => {
                FireBehaviorErrorCode::InvalidSimulation
            }
            FireBehaviorError::NoBurnableIgnition { .. } => {
                FireBehaviorErrorCode::NoBurnableIgnition
            }
            FireBehaviorError::ScenarioConfig(_) => FireBehaviorErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by fire behavior functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireBehaviorErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid argument, such as a buffer whose length does not match the landscape.
    InvalidParameter = 2,

    /// A fuel code is not in the fuel model catalog.
    UnknownFuelModel = 3,

    /// Scenario weather or moisture outside its physical range.
    InvalidConditions = 4,

    /// Landscape rasters misaligned or holding out-of-range values.
    InvalidLandscape = 5,

    /// Non-positive duration or time step, or ignition outside the grid.
    InvalidSimulation = 6,

    /// No burnable cell near the ignition point.
    NoBurnableIgnition = 7,
}

impl From<DefaultFfiError> for FireBehaviorErrorCode {
    fn from(error: DefaultFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, FireBehaviorErrorCode)> =
        const { RefCell::new((None, FireBehaviorErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireBehaviorErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireBehaviorErrorCode)) -> R,
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
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// FireBehaviorLandscape* landscape = NULL;
/// if (fire_behavior_landscape_new(&rasters, &landscape) != Ok) {
///     fprintf(stderr, "landscape rejected: %s\n", fire_behavior_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_behavior_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code on this thread (`Ok` after a successful call).
#[no_mangle]
pub extern "C" fn fire_behavior_get_last_error_code() -> FireBehaviorErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
