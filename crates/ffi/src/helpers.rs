use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, FireBehaviorErrorCode};
use std::ffi::CString;
use tracing::debug;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FfiError) {
    debug!(code = ?error.code(), message = error.msg(), "FFI call failed");
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> FireBehaviorErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, or clear the last error on success.
pub(crate) fn track_result<T, E: FfiError>(
    result: Result<T, E>,
) -> Result<T, FireBehaviorErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireBehaviorErrorCode::Ok;
    });
}

/// Collapse a tracked result into the code returned across the boundary
pub(crate) fn into_code(result: Result<(), DefaultFfiError>) -> FireBehaviorErrorCode {
    match track_result(result) {
        Ok(()) => FireBehaviorErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow `len` values from a caller-owned array.
///
/// # Safety
/// A non-null `ptr` must point to at least `len` initialized values that stay
/// valid and unaliased by writers for `'a`.
pub(crate) unsafe fn input_slice<'a, T>(
    ptr: *const T,
    len: usize,
    name: &str,
) -> Result<&'a [T], DefaultFfiError> {
    if ptr.is_null() {
        return Err(DefaultFfiError::null_pointer(name));
    }
    // SAFETY: non-null checked above; length and lifetime are the caller's contract
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Borrow a caller-owned output buffer, or `None` if the caller passed null.
///
/// # Safety
/// A non-null `ptr` must point to at least `len` writable values that nothing
/// else accesses for `'a`.
pub(crate) unsafe fn output_slice<'a, T>(ptr: *mut T, len: usize) -> Option<&'a mut [T]> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: non-null checked above; length and exclusivity are the caller's contract
        Some(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{fire_behavior_get_last_error, fire_behavior_get_last_error_code};

    #[test]
    fn test_track_result_sets_and_clears() {
        let failed: Result<(), _> = Err(DefaultFfiError::null_pointer("rasters"));
        assert_eq!(track_result(failed), Err(FireBehaviorErrorCode::NullPointer));
        assert_eq!(fire_behavior_get_last_error_code(), FireBehaviorErrorCode::NullPointer);
        assert!(!fire_behavior_get_last_error().is_null());

        let ok: Result<u8, DefaultFfiError> = Ok(3);
        assert_eq!(track_result(ok), Ok(3));
        assert_eq!(fire_behavior_get_last_error_code(), FireBehaviorErrorCode::Ok);
        assert!(fire_behavior_get_last_error().is_null());
    }

    #[test]
    fn test_null_input_slice_rejected() {
        let result = unsafe { input_slice::<f32>(std::ptr::null(), 4, "slope") };
        assert_eq!(result.unwrap_err().code(), FireBehaviorErrorCode::NullPointer);
        assert!(unsafe { output_slice::<f32>(std::ptr::null_mut(), 4) }.is_none());
    }
}
