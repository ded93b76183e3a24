//! # nacbridge-ffi
//!
//! C-compatible FFI interface for the nacbridge validation boundary.
//!
//! This crate provides a stable C ABI for native applications that need
//! attestation validation data from the embedded runtime. All failures are
//! absorbed into status codes and a null/zero sentinel; no runtime fault
//! ever crosses this boundary as a crash.
//!
//! ## Usage
//!
//! ```c
//! #include "nacbridge.h"
//!
//! int main() {
//!     // Initialize (requires a live embedded interpreter in-process)
//!     NacBridgeHandle *handle = nacbridge_init();
//!     if (!handle) {
//!         return 1;
//!     }
//!
//!     uint8_t *data = NULL;
//!     size_t len = 0;
//!
//!     int result = nacbridge_generate_validation_data(handle, &data, &len);
//!     if (result == 0) {
//!         // ... use data[0..len] ...
//!         nacbridge_free(data);
//!     }
//!
//!     // Cleanup
//!     nacbridge_destroy(handle);
//!     return 0;
//! }
//! ```

#![allow(clippy::missing_safety_doc)] // FFI functions are inherently unsafe

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use nacbridge_core::ValidationEngine;

/// Opaque handle to the validation bridge instance.
#[repr(C)]
pub struct NacBridgeHandle {
    engine: ValidationEngine,
}

/// Status codes returned by FFI functions.
#[repr(C)]
pub enum NacBridgeStatus {
    /// Success.
    Success = 0,
    /// Invalid argument.
    InvalidArgument = -1,
    /// Initialization failed.
    InitializationFailed = -2,
    /// Validation data generation failed.
    GenerationFailed = -3,
    /// Internal error.
    InternalError = -99,
}

/// Initialize the validation bridge.
///
/// Attaches to the embedded interpreter and applies one-time setup.
/// Returns a handle that must be passed to all other functions.
/// Returns NULL on failure.
///
/// # Safety
///
/// The returned handle must be freed with `nacbridge_destroy`.
#[no_mangle]
pub extern "C" fn nacbridge_init() -> *mut NacBridgeHandle {
    let result = catch_unwind(|| match ValidationEngine::new() {
        Ok(engine) => {
            let handle = Box::new(NacBridgeHandle { engine });
            Box::into_raw(handle)
        }
        Err(e) => {
            tracing::error!("Failed to initialize engine: {}", e);
            ptr::null_mut()
        }
    });

    match result {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Initialization panicked: {:?}", e);
            ptr::null_mut()
        }
    }
}

/// Generate validation data into a caller-owned buffer.
///
/// # Arguments
///
/// * `handle` - Handle from `nacbridge_init`
/// * `out_data` - Output pointer for the payload (caller must free with `nacbridge_free`)
/// * `out_len` - Output pointer for the payload length
///
/// # Returns
///
/// 0 on success, negative status code on failure. On every failure path
/// the out-parameters hold the sentinel (NULL, 0).
///
/// # Safety
///
/// - `handle` must be a valid handle from `nacbridge_init`
/// - `out_data` and `out_len` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn nacbridge_generate_validation_data(
    handle: *mut NacBridgeHandle,
    out_data: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    // Validate arguments
    if handle.is_null() || out_data.is_null() || out_len.is_null() {
        return NacBridgeStatus::InvalidArgument as i32;
    }

    // Sentinel first; only the success path overwrites it
    *out_data = ptr::null_mut();
    *out_len = 0;

    let handle = &*handle;

    let data = match catch_unwind(AssertUnwindSafe(|| handle.engine.generate_validation_data())) {
        Ok(Ok(data)) => data,
        Ok(Err(e)) => {
            tracing::error!("Validation data generation failed: {}", e);
            return NacBridgeStatus::GenerationFailed as i32;
        }
        Err(e) => {
            tracing::error!("Validation data generation panicked: {:?}", e);
            return NacBridgeStatus::InternalError as i32;
        }
    };

    // Allocate and copy the payload; the engine guarantees it is non-empty
    let len = data.len();
    let buffer = libc::malloc(len) as *mut u8;
    if buffer.is_null() {
        return NacBridgeStatus::InternalError as i32;
    }

    ptr::copy_nonoverlapping(data.as_bytes().as_ptr(), buffer, len);

    *out_data = buffer;
    *out_len = len;

    NacBridgeStatus::Success as i32
}

/// Free memory allocated by nacbridge functions.
///
/// # Safety
///
/// `data` must be a pointer returned by a nacbridge function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn nacbridge_free(data: *mut c_void) {
    if !data.is_null() {
        libc::free(data);
    }
}

/// Destroy the bridge handle and release resources.
///
/// # Safety
///
/// `handle` must be a valid handle from `nacbridge_init`.
/// After this call, the handle is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn nacbridge_destroy(handle: *mut NacBridgeHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Get the library version.
///
/// Returns a static string with the version number.
#[no_mangle]
pub extern "C" fn nacbridge_version() -> *const libc::c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const libc::c_char
}
