//! Result extraction: the validity checks between invocation and
//! ownership transfer.
//!
//! The checks run in a fixed order and short-circuit at the first failure:
//!
//! 1. a result object was produced at all
//! 2. the object is a byte buffer
//! 3. no runtime error is pending
//!
//! Only then is the payload copied out into natively owned memory. A
//! fourth, stricter check rejects zero-length buffers: empty validation
//! data has no meaning downstream. The result object's reference is
//! released exactly once on every path where one was obtained, and never
//! on the no-object path.

use crate::error::BridgeError;
use crate::runtime::RuntimeSession;
use crate::types::ValidationData;

/// Invoke the validation callable through `session` and extract its result.
///
/// Must run inside [`InterpreterRuntime::with_exclusive_access`]; the
/// session guarantees the runtime lock is held for the whole extraction.
///
/// [`InterpreterRuntime::with_exclusive_access`]: crate::runtime::InterpreterRuntime::with_exclusive_access
///
/// # Errors
///
/// Returns the first failed check as a [`BridgeError`]; see the module
/// docs for the order.
pub fn extract_validation_data(
    session: &dyn RuntimeSession,
) -> Result<ValidationData, BridgeError> {
    let handle = session.invoke()?;

    let Some(object) = handle else {
        let detail = session
            .take_pending_error()
            .unwrap_or_else(|| "no result object".to_string());
        return Err(BridgeError::NullResult { detail });
    };

    let Some(bytes) = object.as_byte_buffer() else {
        let actual = object.type_name();
        // Drain any error flag so the next crossing starts clean.
        let _ = session.take_pending_error();
        return Err(BridgeError::TypeMismatch { actual });
    };

    if let Some(message) = session.take_pending_error() {
        return Err(BridgeError::PendingRuntimeError { message });
    }

    if bytes.is_empty() {
        return Err(BridgeError::EmptyValidationData);
    }

    Ok(ValidationData::new(bytes.to_vec()))
}
