//! Embedded interpreter runtime abstraction.
//!
//! This module defines the capability surface the boundary needs from an
//! embedded interpreter: serialized access, a no-argument invocation, and a
//! typed view of the result object. Everything above this seam is runtime
//! agnostic; everything below it talks to one concrete interpreter.
//!
//! ## Implementations
//!
//! - CPython: `PythonRuntime` (feature: `python`)
//! - Scripted: [`scripted::ScriptedRuntime`], an in-process stand-in that
//!   plays back configured outcomes and counts lock and release activity

use tracing::info;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::types::ValidationData;

#[cfg(feature = "python")]
pub mod python;
pub mod scripted;

/// An embedded interpreter that can run the validation callable.
///
/// ## Concurrency
///
/// The runtime owns one global execution lock (the interpreter's, where the
/// interpreter has one). [`InterpreterRuntime::with_exclusive_access`] blocks
/// until the lock is held, runs the callback, and releases the lock on every
/// exit path. There is no timeout: callers queue until the holder finishes.
///
/// ## Example
///
/// ```rust,ignore
/// use nacbridge_core::extract::extract_validation_data;
/// use nacbridge_core::runtime::create_embedded_runtime;
///
/// let runtime = create_embedded_runtime(&config)?;
/// let data = runtime.with_exclusive_access(&mut |session| {
///     extract_validation_data(session)
/// })?;
/// ```
pub trait InterpreterRuntime: Send + Sync {
    /// Acquire exclusive runtime access and run `f` under it.
    ///
    /// The session passed to `f` is only valid for the duration of the
    /// call. Any result handles obtained through it are released before
    /// this method returns.
    fn with_exclusive_access(
        &self,
        f: &mut dyn FnMut(&dyn RuntimeSession) -> Result<ValidationData, BridgeError>,
    ) -> Result<ValidationData, BridgeError>;
}

/// One exclusive slice of runtime access.
///
/// Sessions exist only inside [`InterpreterRuntime::with_exclusive_access`];
/// they cannot outlive the lock that makes them safe to use.
pub trait RuntimeSession {
    /// Resolve and invoke the validation callable with no arguments.
    ///
    /// Returns `Ok(None)` when the callable signalled failure instead of
    /// producing a result object; the diagnostic is then available from
    /// [`RuntimeSession::take_pending_error`]. No handle exists on that
    /// path, so there is nothing to release.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ResolutionFailure`] if the module or the
    /// callable cannot be resolved.
    fn invoke(&self) -> Result<Option<Box<dyn ResultHandle + '_>>, BridgeError>;

    /// Take the runtime's pending error, clearing it.
    ///
    /// A pending error can coexist with a returned object; the boundary
    /// checks this flag independently of the result's type.
    fn take_pending_error(&self) -> Option<String>;
}

/// A reference-holding view of one result object.
///
/// Dropping the handle releases the runtime's reference to the object,
/// exactly once. Handles are never created for failed invocations.
pub trait ResultHandle {
    /// Runtime type name of the object, for diagnostics.
    fn type_name(&self) -> String;

    /// Borrow the object's contents if it is a byte buffer.
    ///
    /// Returns `None` for any other type, including the runtime's none
    /// value.
    fn as_byte_buffer(&self) -> Option<&[u8]>;
}

/// Create the embedded interpreter runtime for this build.
///
/// With the `python` feature enabled this attaches to the host's CPython
/// interpreter and configures the module search path once. Without it there
/// is no interpreter to attach to and construction fails.
///
/// # Errors
///
/// Returns [`BridgeError::ResolutionFailure`] if the interpreter is not
/// ready, or [`BridgeError::Unsupported`] when built without the `python`
/// feature.
pub fn create_embedded_runtime(
    config: &BridgeConfig,
) -> Result<Box<dyn InterpreterRuntime>, BridgeError> {
    #[cfg(feature = "python")]
    {
        let runtime = python::PythonRuntime::new(config)?;
        info!(
            module = %config.module,
            entry_point = %config.entry_point,
            "Runtime factory: attached to embedded CPython"
        );
        Ok(Box::new(runtime))
    }

    #[cfg(not(feature = "python"))]
    {
        info!(
            module = %config.module,
            "Runtime factory: no embedded interpreter compiled in"
        );
        Err(BridgeError::unsupported(
            "built without the `python` feature; no embedded interpreter available",
        ))
    }
}
