//! Error types for boundary operations.

use thiserror::Error;

/// Errors that can occur while generating validation data.
///
/// Every failure inside the embedded runtime is absorbed into one of these
/// variants. No runtime fault propagates to the caller as anything other
/// than an `Err` value.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The runtime or the target callable could not be resolved.
    #[error("Callable resolution failed: {reason}")]
    ResolutionFailure {
        /// What could not be resolved.
        reason: String,
    },

    /// The call completed without producing a result object.
    ///
    /// This is the raised-exception path: the callable signalled failure
    /// instead of returning, so there is nothing to release or inspect.
    #[error("No result object from callable: {detail}")]
    NullResult {
        /// Diagnostic recovered from the runtime, if any.
        detail: String,
    },

    /// A result object was produced but it is not a byte buffer.
    #[error("Result is not a byte buffer (got {actual})")]
    TypeMismatch {
        /// Runtime type name of the object actually returned.
        actual: String,
    },

    /// The runtime's error flag was set even though an object was returned.
    ///
    /// The buffer is discarded: a half-failed call is treated as a failure.
    #[error("Runtime error pending after call: {message}")]
    PendingRuntimeError {
        /// Message recovered from the pending error.
        message: String,
    },

    /// The callable returned a zero-length byte buffer.
    ///
    /// Empty validation data is never meaningful to the attestation
    /// consumers, so the boundary refuses it outright.
    #[error("Validation data is empty")]
    EmptyValidationData,

    /// No embedded interpreter support is available in this build.
    #[error("Embedded runtime unavailable: {reason}")]
    Unsupported {
        /// Why no runtime can be constructed.
        reason: String,
    },
}

impl BridgeError {
    /// Build a [`BridgeError::ResolutionFailure`].
    #[must_use]
    pub fn resolution(reason: impl Into<String>) -> Self {
        Self::ResolutionFailure {
            reason: reason.into(),
        }
    }

    /// Build a [`BridgeError::Unsupported`].
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Check if this error came from a single failed invocation.
    ///
    /// Recoverable errors leave the runtime usable; the caller may simply
    /// invoke again. Non-recoverable errors mean the runtime itself is
    /// missing or misconfigured.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NullResult { .. }
                | Self::TypeMismatch { .. }
                | Self::PendingRuntimeError { .. }
                | Self::EmptyValidationData
        )
    }
}
