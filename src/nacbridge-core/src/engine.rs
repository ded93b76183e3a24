//! Validation data generation engine.
//!
//! The engine is the single entry point for the boundary: it owns the
//! embedded runtime, serializes access to it, runs the extraction checks,
//! and reports outcomes. Every failure comes back as a [`BridgeError`]
//! value; nothing from the embedded runtime crosses as a native fault.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::extract::extract_validation_data;
use crate::runtime::{create_embedded_runtime, InterpreterRuntime};
use crate::types::ValidationData;

/// The validation data generation engine.
///
/// Construction attaches to the embedded runtime and applies one-time
/// setup (module search path). Generation itself re-acquires the runtime
/// lock per call, so one engine can be shared across threads; callers
/// queue on the runtime's lock.
pub struct ValidationEngine {
    /// Configuration.
    config: BridgeConfig,
    /// Embedded interpreter runtime.
    runtime: Arc<dyn InterpreterRuntime>,
}

impl ValidationEngine {
    /// Create an engine with the default deployment layout.
    ///
    /// # Errors
    ///
    /// Returns error if no embedded runtime can be attached.
    pub fn new() -> Result<Self, BridgeError> {
        Self::with_config(BridgeConfig::default())
    }

    /// Create an engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if no embedded runtime can be attached.
    pub fn with_config(config: BridgeConfig) -> Result<Self, BridgeError> {
        info!(
            module = %config.module,
            entry_point = %config.entry_point,
            module_dir = %config.module_dir.display(),
            data_plist = %config.data_plist_path().display(),
            binary_image = %config.binary_image_path().display(),
            "ValidationEngine: starting initialization"
        );

        let runtime = create_embedded_runtime(&config)?;

        info!("ValidationEngine: initialization complete");
        Ok(Self {
            config,
            runtime: Arc::from(runtime),
        })
    }

    /// Create an engine with a caller-provided runtime.
    ///
    /// Useful for testing with scripted runtimes.
    #[must_use]
    pub fn with_runtime(config: BridgeConfig, runtime: Arc<dyn InterpreterRuntime>) -> Self {
        Self { config, runtime }
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Generate validation data through the embedded runtime.
    ///
    /// Acquires exclusive runtime access, invokes the entry-point callable
    /// with no arguments, runs the validity checks, and copies the payload
    /// into natively owned memory before releasing the lock.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] describing the first failed check. A
    /// recoverable error leaves the engine usable; the caller may simply
    /// call again.
    #[instrument(skip(self))]
    pub fn generate_validation_data(&self) -> Result<ValidationData, BridgeError> {
        debug!(
            module = %self.config.module,
            entry_point = %self.config.entry_point,
            "Generate: entering embedded runtime"
        );

        let result = self
            .runtime
            .with_exclusive_access(&mut |session| extract_validation_data(session));

        match &result {
            Ok(data) => info!(length = data.len(), "Generate: validation data ready"),
            Err(e) => error!(error = %e, recoverable = e.is_recoverable(), "Generate: failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::scripted::{ScriptedCall, ScriptedRuntime, ScriptedValue};

    #[test]
    fn test_engine_with_scripted_runtime() {
        let runtime = Arc::new(ScriptedRuntime::returning_bytes(vec![0xA5; 32]));
        let engine = ValidationEngine::with_runtime(BridgeConfig::default(), runtime.clone());

        let data = engine.generate_validation_data().unwrap();
        assert_eq!(data.len(), 32);
        assert_eq!(runtime.acquisitions(), 1);
    }

    #[test]
    fn test_engine_surfaces_runtime_failure() {
        let runtime = Arc::new(ScriptedRuntime::always(ScriptedCall::Raise(
            "no device identity".to_string(),
        )));
        let engine = ValidationEngine::with_runtime(BridgeConfig::default(), runtime);

        let err = engine.generate_validation_data().unwrap_err();
        assert!(matches!(err, BridgeError::NullResult { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_engine_recovers_after_failure() {
        let runtime = Arc::new(ScriptedRuntime::sequence(vec![
            ScriptedCall::Raise("transient".to_string()),
            ScriptedCall::Return(ScriptedValue::Bytes(vec![1, 2, 3, 4])),
        ]));
        let engine = ValidationEngine::with_runtime(BridgeConfig::default(), runtime);

        assert!(engine.generate_validation_data().is_err());
        let data = engine.generate_validation_data().unwrap();
        assert_eq!(data.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_config_accessor() {
        let runtime = Arc::new(ScriptedRuntime::returning_bytes(vec![1]));
        let config = BridgeConfig::new().module("nac_test");
        let engine = ValidationEngine::with_runtime(config, runtime);
        assert_eq!(engine.config().module, "nac_test");
    }
}
