//! CPython-backed runtime.
//!
//! Attaches to the host process's interpreter. The host owns the
//! interpreter lifecycle; this runtime never initializes or finalizes it,
//! and refuses to construct when no interpreter is live. The module search
//! path is configured once per process, at first construction.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pyo3::prelude::*;
use pyo3::types::PyBytes;
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::runtime::{InterpreterRuntime, ResultHandle, RuntimeSession};
use crate::types::ValidationData;

/// Search path applied for this process, set by the first construction.
static SEARCH_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Runtime backed by the host's embedded CPython interpreter.
pub struct PythonRuntime {
    module: String,
    entry_point: String,
}

impl PythonRuntime {
    /// Attach to the host interpreter and configure the search path.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ResolutionFailure`] if no interpreter is
    /// initialized in this process or the search path cannot be
    /// configured.
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        if unsafe { pyo3::ffi::Py_IsInitialized() } == 0 {
            return Err(BridgeError::resolution(
                "no initialized interpreter in this process; \
                 the host owns the interpreter lifecycle",
            ));
        }

        Python::with_gil(|py| configure_search_path(py, &config.module_dir))?;

        Ok(Self {
            module: config.module.clone(),
            entry_point: config.entry_point.clone(),
        })
    }
}

/// Prepend `dir` to the interpreter's module search path, once per process.
///
/// Runs under the GIL, so the check-then-set pair cannot interleave with a
/// concurrent construction. A later construction naming a different
/// directory keeps the already-applied path and warns.
fn configure_search_path(py: Python<'_>, dir: &Path) -> Result<(), BridgeError> {
    if let Some(applied) = SEARCH_PATH.get() {
        if applied != dir {
            warn!(
                applied = %applied.display(),
                requested = %dir.display(),
                "Python runtime: search path already configured, keeping first"
            );
        }
        return Ok(());
    }

    let sys = py
        .import("sys")
        .map_err(|e| BridgeError::resolution(format!("cannot import sys: {}", e)))?;
    let path = sys
        .getattr("path")
        .map_err(|e| BridgeError::resolution(format!("cannot read sys.path: {}", e)))?;
    path.call_method1("insert", (0, dir.to_string_lossy().into_owned()))
        .map_err(|e| BridgeError::resolution(format!("cannot extend sys.path: {}", e)))?;

    let _ = SEARCH_PATH.set(dir.to_path_buf());
    info!(dir = %dir.display(), "Python runtime: module search path configured");
    Ok(())
}

impl InterpreterRuntime for PythonRuntime {
    fn with_exclusive_access(
        &self,
        f: &mut dyn FnMut(&dyn RuntimeSession) -> Result<ValidationData, BridgeError>,
    ) -> Result<ValidationData, BridgeError> {
        Python::with_gil(|py| {
            let session = PythonSession {
                py,
                module: &self.module,
                entry_point: &self.entry_point,
                raised: RefCell::new(None),
            };
            f(&session)
        })
    }
}

/// One GIL-scoped session.
///
/// Object references obtained here are owned by the GIL pool and released
/// when the session's scope closes, before control returns to the caller.
/// The raised-exception message is parked so the extraction path can
/// surface it through `take_pending_error`.
struct PythonSession<'py> {
    py: Python<'py>,
    module: &'py str,
    entry_point: &'py str,
    raised: RefCell<Option<String>>,
}

impl RuntimeSession for PythonSession<'_> {
    fn invoke(&self) -> Result<Option<Box<dyn ResultHandle + '_>>, BridgeError> {
        let module = self.py.import(self.module).map_err(|e| {
            BridgeError::resolution(format!("cannot import module '{}': {}", self.module, e))
        })?;
        let callable = module.getattr(self.entry_point).map_err(|e| {
            BridgeError::resolution(format!(
                "module '{}' has no attribute '{}': {}",
                self.module, self.entry_point, e
            ))
        })?;

        match callable.call0() {
            Ok(object) => Ok(Some(Box::new(PythonHandle { object }))),
            Err(raised) => {
                // The callable raised: there is no object to release.
                *self.raised.borrow_mut() = Some(raised.to_string());
                Ok(None)
            }
        }
    }

    fn take_pending_error(&self) -> Option<String> {
        if let Some(err) = PyErr::take(self.py) {
            return Some(err.to_string());
        }
        self.raised.borrow_mut().take()
    }
}

struct PythonHandle<'py> {
    object: &'py PyAny,
}

impl ResultHandle for PythonHandle<'_> {
    fn type_name(&self) -> String {
        self.object
            .get_type()
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|_| "<unknown>".to_string())
    }

    fn as_byte_buffer(&self) -> Option<&[u8]> {
        self.object.downcast::<PyBytes>().ok().map(PyBytes::as_bytes)
    }
}
