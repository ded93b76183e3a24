//! Scripted runtime for tests and host-less development.
//!
//! Plays back a configured sequence of invocation outcomes instead of
//! talking to a real interpreter, and counts lock acquisitions, section
//! overlaps, and handle releases so tests can assert the boundary's
//! serialization and release discipline from the outside.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::BridgeError;
use crate::runtime::{InterpreterRuntime, ResultHandle, RuntimeSession};
use crate::types::ValidationData;

/// A value the scripted callable can produce.
#[derive(Debug, Clone)]
pub enum ScriptedValue {
    /// A byte buffer, the only type the boundary accepts.
    Bytes(Vec<u8>),
    /// A text object, reported as type `str`.
    Text(String),
    /// The runtime's none value, reported as type `NoneType`.
    None,
}

impl ScriptedValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "str",
            Self::None => "NoneType",
        }
    }
}

/// One scripted invocation outcome.
#[derive(Debug, Clone)]
pub enum ScriptedCall {
    /// Produce a result object.
    Return(ScriptedValue),
    /// Produce a result object and leave the runtime error flag set.
    ReturnWithPendingError(ScriptedValue, String),
    /// Signal failure instead of returning; no object is produced.
    Raise(String),
    /// Fail before the callable is even reached.
    FailResolution(String),
}

enum Script {
    Always(ScriptedCall),
    Sequence(VecDeque<ScriptedCall>),
}

/// In-process runtime that plays back scripted outcomes.
///
/// A single internal mutex stands in for the interpreter's global lock;
/// the counters record everything tests need to observe:
///
/// - `acquisitions`: times the lock was taken
/// - `overlaps`: times two exclusive sections were active at once
///   (always zero unless serialization is broken)
/// - `invocations`: calls made through sessions
/// - `handles_created` / `handles_released`: result-object reference
///   lifecycle, which must balance on every path that obtained an object
pub struct ScriptedRuntime {
    script: Mutex<Script>,
    lock: Mutex<()>,
    acquisitions: AtomicUsize,
    active: AtomicUsize,
    overlaps: AtomicUsize,
    invocations: AtomicUsize,
    handles_created: Arc<AtomicUsize>,
    handles_released: Arc<AtomicUsize>,
}

impl ScriptedRuntime {
    /// Runtime that repeats the same outcome for every invocation.
    #[must_use]
    pub fn always(call: ScriptedCall) -> Self {
        Self::with_script(Script::Always(call))
    }

    /// Runtime that plays outcomes in order, then fails resolution.
    #[must_use]
    pub fn sequence(calls: Vec<ScriptedCall>) -> Self {
        Self::with_script(Script::Sequence(calls.into()))
    }

    /// Runtime whose callable always returns the given byte buffer.
    #[must_use]
    pub fn returning_bytes(payload: impl Into<Vec<u8>>) -> Self {
        Self::always(ScriptedCall::Return(ScriptedValue::Bytes(payload.into())))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            lock: Mutex::new(()),
            acquisitions: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            overlaps: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
            handles_created: Arc::new(AtomicUsize::new(0)),
            handles_released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Times the exclusive lock was acquired.
    #[must_use]
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Exclusive sections currently active. Zero whenever no call is in
    /// flight; the lock balances on every exit path.
    #[must_use]
    pub fn active_sections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Times two exclusive sections overlapped.
    #[must_use]
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    /// Invocations made through sessions.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Result handles handed out.
    #[must_use]
    pub fn handles_created(&self) -> usize {
        self.handles_created.load(Ordering::SeqCst)
    }

    /// Result handles released by drop.
    #[must_use]
    pub fn handles_released(&self) -> usize {
        self.handles_released.load(Ordering::SeqCst)
    }

    fn next_call(&self) -> ScriptedCall {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match &mut *script {
            Script::Always(call) => call.clone(),
            Script::Sequence(calls) => calls.pop_front().unwrap_or_else(|| {
                ScriptedCall::FailResolution("script exhausted".to_string())
            }),
        }
    }

    fn make_handle(&self, value: ScriptedValue) -> ScriptedHandle {
        self.handles_created.fetch_add(1, Ordering::SeqCst);
        ScriptedHandle {
            value,
            released: Arc::clone(&self.handles_released),
        }
    }
}

impl InterpreterRuntime for ScriptedRuntime {
    fn with_exclusive_access(
        &self,
        f: &mut dyn FnMut(&dyn RuntimeSession) -> Result<ValidationData, BridgeError>,
    ) -> Result<ValidationData, BridgeError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }

        let session = ScriptedSession {
            runtime: self,
            pending: RefCell::new(None),
        };
        let result = f(&session);

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

struct ScriptedSession<'a> {
    runtime: &'a ScriptedRuntime,
    pending: RefCell<Option<String>>,
}

impl RuntimeSession for ScriptedSession<'_> {
    fn invoke(&self) -> Result<Option<Box<dyn ResultHandle + '_>>, BridgeError> {
        self.runtime.invocations.fetch_add(1, Ordering::SeqCst);

        match self.runtime.next_call() {
            ScriptedCall::Return(value) => Ok(Some(Box::new(self.runtime.make_handle(value)))),
            ScriptedCall::ReturnWithPendingError(value, message) => {
                *self.pending.borrow_mut() = Some(message);
                Ok(Some(Box::new(self.runtime.make_handle(value))))
            }
            ScriptedCall::Raise(message) => {
                *self.pending.borrow_mut() = Some(message);
                Ok(None)
            }
            ScriptedCall::FailResolution(reason) => Err(BridgeError::resolution(reason)),
        }
    }

    fn take_pending_error(&self) -> Option<String> {
        self.pending.borrow_mut().take()
    }
}

struct ScriptedHandle {
    value: ScriptedValue,
    released: Arc<AtomicUsize>,
}

impl ResultHandle for ScriptedHandle {
    fn type_name(&self) -> String {
        self.value.type_name().to_string()
    }

    fn as_byte_buffer(&self) -> Option<&[u8]> {
        match &self.value {
            ScriptedValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
