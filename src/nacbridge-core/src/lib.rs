//! # nacbridge-core
//!
//! Boundary between native code and the embedded interpreter that produces
//! attestation validation data. The interpreter side is opaque: a single
//! module exposing a no-argument callable that returns a byte buffer.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      ValidationEngine                      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │               InterpreterRuntime                     │  │
//! │  │   (exclusive access guard: GIL, or scripted lock)    │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                            │                               │
//! │                            ▼                               │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │             RuntimeSession::invoke                   │  │
//! │  │      (resolve module and callable, call with         │  │
//! │  │       no arguments, hand back a result handle)       │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                            │                               │
//! │                            ▼                               │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            extract_validation_data                   │  │
//! │  │      (object present, byte buffer, no pending        │  │
//! │  │       error, non-empty, then copy out)               │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Properties
//!
//! - **Fault absorption**: every runtime failure becomes a [`BridgeError`];
//!   nothing crosses to native code as a crash
//! - **Single release**: each obtained result object is released exactly
//!   once, and the no-object path releases nothing
//! - **Serialized access**: invocations queue on the runtime's one global
//!   lock, with no timeout
//! - **Opaque payload**: the bytes are copied out and never interpreted
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nacbridge_core::ValidationEngine;
//!
//! let engine = ValidationEngine::new()?;
//! let data = engine.generate_validation_data()?;
//! println!("{}", data.to_base64());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::pedantic)] // Too strict for production code
#![allow(clippy::doc_markdown)] // Allow product names without backticks
#![allow(clippy::missing_errors_doc)] // Error documentation not required
#![allow(clippy::missing_panics_doc)] // Panic documentation not required
#![allow(clippy::module_name_repetitions)] // Allow Type in module::Type
#![allow(clippy::must_use_candidate)] // Not all functions need must_use

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod runtime;
pub mod types;

pub use config::BridgeConfig;
pub use engine::ValidationEngine;
pub use error::BridgeError;
pub use extract::extract_validation_data;
pub use runtime::scripted::{ScriptedCall, ScriptedRuntime, ScriptedValue};
pub use runtime::{create_embedded_runtime, InterpreterRuntime, ResultHandle, RuntimeSession};
pub use types::ValidationData;

#[cfg(feature = "python")]
pub use runtime::python::PythonRuntime;
