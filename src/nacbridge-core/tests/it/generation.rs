//! End-to-end generation scenarios through the public engine API.

use std::sync::Arc;

use base64::engine::general_purpose;
use base64::Engine as _;

use nacbridge_core::{
    BridgeConfig, BridgeError, ScriptedCall, ScriptedRuntime, ScriptedValue, ValidationEngine,
};

fn engine_over(runtime: &Arc<ScriptedRuntime>) -> ValidationEngine {
    ValidationEngine::with_runtime(BridgeConfig::default(), runtime.clone())
}

#[test]
fn test_thirty_two_byte_payload_round_trips() {
    let payload: Vec<u8> = (0u8..32).collect();
    let runtime = Arc::new(ScriptedRuntime::returning_bytes(payload.clone()));
    let engine = engine_over(&runtime);

    let data = engine.generate_validation_data().unwrap();
    assert_eq!(data.len(), 32);
    assert_eq!(data.as_bytes(), payload.as_slice());

    // The copy is owned natively; the runtime's reference is already gone.
    assert_eq!(runtime.handles_created(), 1);
    assert_eq!(runtime.handles_released(), 1);
}

#[test]
fn test_base64_matches_transport_encoding() {
    let payload = vec![0xDE, 0xAD, 0xBE, 0xEF];
    let runtime = Arc::new(ScriptedRuntime::returning_bytes(payload.clone()));
    let engine = engine_over(&runtime);

    let data = engine.generate_validation_data().unwrap();
    assert_eq!(data.to_base64(), general_purpose::STANDARD.encode(&payload));
}

#[test]
fn test_release_exactly_once_across_mixed_outcomes() {
    let runtime = Arc::new(ScriptedRuntime::sequence(vec![
        ScriptedCall::Return(ScriptedValue::Bytes(vec![1; 8])),
        ScriptedCall::Return(ScriptedValue::None),
        ScriptedCall::Raise("raised".to_string()),
        ScriptedCall::ReturnWithPendingError(
            ScriptedValue::Bytes(vec![2; 8]),
            "pending".to_string(),
        ),
        ScriptedCall::Return(ScriptedValue::Text("x".to_string())),
    ]));
    let engine = engine_over(&runtime);

    for _ in 0..5 {
        let _ = engine.generate_validation_data();
    }

    // Four outcomes produced an object; the raise produced none.
    assert_eq!(runtime.handles_created(), 4);
    assert_eq!(runtime.handles_released(), 4);
}

#[test]
fn test_no_release_when_callable_raises() {
    let runtime = Arc::new(ScriptedRuntime::always(ScriptedCall::Raise(
        "no identity data".to_string(),
    )));
    let engine = engine_over(&runtime);

    for _ in 0..3 {
        let err = engine.generate_validation_data().unwrap_err();
        assert!(matches!(err, BridgeError::NullResult { .. }));
    }

    assert_eq!(runtime.handles_created(), 0);
    assert_eq!(runtime.handles_released(), 0);
}

#[test]
fn test_lock_acquisitions_balance() {
    let runtime = Arc::new(ScriptedRuntime::sequence(vec![
        ScriptedCall::Return(ScriptedValue::Bytes(vec![9; 16])),
        ScriptedCall::Raise("second".to_string()),
        ScriptedCall::Return(ScriptedValue::Bytes(Vec::new())),
    ]));
    let engine = engine_over(&runtime);

    for _ in 0..3 {
        let _ = engine.generate_validation_data();
    }

    // One acquisition per call, fully released on success and failure alike.
    assert_eq!(runtime.acquisitions(), 3);
    assert_eq!(runtime.invocations(), 3);
    assert_eq!(runtime.active_sections(), 0);
}

#[test]
fn test_resolution_failure_keeps_lock_balanced() {
    let runtime = Arc::new(ScriptedRuntime::always(ScriptedCall::FailResolution(
        "module 'nac' not found".to_string(),
    )));
    let engine = engine_over(&runtime);

    for _ in 0..3 {
        let err = engine.generate_validation_data().unwrap_err();
        assert!(matches!(err, BridgeError::ResolutionFailure { .. }));
    }

    // The lock is taken before resolution, so it must balance here too.
    assert_eq!(runtime.acquisitions(), 3);
    assert_eq!(runtime.active_sections(), 0);
    assert_eq!(runtime.overlaps(), 0);
    assert_eq!(runtime.handles_created(), 0);
    assert_eq!(runtime.handles_released(), 0);
}

#[test]
fn test_engine_usable_after_every_failure_kind() {
    let payload = vec![0x55; 32];
    let runtime = Arc::new(ScriptedRuntime::sequence(vec![
        ScriptedCall::Raise("raised".to_string()),
        ScriptedCall::Return(ScriptedValue::None),
        ScriptedCall::Return(ScriptedValue::Text("oops".to_string())),
        ScriptedCall::Return(ScriptedValue::Bytes(Vec::new())),
        ScriptedCall::ReturnWithPendingError(
            ScriptedValue::Bytes(vec![1]),
            "late".to_string(),
        ),
        ScriptedCall::Return(ScriptedValue::Bytes(payload.clone())),
    ]));
    let engine = engine_over(&runtime);

    assert!(matches!(
        engine.generate_validation_data(),
        Err(BridgeError::NullResult { .. })
    ));
    assert!(matches!(
        engine.generate_validation_data(),
        Err(BridgeError::TypeMismatch { ref actual }) if actual == "NoneType"
    ));
    assert!(matches!(
        engine.generate_validation_data(),
        Err(BridgeError::TypeMismatch { ref actual }) if actual == "str"
    ));
    assert!(matches!(
        engine.generate_validation_data(),
        Err(BridgeError::EmptyValidationData)
    ));
    assert!(matches!(
        engine.generate_validation_data(),
        Err(BridgeError::PendingRuntimeError { .. })
    ));

    let data = engine.generate_validation_data().unwrap();
    assert_eq!(data.as_bytes(), payload.as_slice());
}
