//! Concurrent callers must serialize on the runtime's one global lock.

use std::sync::Arc;
use std::thread;

use nacbridge_core::{BridgeConfig, ScriptedRuntime, ValidationEngine};

const THREADS: usize = 8;
const CALLS_PER_THREAD: usize = 32;

#[test]
fn test_parallel_generation_never_overlaps() {
    let payload = vec![0xC3; 64];
    let runtime = Arc::new(ScriptedRuntime::returning_bytes(payload.clone()));
    let engine = ValidationEngine::with_runtime(BridgeConfig::default(), runtime.clone());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..CALLS_PER_THREAD {
                    let data = engine.generate_validation_data().unwrap();
                    assert_eq!(data.as_bytes(), payload.as_slice());
                }
            });
        }
    });

    let total = THREADS * CALLS_PER_THREAD;
    assert_eq!(runtime.acquisitions(), total);
    assert_eq!(runtime.invocations(), total);
    // The whole point: no two exclusive sections ever ran at once.
    assert_eq!(runtime.overlaps(), 0);
    assert_eq!(runtime.active_sections(), 0);
    assert_eq!(runtime.handles_created(), total);
    assert_eq!(runtime.handles_released(), total);
}

#[test]
fn test_shared_engine_is_sync() {
    fn assert_sync<T: Sync + Send>() {}
    assert_sync::<ValidationEngine>();
}
