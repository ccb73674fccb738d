//! Process-wide provider runtime.
//!
//! Call [`initialize`] once at process start and [`shutdown`] before exit.
//! Both are idempotent and safe to race: the state lives behind one mutex, and
//! a relaxed atomic mirrors it for the hot `is_initialized` check made on
//! every registry lookup.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{const_mutex, Mutex};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, info};

use kembench_core::error::{BenchError, Result};

struct RuntimeState {
    initialized: bool,
    initializations: u64,
}

static STATE: Mutex<RuntimeState> = const_mutex(RuntimeState {
    initialized: false,
    initializations: 0,
});

static READY: AtomicBool = AtomicBool::new(false);

/// Initializes the provider runtime.
///
/// Checks that the OS entropy source answers before any key is generated.
/// Calling this again after a successful initialization is a no-op.
///
/// # Errors
/// `NativeInitFailure` if the entropy source is unavailable.
pub fn initialize() -> Result<()> {
    let mut state = STATE.lock();
    if state.initialized {
        debug!("runtime already initialized");
        return Ok(());
    }

    let mut probe = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut probe)
        .map_err(|e| BenchError::NativeInitFailure(format!("entropy source unavailable: {}", e)))?;

    state.initialized = true;
    state.initializations += 1;
    READY.store(true, Ordering::Release);

    info!(count = state.initializations, "provider runtime initialized");
    Ok(())
}

/// Shuts the provider runtime down. A no-op when not initialized.
pub fn shutdown() {
    let mut state = STATE.lock();
    if !state.initialized {
        return;
    }
    state.initialized = false;
    READY.store(false, Ordering::Release);
    info!("provider runtime shut down");
}

/// Returns true between [`initialize`] and [`shutdown`].
pub fn is_initialized() -> bool {
    READY.load(Ordering::Acquire)
}

/// How many times the runtime has gone from uninitialized to initialized.
pub fn initialization_count() -> u64 {
    STATE.lock().initializations
}

/// Fails with `NativeInitFailure` unless the runtime is initialized.
pub fn ensure_initialized() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(BenchError::NativeInitFailure(
            "provider runtime not initialized; call runtime::initialize() first".into(),
        ))
    }
}

/// Scoped runtime: initializes on creation, shuts down on drop.
#[derive(Debug)]
pub struct RuntimeGuard {
    _private: (),
}

impl RuntimeGuard {
    /// Initializes the runtime and returns a guard that shuts it down.
    pub fn acquire() -> Result<Self> {
        initialize()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shutdown is covered by tests/runtime_lifecycle.rs, which runs in its own
    // process; unit tests in this crate only ever initialize.

    #[test]
    fn test_initialize_is_idempotent() {
        initialize().unwrap();
        let count = initialization_count();
        initialize().unwrap();
        assert!(is_initialized());
        assert_eq!(initialization_count(), count);
        assert!(ensure_initialized().is_ok());
    }

    #[test]
    fn test_concurrent_initialize() {
        let handles: Vec<_> = (0..8).map(|_| std::thread::spawn(initialize)).collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert!(is_initialized());
        assert_eq!(initialization_count(), 1);
    }
}
