//! Correctness gate.
//!
//! One full round trip per variant before anything is timed. The only way to
//! obtain a [`VerifiedAdapter`] is to pass this gate, and the timed phase only
//! accepts a `VerifiedAdapter`.

use std::time::Instant;

use rand::RngCore;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use kembench_core::error::{BenchError, Result};
use kembench_core::types::{OperationFamily, VerificationRecord};

use crate::adapter::PrimitiveAdapter;

/// An adapter that has passed the correctness gate.
#[derive(Debug)]
pub struct VerifiedAdapter {
    adapter: PrimitiveAdapter,
    record: VerificationRecord,
}

impl VerifiedAdapter {
    /// The verified adapter.
    pub fn adapter(&self) -> &PrimitiveAdapter {
        &self.adapter
    }

    /// The passing verification record.
    pub fn record(&self) -> &VerificationRecord {
        &self.record
    }

    /// Releases the underlying native handle.
    pub fn dispose(&mut self) {
        self.adapter.dispose();
    }
}

/// An adapter that failed the gate, handed back so the caller can dispose it.
#[derive(Debug)]
pub struct Rejected {
    /// The adapter that failed.
    pub adapter: PrimitiveAdapter,
    /// Why it failed.
    pub error: BenchError,
    /// The failing record.
    pub record: VerificationRecord,
}

/// Runs the round-trip check.
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrectnessVerifier;

impl CorrectnessVerifier {
    /// Creates a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Verifies `adapter`, consuming it.
    ///
    /// Never retried: a mismatch is a correctness failure, not a transient
    /// error.
    pub fn verify(&self, adapter: PrimitiveAdapter) -> std::result::Result<VerifiedAdapter, Box<Rejected>> {
        let start = Instant::now();
        let outcome = round_trip(&adapter);
        let elapsed = start.elapsed();

        match outcome {
            Ok(secret_len) => {
                let record = VerificationRecord::pass(
                    adapter.name(),
                    format!("round trip ok: {}-byte secrets match", secret_len),
                    elapsed,
                );
                debug!(variant = %adapter.name(), ?elapsed, "verification passed");
                Ok(VerifiedAdapter { adapter, record })
            }
            Err(error) => {
                warn!(variant = %adapter.name(), %error, "verification failed");
                let record = VerificationRecord::fail(adapter.name(), error.to_string(), elapsed);
                Err(Box::new(Rejected {
                    adapter,
                    error,
                    record,
                }))
            }
        }
    }
}

/// Keygen, forward, inverse, compare. Returns the compared length.
fn round_trip(adapter: &PrimitiveAdapter) -> Result<usize> {
    let keypair = adapter.generate_keypair()?;

    let (sent, received) = match adapter.family() {
        OperationFamily::Kem => {
            let (ciphertext, sent) = adapter.encapsulate(&keypair.public)?;
            let received = adapter.decapsulate(&ciphertext, &keypair.secret)?;
            (sent.as_bytes().to_vec(), received.as_bytes().to_vec())
        }
        OperationFamily::Encryption => {
            let mut payload = vec![0u8; adapter.lengths().shared_secret];
            rand::thread_rng().fill_bytes(&mut payload);
            let ciphertext = adapter.encrypt(&keypair.public, &payload)?;
            let received = adapter.decrypt(&ciphertext, &keypair.secret)?;
            (payload, received)
        }
    };

    if !bool::from(sent.as_slice().ct_eq(received.as_slice())) {
        return Err(BenchError::VerificationMismatch {
            variant: adapter.name().to_string(),
            detail: format!(
                "sender and receiver secrets differ ({} vs {} bytes)",
                sent.len(),
                received.len()
            ),
        });
    }

    Ok(sent.len())
}
