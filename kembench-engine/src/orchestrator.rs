//! Benchmark orchestration.
//!
//! Each requested variant walks the same state machine:
//!
//! ```text
//! Idle → Setup → Verify → TimedRun(KeyGen) → TimedRun(Encaps|Encrypt)
//!      → TimedRun(Decaps|Decrypt) → Report → Idle (next variant) … → Done
//! ```
//!
//! Setup and verification failures end only the current variant. A failing
//! iteration ends only its own timed run, which is still reported with the
//! samples collected so far. Every adapter is disposed before the next
//! variant starts, whatever path was taken.

use std::fmt;
use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use kembench_core::error::{BenchError, Result};
use kembench_core::traits::PrimitiveProvider;
use kembench_core::types::{BenchmarkResult, OperationFamily, OperationKind, VerificationRecord};

use crate::adapter::PrimitiveAdapter;
use crate::pool::{InputPool, PoolEntry};
use crate::stats::StatsCollector;
use crate::verifier::{CorrectnessVerifier, Rejected, VerifiedAdapter};

// ═══════════════════════════════════════════════════════════════════════════════
// STATE & PROGRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Orchestrator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for the next variant.
    Idle,
    /// Resolving the variant and constructing its adapter.
    Setup,
    /// Running the correctness gate.
    Verify,
    /// Timing one operation.
    TimedRun(OperationKind),
    /// Assembling the variant's outcome.
    Report,
    /// All requested variants handled.
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Setup => write!(f, "setup"),
            RunState::Verify => write!(f, "verify"),
            RunState::TimedRun(op) => write!(f, "timing {}", op.label()),
            RunState::Report => write!(f, "report"),
            RunState::Done => write!(f, "done"),
        }
    }
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(RunProgress) + Send + Sync>;

/// Progress information, sent on every state transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunProgress {
    /// Variant being processed (empty once `Done`)
    pub variant: String,
    /// Zero-based index of that variant
    pub variant_index: usize,
    /// Number of variants requested
    pub variant_count: usize,
    /// State just entered
    pub state: RunState,
}

/// Cooperative stop signal, checked between variants.
///
/// An in-flight primitive call is never interrupted.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop before the next variant.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`stop`](Self::stop) was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a variant failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    /// Resolving or constructing the adapter.
    Setup,
    /// The correctness gate.
    Verify,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Setup => write!(f, "setup"),
            FailureStage::Verify => write!(f, "verify"),
        }
    }
}

/// How a variant ended.
#[derive(Debug)]
pub enum VariantStatus {
    /// Verified and timed. Individual runs may still carry an abort reason.
    Completed,
    /// Ended before any timed run.
    Failed {
        /// Stage that failed.
        stage: FailureStage,
        /// The failure.
        error: BenchError,
    },
    /// Not attempted because a stop was requested.
    Skipped,
}

/// Everything reported for one requested variant.
#[derive(Debug)]
pub struct VariantOutcome {
    /// Canonical name when resolved, the requested name otherwise.
    pub variant_name: String,
    /// How the variant ended.
    pub status: VariantStatus,
    /// Verification record, when the gate ran.
    pub verification: Option<VerificationRecord>,
    /// One result per operation, in execution order.
    pub results: Vec<BenchmarkResult>,
}

impl VariantOutcome {
    fn failed(
        variant_name: impl Into<String>,
        stage: FailureStage,
        error: BenchError,
        verification: Option<VerificationRecord>,
    ) -> Self {
        Self {
            variant_name: variant_name.into(),
            status: VariantStatus::Failed { stage, error },
            verification,
            results: Vec::new(),
        }
    }

    fn skipped(variant_name: impl Into<String>) -> Self {
        Self {
            variant_name: variant_name.into(),
            status: VariantStatus::Skipped,
            verification: None,
            results: Vec::new(),
        }
    }

    /// Returns true if the variant was verified and every run is complete.
    pub fn is_success(&self) -> bool {
        matches!(self.status, VariantStatus::Completed) && self.results.iter().all(|r| r.is_complete())
    }

    /// The failure, if the variant ended before timing.
    pub fn failure(&self) -> Option<(FailureStage, &BenchError)> {
        match &self.status {
            VariantStatus::Failed { stage, error } => Some((*stage, error)),
            _ => None,
        }
    }
}

/// The outcome of [`BenchmarkOrchestrator::run_benchmark`].
#[derive(Debug)]
pub struct BenchmarkReport {
    /// Iterations requested per timed run.
    pub iterations: usize,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall time for the whole run.
    pub elapsed: Duration,
    /// One entry per requested variant, in request order.
    pub outcomes: Vec<VariantOutcome>,
}

impl BenchmarkReport {
    /// Every result, in execution order.
    pub fn results(&self) -> impl Iterator<Item = &BenchmarkResult> + '_ {
        self.outcomes.iter().flat_map(|o| o.results.iter())
    }

    /// Variants that failed before timing.
    pub fn failures(&self) -> impl Iterator<Item = (&str, FailureStage, &BenchError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure().map(|(stage, e)| (o.variant_name.as_str(), stage, e)))
    }

    /// Outcome for `name` (case-insensitive).
    pub fn outcome(&self, name: &str) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.variant_name.eq_ignore_ascii_case(name))
    }

    /// Returns true if every variant succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(VariantOutcome::is_success)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ORCHESTRATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Sequences setup, verification, timed runs and reporting.
///
/// Single-threaded by construction: concurrent timing would add scheduler
/// jitter to every sample.
pub struct BenchmarkOrchestrator<'a> {
    provider: &'a dyn PrimitiveProvider,
    verifier: CorrectnessVerifier,
    progress: Option<ProgressCallback>,
    stop: StopHandle,
    state: RunState,
}

impl<'a> BenchmarkOrchestrator<'a> {
    /// Creates an orchestrator drawing primitives from `provider`.
    pub fn new(provider: &'a dyn PrimitiveProvider) -> Self {
        Self {
            provider,
            verifier: CorrectnessVerifier::new(),
            progress: None,
            stop: StopHandle::new(),
            state: RunState::Idle,
        }
    }

    /// Sets the progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Uses `stop` as the cancellation signal.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// A clone of the cancellation signal.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Benchmarks every variant in `variant_names`, in order.
    ///
    /// Never fails as a whole: per-variant failures are reported in the
    /// returned outcomes.
    #[instrument(skip(self, variant_names), fields(variants = variant_names.len()))]
    pub fn run_benchmark<S: AsRef<str>>(&mut self, variant_names: &[S], iterations: usize) -> BenchmarkReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let count = variant_names.len();
        let mut outcomes = Vec::with_capacity(count);

        for (index, name) in variant_names.iter().enumerate() {
            let name = name.as_ref();
            if self.stop.is_stopped() {
                info!(variant = name, "stop requested, skipping");
                outcomes.push(VariantOutcome::skipped(name));
                continue;
            }

            let cursor = Cursor { name, index, count };
            self.transition(cursor, RunState::Idle);
            outcomes.push(self.run_variant(cursor, iterations));
        }

        self.transition(Cursor { name: "", index: count, count }, RunState::Done);

        let report = BenchmarkReport {
            iterations,
            started_at,
            elapsed: start.elapsed(),
            outcomes,
        };
        info!(
            results = report.results().count(),
            failures = report.failures().count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "benchmark complete"
        );
        report
    }

    /// Runs only the correctness gate for `variant_name`.
    ///
    /// Setup failures come back as a failing record, never as an error.
    #[instrument(skip(self))]
    pub fn run_verification(&mut self, variant_name: &str) -> VerificationRecord {
        let cursor = Cursor { name: variant_name, index: 0, count: 1 };
        self.transition(cursor, RunState::Setup);

        let start = Instant::now();
        let adapter = match PrimitiveAdapter::construct(self.provider, variant_name) {
            Ok(adapter) => adapter,
            Err(error) => {
                warn!(variant = variant_name, %error, "setup failed");
                self.transition(cursor, RunState::Done);
                return VerificationRecord::fail(variant_name, error.to_string(), start.elapsed());
            }
        };

        self.transition(cursor, RunState::Verify);
        let record = match self.verifier.verify(adapter) {
            Ok(mut verified) => {
                verified.dispose();
                verified.record().clone()
            }
            Err(rejected) => {
                let Rejected { mut adapter, record, .. } = *rejected;
                adapter.dispose();
                record
            }
        };

        self.transition(cursor, RunState::Done);
        record
    }

    fn run_variant(&mut self, cursor: Cursor<'_>, iterations: usize) -> VariantOutcome {
        info!(variant = cursor.name, iterations, "starting variant");

        self.transition(cursor, RunState::Setup);
        let adapter = match PrimitiveAdapter::construct(self.provider, cursor.name) {
            Ok(adapter) => adapter,
            Err(error) => {
                warn!(variant = cursor.name, %error, "setup failed");
                return VariantOutcome::failed(cursor.name, FailureStage::Setup, error, None);
            }
        };
        let canonical = adapter.name().to_string();
        let cursor = Cursor { name: &canonical, ..cursor };

        self.transition(cursor, RunState::Verify);
        let mut verified = match self.verifier.verify(adapter) {
            Ok(verified) => verified,
            Err(rejected) => {
                let Rejected { mut adapter, error, record } = *rejected;
                adapter.dispose();
                return VariantOutcome::failed(canonical, FailureStage::Verify, error, Some(record));
            }
        };

        let results = self.timed_runs(cursor, &verified, iterations);

        self.transition(cursor, RunState::Report);
        verified.dispose();

        let outcome = VariantOutcome {
            variant_name: canonical,
            status: VariantStatus::Completed,
            verification: Some(verified.record().clone()),
            results,
        };
        info!(
            variant = %outcome.variant_name,
            complete = outcome.is_success(),
            "variant finished"
        );
        outcome
    }

    fn timed_runs(&mut self, cursor: Cursor<'_>, verified: &VerifiedAdapter, iterations: usize) -> Vec<BenchmarkResult> {
        let adapter = verified.adapter();
        let [keygen, forward, inverse] = adapter.family().operations();
        let mut results = Vec::with_capacity(3);

        self.transition(cursor, RunState::TimedRun(keygen));
        let (stats, failure) = measure(keygen, 0..iterations, |_: &usize| adapter.generate_keypair());
        results.push(self.finish(adapter, stats, iterations, failure));

        let pool = match InputPool::prepare(adapter, iterations) {
            Ok(pool) => pool,
            Err(error) => {
                warn!(variant = cursor.name, %error, "input pool preparation failed");
                let reason = format!("input pool preparation failed: {}", error);
                for op in [forward, inverse] {
                    results.push(StatsCollector::new(op).finish(
                        adapter.variant().clone(),
                        iterations,
                        Some(reason.clone()),
                    ));
                }
                return results;
            }
        };

        self.transition(cursor, RunState::TimedRun(forward));
        let (stats, failure) = match adapter.family() {
            OperationFamily::Kem => measure(forward, pool.entries(), |entry: &&PoolEntry| {
                adapter.encapsulate(&entry.keypair.public)
            }),
            OperationFamily::Encryption => measure(forward, pool.entries(), |entry: &&PoolEntry| {
                let payload = entry.payload.as_deref().unwrap_or_default();
                adapter.encrypt(&entry.keypair.public, payload)
            }),
        };
        results.push(self.finish(adapter, stats, iterations, failure));

        self.transition(cursor, RunState::TimedRun(inverse));
        let (stats, failure) = match adapter.family() {
            OperationFamily::Kem => measure(inverse, pool.into_entries(), |entry: &PoolEntry| {
                adapter.decapsulate(&entry.ciphertext, &entry.keypair.secret)
            }),
            OperationFamily::Encryption => measure(inverse, pool.into_entries(), |entry: &PoolEntry| {
                match &entry.decryption_key {
                    Some(key) => adapter.decrypt_prepared(&entry.ciphertext, key),
                    None => adapter.decrypt(&entry.ciphertext, &entry.keypair.secret),
                }
            }),
        };
        results.push(self.finish(adapter, stats, iterations, failure));

        results
    }

    fn finish(
        &self,
        adapter: &PrimitiveAdapter,
        stats: StatsCollector,
        iterations: usize,
        failure: Option<BenchError>,
    ) -> BenchmarkResult {
        let aborted = failure.map(|error| {
            warn!(
                variant = %adapter.name(),
                operation = %stats.operation(),
                samples = stats.len(),
                %error,
                "timed run aborted"
            );
            error.to_string()
        });
        let result = stats.finish(adapter.variant().clone(), iterations, aborted);
        debug!(
            variant = %adapter.name(),
            operation = %result.operation,
            samples = result.samples.len(),
            "timed run finished"
        );
        result
    }

    fn transition(&mut self, cursor: Cursor<'_>, state: RunState) {
        self.state = state;
        debug!(variant = cursor.name, %state, "state transition");
        if let Some(callback) = &self.progress {
            callback(RunProgress {
                variant: cursor.name.to_string(),
                variant_index: cursor.index,
                variant_count: cursor.count,
                state,
            });
        }
    }
}

impl fmt::Debug for BenchmarkOrchestrator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkOrchestrator")
            .field("state", &self.state)
            .field("stopped", &self.stop.is_stopped())
            .finish()
    }
}

/// Which variant the orchestrator is on.
#[derive(Clone, Copy)]
struct Cursor<'n> {
    name: &'n str,
    index: usize,
    count: usize,
}

/// Times `call` once per input, stopping at the first error.
///
/// Only the call itself sits between the two clock reads. Inputs and outputs
/// are dropped after the second read, so zeroizing key material is not
/// measured.
fn measure<I, T, F>(operation: OperationKind, inputs: I, mut call: F) -> (StatsCollector, Option<BenchError>)
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> Result<T>,
{
    let inputs = inputs.into_iter();
    let mut stats = StatsCollector::with_capacity(operation, inputs.size_hint().0);

    for input in inputs {
        let start = Instant::now();
        let output = call(black_box(&input));
        let elapsed = start.elapsed();

        match output {
            Ok(value) => {
                stats.record(elapsed);
                drop(black_box(value));
            }
            Err(error) => return (stats, Some(error)),
        }
    }

    (stats, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_stops_at_first_error() {
        let (stats, failure) = measure(OperationKind::KeyGen, 0..10usize, |&i: &usize| {
            if i == 3 {
                Err(BenchError::native("X", OperationKind::KeyGen, "boom"))
            } else {
                Ok(i)
            }
        });
        assert_eq!(stats.len(), 3);
        assert!(failure.is_some());
    }

    #[test]
    fn test_measure_records_every_success() {
        let (stats, failure) = measure(OperationKind::Encapsulate, vec![1u8, 2, 3], |&b: &u8| Ok(b));
        assert_eq!(stats.len(), 3);
        assert!(failure.is_none());
    }

    #[test]
    fn test_stop_handle_is_shared() {
        let a = StopHandle::new();
        let b = a.clone();
        assert!(!b.is_stopped());
        a.stop();
        assert!(b.is_stopped());
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::TimedRun(OperationKind::Decapsulate).to_string(), "timing Decaps");
        assert_eq!(RunState::Done.to_string(), "done");
    }
}
