//! # KEMBENCH Engine
//!
//! Correctness-gated benchmarking over any [`PrimitiveProvider`].
//!
//! ## Features
//!
//! - **Adapter**: uniform, length-validated operations over one native handle
//! - **Correctness Gate**: a round trip per variant before anything is timed
//! - **Input Pool**: keys and ciphertexts generated before the clock starts
//! - **Statistics**: mean, median, min and max per operation
//! - **Orchestration**: per-variant failure isolation, progress, cancellation
//!
//! ## Example
//!
//! ```rust,ignore
//! use kembench_crypto::{runtime, Registry};
//! use kembench_engine::BenchmarkOrchestrator;
//!
//! runtime::initialize()?;
//! let registry = Registry::with_toy();
//! let report = BenchmarkOrchestrator::new(&registry).run_benchmark(&["ToyKEM512"], 5);
//!
//! for result in report.results() {
//!     println!("{} {}: {:?}", result.variant.name, result.operation, result.summary);
//! }
//! ```
//!
//! [`PrimitiveProvider`]: kembench_core::PrimitiveProvider

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod adapter;
pub mod config;
pub mod orchestrator;
pub mod pool;
pub mod stats;
pub mod verifier;

pub use adapter::{PreparedSecretKey, PrimitiveAdapter};
pub use config::BenchConfig;
pub use orchestrator::{
    BenchmarkOrchestrator, BenchmarkReport, FailureStage, ProgressCallback, RunProgress, RunState,
    StopHandle, VariantOutcome, VariantStatus,
};
pub use pool::{InputPool, PoolEntry};
pub use stats::{summarize_durations, StatsCollector};
pub use verifier::{CorrectnessVerifier, Rejected, VerifiedAdapter};
