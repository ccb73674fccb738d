//! Domain types for KEMBENCH.
//!
//! - [`AlgorithmVariant`]: Variant name, family and declared lengths
//! - [`KeyPair`], [`Ciphertext`], [`SharedSecret`]: Primitive artifacts
//! - [`TimingSample`], [`BenchmarkResult`]: Measurements
//! - [`VerificationRecord`]: Correctness gate outcome

mod keys;
mod results;
mod variant;

pub use keys::*;
pub use results::*;
pub use variant::*;
