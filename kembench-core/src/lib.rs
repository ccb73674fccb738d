//! # KEMBENCH Core
//!
//! Core types, errors, and traits for the KEMBENCH benchmarking harness.
//!
//! This crate provides the foundational building blocks used by all other
//! KEMBENCH crates:
//!
//! - **Types**: Variants, key material, timing samples and benchmark results
//! - **Errors**: The benchmark error taxonomy
//! - **Constants**: Artifact sizes and run defaults
//! - **Traits**: The boundary to primitive providers
//!
//! ## Example
//!
//! ```rust
//! use kembench_core::{AlgorithmVariant, KeyLengths, OperationFamily};
//!
//! let variant = AlgorithmVariant::new(
//!     "ToyKEM512",
//!     OperationFamily::Kem,
//!     KeyLengths::new(32, 32, 32, 16),
//! );
//! assert_eq!(variant.family.operations()[0].label(), "KeyGen");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{BenchError, Result};
pub use traits::*;
pub use types::*;
