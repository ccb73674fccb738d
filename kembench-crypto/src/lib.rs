//! # KEMBENCH Primitive Providers
//!
//! Concrete primitives behind the `kembench-core` provider traits.
//!
//! This crate provides:
//!
//! - **Kyber**: round-3 Kyber512/768/1024 via PQClean bindings
//! - **ML-KEM**: FIPS 203 ML-KEM-512/768/1024 in pure Rust
//! - **RSA**: RSA-OAEP-SHA256 at 2048, 3072 and 4096 bits
//! - **ToyKEM512**: an insecure hash-based KEM for fast tests
//! - **Registry**: case-insensitive name lookup producing fresh handles
//! - **Runtime**: explicit, idempotent process-wide initialization
//!
//! ## Example
//!
//! ```rust,no_run
//! use kembench_core::PrimitiveProvider;
//! use kembench_crypto::{runtime, Registry};
//!
//! runtime::initialize()?;
//! let registry = Registry::with_defaults();
//! let resolved = registry.resolve("ML-KEM-768")?;
//! println!("{:?}", resolved.handle.key_lengths());
//! runtime::shutdown();
//! # Ok::<(), kembench_core::BenchError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod hash;
pub mod kyber;
pub mod mlkem;
pub mod registry;
pub mod rsa_oaep;
pub mod runtime;
pub mod toy;

pub use kyber::{KyberLevel, KyberPrimitive};
pub use mlkem::MlKemPrimitive;
pub use registry::{Factory, Registry};
pub use rsa_oaep::RsaOaepPrimitive;
pub use toy::ToyKem;
