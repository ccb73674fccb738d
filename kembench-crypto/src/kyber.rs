//! Kyber (CRYSTALS-Kyber round 3) key encapsulation.
//!
//! This module wraps the `pqcrypto-kyber` crate (PQClean C implementations)
//! behind the [`KemPrimitive`] boundary. One [`KyberPrimitive`] serves all
//! three parameter sets; the level is picked at construction.
//!
//! ## References
//!
//! - NIST FIPS 203: ML-KEM specification
//! - pqcrypto-kyber: https://crates.io/crates/pqcrypto-kyber

use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};

use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{KemPrimitive, NativeResource};
use kembench_core::types::{KeyLengths, OperationKind};

/// Kyber parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KyberLevel {
    /// NIST level 1.
    Kyber512,
    /// NIST level 3.
    Kyber768,
    /// NIST level 5.
    Kyber1024,
}

impl KyberLevel {
    /// Canonical variant name.
    pub fn name(self) -> &'static str {
        match self {
            KyberLevel::Kyber512 => "Kyber512",
            KyberLevel::Kyber768 => "Kyber768",
            KyberLevel::Kyber1024 => "Kyber1024",
        }
    }
}

/// Runs `$body` with `$m` bound to the pqcrypto module for `$level`.
macro_rules! with_kyber {
    ($level:expr, $m:ident => $body:expr) => {
        match $level {
            KyberLevel::Kyber512 => {
                use pqcrypto_kyber::kyber512 as $m;
                $body
            }
            KyberLevel::Kyber768 => {
                use pqcrypto_kyber::kyber768 as $m;
                $body
            }
            KyberLevel::Kyber1024 => {
                use pqcrypto_kyber::kyber1024 as $m;
                $body
            }
        }
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIMITIVE
// ═══════════════════════════════════════════════════════════════════════════════

/// A Kyber parameter set exposed as a [`KemPrimitive`].
#[derive(Debug)]
pub struct KyberPrimitive {
    level: KyberLevel,
    released: bool,
}

impl KyberPrimitive {
    /// Creates a primitive for `level`.
    pub fn new(level: KyberLevel) -> Self {
        Self {
            level,
            released: false,
        }
    }

    /// The parameter set.
    pub fn level(&self) -> KyberLevel {
        self.level
    }

    fn fail(&self, operation: OperationKind, reason: impl std::fmt::Debug) -> BenchError {
        BenchError::native(self.level.name(), operation, format!("{:?}", reason))
    }
}

impl NativeResource for KyberPrimitive {
    fn key_lengths(&self) -> KeyLengths {
        with_kyber!(self.level, m => KeyLengths::new(
            m::public_key_bytes(),
            m::secret_key_bytes(),
            m::ciphertext_bytes(),
            m::shared_secret_bytes(),
        ))
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        with_kyber!(self.level, m => {
            let (pk, sk) = m::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        })
    }

    fn release(&mut self) {
        // PQClean keeps no per-instance state; only the flag matters
        self.released = true;
    }
}

impl KemPrimitive for KyberPrimitive {
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        with_kyber!(self.level, m => {
            let pk = m::PublicKey::from_bytes(public_key)
                .map_err(|e| self.fail(OperationKind::Encapsulate, e))?;
            let (ss, ct) = m::encapsulate(&pk);
            Ok((ct.as_bytes().to_vec(), ss.as_bytes().to_vec()))
        })
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        with_kyber!(self.level, m => {
            let ct = m::Ciphertext::from_bytes(ciphertext)
                .map_err(|e| self.fail(OperationKind::Decapsulate, e))?;
            let sk = m::SecretKey::from_bytes(secret_key)
                .map_err(|e| self.fail(OperationKind::Decapsulate, e))?;
            let ss = m::decapsulate(&ct, &sk);
            Ok(ss.as_bytes().to_vec())
        })
    }
}
