//! ML-KEM (FIPS 203) through the RustCrypto `ml-kem` crate.
//!
//! Benchmarked next to the PQClean Kyber bindings so the pure-Rust
//! implementation of the final standard can be compared with the round-3 C
//! code at identical artifact sizes.

use std::marker::PhantomData;

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, KemCore};
use rand::rngs::OsRng;

use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{KemPrimitive, NativeResource};
use kembench_core::types::{KeyLengths, OperationKind};

pub use ml_kem::{MlKem1024, MlKem512, MlKem768};

/// An ML-KEM parameter set `K` exposed as a [`KemPrimitive`].
pub struct MlKemPrimitive<K> {
    name: &'static str,
    lengths: KeyLengths,
    released: bool,
    _kem: PhantomData<fn() -> K>,
}

impl<K: KemCore> MlKemPrimitive<K> {
    /// Creates a primitive named `name` with the parameter set's encoded sizes.
    pub fn new(name: &'static str, lengths: KeyLengths) -> Self {
        Self {
            name,
            lengths,
            released: false,
            _kem: PhantomData,
        }
    }

    fn fail(&self, operation: OperationKind, reason: impl std::fmt::Debug) -> BenchError {
        BenchError::native(self.name, operation, format!("{:?}", reason))
    }
}

impl<K: KemCore> NativeResource for MlKemPrimitive<K> {
    fn key_lengths(&self) -> KeyLengths {
        self.lengths
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let (dk, ek) = K::generate(&mut OsRng);
        Ok((ek.as_bytes().to_vec(), dk.as_bytes().to_vec()))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl<K: KemCore> KemPrimitive for MlKemPrimitive<K> {
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let encoded = Encoded::<K::EncapsulationKey>::try_from(public_key)
            .map_err(|e| self.fail(OperationKind::Encapsulate, e))?;
        let ek = K::EncapsulationKey::from_bytes(&encoded);

        let (ct, ss) = ek
            .encapsulate(&mut OsRng)
            .map_err(|_| self.fail(OperationKind::Encapsulate, "encapsulation rejected"))?;
        Ok((ct.to_vec(), ss.to_vec()))
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        let ct = Ciphertext::<K>::try_from(ciphertext)
            .map_err(|e| self.fail(OperationKind::Decapsulate, e))?;
        let encoded = Encoded::<K::DecapsulationKey>::try_from(secret_key)
            .map_err(|e| self.fail(OperationKind::Decapsulate, e))?;
        let dk = K::DecapsulationKey::from_bytes(&encoded);

        let ss = dk
            .decapsulate(&ct)
            .map_err(|_| self.fail(OperationKind::Decapsulate, "decapsulation rejected"))?;
        Ok(ss.to_vec())
    }
}

impl<K> std::fmt::Debug for MlKemPrimitive<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MlKemPrimitive")
            .field("name", &self.name)
            .field("released", &self.released)
            .finish()
    }
}
