//! ToyKEM512: a deliberately insecure hash-based KEM.
//!
//! It exists so the engine can be exercised end to end in milliseconds with
//! small, easy-to-inspect artifacts. It offers no security whatsoever: anyone
//! holding the public key can unmask the ciphertext.
//!
//! ```text
//! keygen:  sk = random(32)
//!          pk = SHAKE256(DOMAIN_TOY_PUBLIC, sk, 32)
//! encaps:  r  = random(32)
//!          ct = r XOR SHAKE256(DOMAIN_TOY_MASK, pk, 32)
//!          ss = SHAKE256(DOMAIN_TOY_SECRET, pk || r, 16)
//! decaps:  pk = SHAKE256(DOMAIN_TOY_PUBLIC, sk, 32)
//!          r  = ct XOR SHAKE256(DOMAIN_TOY_MASK, pk, 32)
//!          ss = SHAKE256(DOMAIN_TOY_SECRET, pk || r, 16)
//! ```

use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use kembench_core::constants::*;
use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{KemPrimitive, NativeResource};
use kembench_core::types::{KeyLengths, OperationKind};

use crate::hash::{shake256, shake256_multi};

/// The toy KEM. Randomness comes from an internal ChaCha20 stream.
#[derive(Debug)]
pub struct ToyKem {
    rng: Mutex<ChaCha20Rng>,
    released: bool,
}

impl ToyKem {
    /// Creates a toy KEM seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(ChaCha20Rng::from_entropy())
    }

    /// Creates a toy KEM with a reproducible random stream.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha20Rng) -> Self {
        Self {
            rng: Mutex::new(rng),
            released: false,
        }
    }

    fn random_32(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.rng.lock().fill_bytes(&mut bytes);
        bytes
    }

    fn check(&self, operation: OperationKind, what: &str, bytes: &[u8], expected: usize) -> Result<()> {
        if bytes.len() != expected {
            return Err(BenchError::native(
                TOY_KEM_NAME,
                operation,
                format!("{} must be {} bytes, got {}", what, expected, bytes.len()),
            ));
        }
        Ok(())
    }
}

impl Default for ToyKem {
    fn default() -> Self {
        Self::new()
    }
}

fn xor_mask(data: &[u8], mask: &[u8]) -> Vec<u8> {
    data.iter().zip(mask).map(|(d, m)| d ^ m).collect()
}

impl NativeResource for ToyKem {
    fn key_lengths(&self) -> KeyLengths {
        KeyLengths::new(
            TOY_PUBLIC_KEY_SIZE,
            TOY_SECRET_KEY_SIZE,
            TOY_CIPHERTEXT_SIZE,
            TOY_SHARED_SECRET_SIZE,
        )
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let secret = self.random_32().to_vec();
        let public = shake256(DOMAIN_TOY_PUBLIC, &secret, TOY_PUBLIC_KEY_SIZE);
        Ok((public, secret))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl KemPrimitive for ToyKem {
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        self.check(OperationKind::Encapsulate, "public key", public_key, TOY_PUBLIC_KEY_SIZE)?;

        let r = self.random_32();
        let mask = shake256(DOMAIN_TOY_MASK, public_key, TOY_CIPHERTEXT_SIZE);
        let ciphertext = xor_mask(&r, &mask);
        let shared = shake256_multi(DOMAIN_TOY_SECRET, &[public_key, &r[..]], TOY_SHARED_SECRET_SIZE);

        Ok((ciphertext, shared))
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        self.check(OperationKind::Decapsulate, "ciphertext", ciphertext, TOY_CIPHERTEXT_SIZE)?;
        self.check(OperationKind::Decapsulate, "secret key", secret_key, TOY_SECRET_KEY_SIZE)?;

        let public = shake256(DOMAIN_TOY_PUBLIC, secret_key, TOY_PUBLIC_KEY_SIZE);
        let mask = shake256(DOMAIN_TOY_MASK, &public, TOY_CIPHERTEXT_SIZE);
        let r = xor_mask(ciphertext, &mask);

        Ok(shake256_multi(DOMAIN_TOY_SECRET, &[&public[..], &r[..]], TOY_SHARED_SECRET_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_declared_lengths() {
        let kem = ToyKem::new();
        assert_eq!(kem.key_lengths(), KeyLengths::new(32, 32, 32, 16));
    }

    #[test]
    fn test_roundtrip() {
        let kem = ToyKem::new();
        let (pk, sk) = kem.keypair().unwrap();
        let (ct, sender) = kem.encapsulate(&pk).unwrap();
        assert_eq!(ct.len(), TOY_CIPHERTEXT_SIZE);
        assert_eq!(sender.len(), TOY_SHARED_SECRET_SIZE);
        assert_eq!(kem.decapsulate(&ct, &sk).unwrap(), sender);
    }

    #[test]
    fn test_seeded_stream_is_reproducible() {
        let a = ToyKem::with_seed(42);
        let b = ToyKem::with_seed(42);
        assert_eq!(a.keypair().unwrap(), b.keypair().unwrap());

        let c = ToyKem::with_seed(43);
        assert_ne!(a.keypair().unwrap().1, c.keypair().unwrap().1);
    }

    #[test]
    fn test_wrong_secret_key_gives_different_secret() {
        let kem = ToyKem::with_seed(7);
        let (pk, _) = kem.keypair().unwrap();
        let (_, other_sk) = kem.keypair().unwrap();
        let (ct, sender) = kem.encapsulate(&pk).unwrap();
        assert_ne!(kem.decapsulate(&ct, &other_sk).unwrap(), sender);
    }

    #[test]
    fn test_bad_length_is_native_failure() {
        let kem = ToyKem::new();
        let err = kem.encapsulate(&[0u8; 31]).unwrap_err();
        assert!(matches!(err, BenchError::NativeOperationFailure { .. }));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_for_any_seed(seed in any::<u64>()) {
            let kem = ToyKem::with_seed(seed);
            let (pk, sk) = kem.keypair().unwrap();
            let (ct, sender) = kem.encapsulate(&pk).unwrap();
            prop_assert_eq!(kem.decapsulate(&ct, &sk).unwrap(), sender);
        }
    }
}
