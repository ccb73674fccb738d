//! RSA-OAEP (SHA-256) as an encryption-shaped primitive.
//!
//! Keys cross the provider boundary as fixed-length big-endian byte strings so
//! the adapter can validate them like any KEM artifact:
//!
//! ```text
//! public = n                       (k bytes)
//! secret = n || d || p || q        (k + k + k/2 + k/2 bytes)
//! ```
//!
//! where `k` is the modulus size in bytes. The public exponent is always
//! 65537 and is not encoded. Decoding a secret key rebuilds and validates the
//! private key, so callers timing decryption load it once with
//! [`EncryptionPrimitive::load_secret_key`] and reuse the result.

use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use kembench_core::constants::{rsa_encoded_sizes, RSA_PAYLOAD_SIZE, RSA_PUBLIC_EXPONENT};
use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{DecryptionKey, EncryptionPrimitive, NativeResource};
use kembench_core::types::{KeyLengths, OperationKind};

/// RSA with OAEP-SHA256 padding at a fixed modulus size.
#[derive(Debug)]
pub struct RsaOaepPrimitive {
    name: String,
    bits: usize,
    released: bool,
}

impl RsaOaepPrimitive {
    /// Creates a primitive named `name` generating `bits`-bit moduli.
    pub fn new(name: impl Into<String>, bits: usize) -> Self {
        Self {
            name: name.into(),
            bits,
            released: false,
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    fn modulus_bytes(&self) -> usize {
        self.bits / 8
    }

    fn fail(&self, operation: OperationKind, reason: impl std::fmt::Display) -> BenchError {
        BenchError::native(&self.name, operation, reason)
    }

    fn exponent() -> BigUint {
        BigUint::from(RSA_PUBLIC_EXPONENT)
    }

    fn decode_public(&self, bytes: &[u8]) -> Result<RsaPublicKey> {
        let n = BigUint::from_bytes_be(bytes);
        RsaPublicKey::new(n, Self::exponent()).map_err(|e| self.fail(OperationKind::Encrypt, e))
    }

    fn decode_secret(&self, bytes: &[u8]) -> Result<RsaPrivateKey> {
        let k = self.modulus_bytes();
        let half = k / 2;
        if bytes.len() != 3 * k {
            return Err(self.fail(OperationKind::Decrypt, "malformed secret key encoding"));
        }

        let (n, rest) = bytes.split_at(k);
        let (d, rest) = rest.split_at(k);
        let (p, q) = rest.split_at(half);

        RsaPrivateKey::from_components(
            BigUint::from_bytes_be(n),
            Self::exponent(),
            BigUint::from_bytes_be(d),
            vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
        )
        .map_err(|e| self.fail(OperationKind::Decrypt, e))
    }
}

/// Left-pads the big-endian encoding of `value` to exactly `width` bytes.
fn encode_fixed(value: &BigUint, width: usize, out: &mut Vec<u8>) -> bool {
    let raw = value.to_bytes_be();
    if raw.len() > width {
        return false;
    }
    out.resize(out.len() + (width - raw.len()), 0);
    out.extend_from_slice(&raw);
    true
}

impl NativeResource for RsaOaepPrimitive {
    fn key_lengths(&self) -> KeyLengths {
        let (public_key, secret_key, ciphertext) = rsa_encoded_sizes(self.bits);
        KeyLengths::new(public_key, secret_key, ciphertext, RSA_PAYLOAD_SIZE)
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let private = RsaPrivateKey::new(&mut OsRng, self.bits)
            .map_err(|e| self.fail(OperationKind::KeyGen, e))?;

        let primes = private.primes();
        if primes.len() != 2 {
            return Err(self.fail(OperationKind::KeyGen, "expected a two-prime key"));
        }

        let k = self.modulus_bytes();
        let mut public = Vec::with_capacity(k);
        let mut secret = Vec::with_capacity(3 * k);

        let encoded = encode_fixed(private.n(), k, &mut public)
            && encode_fixed(private.n(), k, &mut secret)
            && encode_fixed(private.d(), k, &mut secret)
            && encode_fixed(&primes[0], k / 2, &mut secret)
            && encode_fixed(&primes[1], k / 2, &mut secret);
        if !encoded {
            return Err(self.fail(OperationKind::KeyGen, "key component exceeds its encoded width"));
        }

        Ok((public, secret))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl EncryptionPrimitive for RsaOaepPrimitive {
    fn encrypt(&self, public_key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = self.decode_public(public_key)?;
        key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| self.fail(OperationKind::Encrypt, e))
    }

    fn load_secret_key(&self, secret_key: &[u8]) -> Result<Box<dyn DecryptionKey>> {
        let key = self.decode_secret(secret_key)?;
        Ok(Box::new(LoadedRsaKey {
            name: self.name.clone(),
            key,
        }))
    }
}

/// A decoded private key with its CRT values already computed.
struct LoadedRsaKey {
    name: String,
    key: RsaPrivateKey,
}

impl DecryptionKey for LoadedRsaKey {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.key
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|e| BenchError::native(&self.name, OperationKind::Decrypt, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small modulus keeps key generation fast in unit tests
    fn small() -> RsaOaepPrimitive {
        RsaOaepPrimitive::new("RSA1024", 1024)
    }

    #[test]
    fn test_declared_lengths() {
        let rsa = RsaOaepPrimitive::new("RSA2048", 2048);
        assert_eq!(rsa.key_lengths(), KeyLengths::new(256, 768, 256, 32));
    }

    #[test]
    fn test_generated_lengths_match_declared() {
        let rsa = small();
        let (pk, sk) = rsa.keypair().unwrap();
        assert_eq!(pk.len(), rsa.key_lengths().public_key);
        assert_eq!(sk.len(), rsa.key_lengths().secret_key);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let rsa = small();
        let (pk, sk) = rsa.keypair().unwrap();
        let payload = [7u8; RSA_PAYLOAD_SIZE];

        let ct = rsa.encrypt(&pk, &payload).unwrap();
        assert_eq!(ct.len(), rsa.key_lengths().ciphertext);

        let recovered = rsa.decrypt(&ct, &sk).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn test_oaep_is_randomized() {
        let rsa = small();
        let (pk, _) = rsa.keypair().unwrap();
        let payload = [1u8; RSA_PAYLOAD_SIZE];
        assert_ne!(rsa.encrypt(&pk, &payload).unwrap(), rsa.encrypt(&pk, &payload).unwrap());
    }

    #[test]
    fn test_tampered_ciphertext_is_native_failure() {
        let rsa = small();
        let (pk, sk) = rsa.keypair().unwrap();
        let mut ct = rsa.encrypt(&pk, &[0u8; RSA_PAYLOAD_SIZE]).unwrap();
        ct[10] ^= 0xff;

        let err = rsa.decrypt(&ct, &sk).unwrap_err();
        assert!(matches!(
            err,
            BenchError::NativeOperationFailure { operation: OperationKind::Decrypt, .. }
        ));
    }

    #[test]
    fn test_loaded_key_decrypts_repeatedly() {
        let rsa = small();
        let (pk, sk) = rsa.keypair().unwrap();
        let key = rsa.load_secret_key(&sk).unwrap();

        for byte in [3u8, 4, 5] {
            let payload = [byte; RSA_PAYLOAD_SIZE];
            let ct = rsa.encrypt(&pk, &payload).unwrap();
            assert_eq!(key.decrypt(&ct).unwrap(), payload);
        }
    }

    #[test]
    fn test_malformed_secret_fails_at_load() {
        let rsa = small();
        let err = rsa.load_secret_key(&[0u8; 10]).err().unwrap();
        assert!(matches!(
            err,
            BenchError::NativeOperationFailure { operation: OperationKind::Decrypt, .. }
        ));
    }

    #[test]
    fn test_encode_fixed_pads_left() {
        let mut out = Vec::new();
        assert!(encode_fixed(&BigUint::from(0x0102u32), 4, &mut out));
        assert_eq!(out, vec![0, 0, 1, 2]);
        assert!(!encode_fixed(&BigUint::from(0x010203u32), 2, &mut out));
    }
}
