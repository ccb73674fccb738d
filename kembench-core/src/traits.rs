//! Provider boundary traits for KEMBENCH.
//!
//! A provider resolves a variant name to a native handle. The handle is either
//! KEM-shaped or encryption-shaped; both expose key generation and an
//! idempotent release. The engine wraps the handle in an adapter that owns it
//! exclusively and validates every byte length before calling into it.

use crate::error::Result;
use crate::types::{KeyLengths, OperationFamily};

// ═══════════════════════════════════════════════════════════════════════════════
// NATIVE RESOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Capabilities shared by every native primitive.
pub trait NativeResource: Send {
    /// The four fixed artifact lengths. Read once by the adapter.
    fn key_lengths(&self) -> KeyLengths;

    /// Generates a fresh `(public, secret)` key pair.
    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)>;

    /// Releases the native resource.
    ///
    /// Must be idempotent: calling it after a previous release is a no-op.
    fn release(&mut self);
}

/// A key-encapsulation primitive.
pub trait KemPrimitive: NativeResource {
    /// Returns `(ciphertext, shared_secret)` for `public_key`.
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)>;

    /// Recovers the shared secret from `ciphertext` with `secret_key`.
    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Vec<u8>>;
}

/// A public-key encryption primitive.
pub trait EncryptionPrimitive: NativeResource {
    /// Encrypts `plaintext` to `public_key`.
    fn encrypt(&self, public_key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Parses `secret_key` into the primitive's native key form.
    ///
    /// Validation and any precomputation happen here, once, so that
    /// [`DecryptionKey::decrypt`] is the bare decryption.
    fn load_secret_key(&self, secret_key: &[u8]) -> Result<Box<dyn DecryptionKey>>;

    /// Decrypts `ciphertext` with `secret_key`, loading the key on every call.
    fn decrypt(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        self.load_secret_key(secret_key)?.decrypt(ciphertext)
    }
}

/// A secret key already loaded by an [`EncryptionPrimitive`].
pub trait DecryptionKey: Send {
    /// Decrypts `ciphertext`.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// NATIVE HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

/// An owned native primitive, tagged by capability set.
pub enum NativeHandle {
    /// KEM-shaped primitive.
    Kem(Box<dyn KemPrimitive>),
    /// Encryption-shaped primitive.
    Encryption(Box<dyn EncryptionPrimitive>),
}

impl NativeHandle {
    /// The operation family of the wrapped primitive.
    pub fn family(&self) -> OperationFamily {
        match self {
            NativeHandle::Kem(_) => OperationFamily::Kem,
            NativeHandle::Encryption(_) => OperationFamily::Encryption,
        }
    }

    /// Declared lengths of the wrapped primitive.
    pub fn key_lengths(&self) -> KeyLengths {
        match self {
            NativeHandle::Kem(p) => p.key_lengths(),
            NativeHandle::Encryption(p) => p.key_lengths(),
        }
    }

    /// Generates a key pair through the wrapped primitive.
    pub fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        match self {
            NativeHandle::Kem(p) => p.keypair(),
            NativeHandle::Encryption(p) => p.keypair(),
        }
    }

    /// Releases the wrapped primitive.
    pub fn release(&mut self) {
        match self {
            NativeHandle::Kem(p) => p.release(),
            NativeHandle::Encryption(p) => p.release(),
        }
    }
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeHandle")
            .field("family", &self.family())
            .field("lengths", &self.key_lengths())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved variant: its canonical name and a fresh native handle.
#[derive(Debug)]
pub struct ResolvedPrimitive {
    /// Canonical variant name (the requested name may differ in case).
    pub name: String,
    /// Exclusively owned native handle.
    pub handle: NativeHandle,
}

/// Interface for primitive providers.
///
/// Implementations might be:
/// - The bundled registry (Kyber, ML-KEM, RSA-OAEP)
/// - Test doubles that count native calls
pub trait PrimitiveProvider: Send + Sync {
    /// Resolves `name` to a new native handle.
    ///
    /// # Errors
    /// `UnsupportedAlgorithm` if the name is unknown; `NativeInitFailure` if
    /// the provider cannot create the handle.
    fn resolve(&self, name: &str) -> Result<ResolvedPrimitive>;

    /// Canonical names of every resolvable variant.
    fn variant_names(&self) -> Vec<String>;
}
