//! Uniform operations over one resolved primitive.
//!
//! The adapter exclusively owns its [`NativeHandle`]. Declared lengths are
//! read once at construction and every input is checked against them before
//! the handle is touched; every output is checked after it returns.

use tracing::debug;

use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{
    DecryptionKey, EncryptionPrimitive, KemPrimitive, NativeHandle, PrimitiveProvider, ResolvedPrimitive,
};
use kembench_core::types::{
    AlgorithmVariant, Ciphertext, KeyLengths, KeyPair, OperationFamily, OperationKind, PublicKey,
    SecretKey, SharedSecret,
};

/// A secret key loaded once for repeated decryption.
///
/// Only valid with adapters of the variant that prepared it.
pub struct PreparedSecretKey {
    inner: Box<dyn DecryptionKey>,
}

impl std::fmt::Debug for PreparedSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PreparedSecretKey([REDACTED])")
    }
}

/// One algorithm variant behind a validated, disposable handle.
pub struct PrimitiveAdapter {
    variant: AlgorithmVariant,
    handle: Option<NativeHandle>,
}

impl PrimitiveAdapter {
    /// Resolves `name` through `provider` and freezes its declared lengths.
    ///
    /// # Errors
    /// Whatever the provider reports: `UnsupportedAlgorithm` for an unknown
    /// name, `NativeInitFailure` if the handle cannot be created.
    pub fn construct(provider: &dyn PrimitiveProvider, name: &str) -> Result<Self> {
        let resolved = provider.resolve(name)?;
        Ok(Self::from_resolved(resolved))
    }

    /// Wraps an already resolved primitive.
    pub fn from_resolved(resolved: ResolvedPrimitive) -> Self {
        let ResolvedPrimitive { name, handle } = resolved;
        let variant = AlgorithmVariant::new(name, handle.family(), handle.key_lengths());
        debug!(%variant, "adapter constructed");
        Self {
            variant,
            handle: Some(handle),
        }
    }

    /// The variant this adapter serves.
    pub fn variant(&self) -> &AlgorithmVariant {
        &self.variant
    }

    /// Canonical variant name.
    pub fn name(&self) -> &str {
        &self.variant.name
    }

    /// Operation family.
    pub fn family(&self) -> OperationFamily {
        self.variant.family
    }

    /// Declared artifact lengths, frozen at construction.
    pub fn lengths(&self) -> KeyLengths {
        self.variant.lengths
    }

    /// Returns true once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generates a fresh key pair with a new native call.
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        let (public, secret) = self.handle()?.keypair()?;
        let lengths = self.lengths();
        self.check_output(OperationKind::KeyGen, "public key", lengths.public_key, public.len())?;
        self.check_output(OperationKind::KeyGen, "secret key", lengths.secret_key, secret.len())?;
        Ok(KeyPair::new(PublicKey::new(public), SecretKey::new(secret)))
    }

    /// Encapsulates to `public_key`, returning the paired ciphertext and secret.
    pub fn encapsulate(&self, public_key: &PublicKey) -> Result<(Ciphertext, SharedSecret)> {
        let kem = self.kem(OperationKind::Encapsulate)?;
        let lengths = self.lengths();
        self.check_input("public key", lengths.public_key, public_key.len())?;

        let (ciphertext, secret) = kem.encapsulate(public_key.as_bytes())?;
        self.check_output(OperationKind::Encapsulate, "ciphertext", lengths.ciphertext, ciphertext.len())?;
        self.check_output(OperationKind::Encapsulate, "shared secret", lengths.shared_secret, secret.len())?;
        Ok((Ciphertext::new(ciphertext), SharedSecret::new(secret)))
    }

    /// Recovers the shared secret from `ciphertext` with `secret_key`.
    ///
    /// A corrupted ciphertext and a broken primitive both surface as
    /// `NativeOperationFailure`; the adapter does not tell them apart.
    pub fn decapsulate(&self, ciphertext: &Ciphertext, secret_key: &SecretKey) -> Result<SharedSecret> {
        let kem = self.kem(OperationKind::Decapsulate)?;
        let lengths = self.lengths();
        self.check_input("ciphertext", lengths.ciphertext, ciphertext.len())?;
        self.check_input("secret key", lengths.secret_key, secret_key.len())?;

        let secret = kem.decapsulate(ciphertext.as_bytes(), secret_key.as_bytes())?;
        self.check_output(OperationKind::Decapsulate, "shared secret", lengths.shared_secret, secret.len())?;
        Ok(SharedSecret::new(secret))
    }

    /// Encrypts `payload` (exactly the declared plaintext length) to `public_key`.
    pub fn encrypt(&self, public_key: &PublicKey, payload: &[u8]) -> Result<Ciphertext> {
        let pke = self.pke(OperationKind::Encrypt)?;
        let lengths = self.lengths();
        self.check_input("public key", lengths.public_key, public_key.len())?;
        self.check_input("plaintext", lengths.shared_secret, payload.len())?;

        let ciphertext = pke.encrypt(public_key.as_bytes(), payload)?;
        self.check_output(OperationKind::Encrypt, "ciphertext", lengths.ciphertext, ciphertext.len())?;
        Ok(Ciphertext::new(ciphertext))
    }

    /// Decrypts `ciphertext` with `secret_key`.
    pub fn decrypt(&self, ciphertext: &Ciphertext, secret_key: &SecretKey) -> Result<Vec<u8>> {
        let pke = self.pke(OperationKind::Decrypt)?;
        let lengths = self.lengths();
        self.check_input("ciphertext", lengths.ciphertext, ciphertext.len())?;
        self.check_input("secret key", lengths.secret_key, secret_key.len())?;

        let plaintext = pke.decrypt(ciphertext.as_bytes(), secret_key.as_bytes())?;
        self.check_output(OperationKind::Decrypt, "plaintext", lengths.shared_secret, plaintext.len())?;
        Ok(plaintext)
    }

    /// Loads `secret_key` so [`decrypt_prepared`](Self::decrypt_prepared)
    /// skips key parsing.
    pub fn prepare_secret_key(&self, secret_key: &SecretKey) -> Result<PreparedSecretKey> {
        let pke = self.pke(OperationKind::Decrypt)?;
        self.check_input("secret key", self.lengths().secret_key, secret_key.len())?;

        let inner = pke.load_secret_key(secret_key.as_bytes())?;
        Ok(PreparedSecretKey { inner })
    }

    /// Decrypts `ciphertext` with a key from
    /// [`prepare_secret_key`](Self::prepare_secret_key).
    pub fn decrypt_prepared(&self, ciphertext: &Ciphertext, key: &PreparedSecretKey) -> Result<Vec<u8>> {
        self.pke(OperationKind::Decrypt)?;
        let lengths = self.lengths();
        self.check_input("ciphertext", lengths.ciphertext, ciphertext.len())?;

        let plaintext = key.inner.decrypt(ciphertext.as_bytes())?;
        self.check_output(OperationKind::Decrypt, "plaintext", lengths.shared_secret, plaintext.len())?;
        Ok(plaintext)
    }

    /// Releases the native handle. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            debug!(variant = %self.variant.name, "adapter disposed");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle(&self) -> Result<&NativeHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| BenchError::ResourceDisposed(self.variant.name.clone()))
    }

    fn kem(&self, operation: OperationKind) -> Result<&dyn KemPrimitive> {
        match self.handle()? {
            NativeHandle::Kem(kem) => Ok(kem.as_ref()),
            NativeHandle::Encryption(_) => Err(self.unsupported(operation)),
        }
    }

    fn pke(&self, operation: OperationKind) -> Result<&dyn EncryptionPrimitive> {
        match self.handle()? {
            NativeHandle::Encryption(pke) => Ok(pke.as_ref()),
            NativeHandle::Kem(_) => Err(self.unsupported(operation)),
        }
    }

    fn unsupported(&self, operation: OperationKind) -> BenchError {
        BenchError::UnsupportedOperation {
            variant: self.variant.name.clone(),
            operation,
        }
    }

    fn check_input(&self, what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(BenchError::invalid_length(&self.variant.name, what, expected, actual));
        }
        Ok(())
    }

    // A provider returning the wrong size is a native fault, not a caller error
    fn check_output(
        &self,
        operation: OperationKind,
        what: &str,
        expected: usize,
        actual: usize,
    ) -> Result<()> {
        if expected != actual {
            return Err(BenchError::native(
                &self.variant.name,
                operation,
                format!("{} is {} bytes, declared {}", what, actual, expected),
            ));
        }
        Ok(())
    }
}

impl Drop for PrimitiveAdapter {
    fn drop(&mut self) {
        if self.handle.is_some() {
            debug!(variant = %self.variant.name, "adapter released on drop");
            self.dispose();
        }
    }
}

impl std::fmt::Debug for PrimitiveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveAdapter")
            .field("variant", &self.variant.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
