//! Variant identity: names, operation families and declared lengths.

use std::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATION FAMILY
// ═══════════════════════════════════════════════════════════════════════════════

/// The capability set a variant exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationFamily {
    /// Key encapsulation: keygen, encapsulate, decapsulate.
    Kem,
    /// Public-key encryption: keygen, encrypt, decrypt.
    Encryption,
}

impl OperationFamily {
    /// The timed operations for this family, in execution order.
    pub fn operations(self) -> [OperationKind; 3] {
        match self {
            OperationFamily::Kem => [
                OperationKind::KeyGen,
                OperationKind::Encapsulate,
                OperationKind::Decapsulate,
            ],
            OperationFamily::Encryption => [
                OperationKind::KeyGen,
                OperationKind::Encrypt,
                OperationKind::Decrypt,
            ],
        }
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            OperationFamily::Kem => "KEM",
            OperationFamily::Encryption => "PKE",
        }
    }
}

impl fmt::Display for OperationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATION KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// One measurable primitive operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Key pair generation.
    KeyGen,
    /// KEM encapsulation.
    Encapsulate,
    /// KEM decapsulation.
    Decapsulate,
    /// Public-key encryption.
    Encrypt,
    /// Public-key decryption.
    Decrypt,
}

impl OperationKind {
    /// Short display label, as used in reports.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::KeyGen => "KeyGen",
            OperationKind::Encapsulate => "Encaps",
            OperationKind::Decapsulate => "Decaps",
            OperationKind::Encrypt => "Encrypt",
            OperationKind::Decrypt => "Decrypt",
        }
    }

    /// True if the operation draws its inputs from an input pool.
    pub fn uses_input_pool(self) -> bool {
        !matches!(self, OperationKind::KeyGen)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY LENGTHS
// ═══════════════════════════════════════════════════════════════════════════════

/// The four fixed byte lengths a variant declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLengths {
    /// Public key length.
    pub public_key: usize,
    /// Secret key length.
    pub secret_key: usize,
    /// Ciphertext length.
    pub ciphertext: usize,
    /// Shared secret length (KEM) or plaintext length (encryption).
    pub shared_secret: usize,
}

impl KeyLengths {
    /// Creates a length table.
    pub const fn new(
        public_key: usize,
        secret_key: usize,
        ciphertext: usize,
        shared_secret: usize,
    ) -> Self {
        Self {
            public_key,
            secret_key,
            ciphertext,
            shared_secret,
        }
    }

    /// Bytes held by one input pool entry (public + secret + ciphertext).
    pub fn pool_entry_bytes(&self) -> usize {
        self.public_key + self.secret_key + self.ciphertext
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ALGORITHM VARIANT
// ═══════════════════════════════════════════════════════════════════════════════

/// One named algorithm configuration with frozen artifact lengths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmVariant {
    /// Canonical variant name (e.g. `Kyber768`, `RSA2048`).
    pub name: String,
    /// Operation family.
    pub family: OperationFamily,
    /// Declared artifact lengths.
    pub lengths: KeyLengths,
}

impl AlgorithmVariant {
    /// Creates a variant description.
    pub fn new(name: impl Into<String>, family: OperationFamily, lengths: KeyLengths) -> Self {
        Self {
            name: name.into(),
            family,
            lengths,
        }
    }
}

impl fmt::Display for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] pk={}B sk={}B ct={}B ss={}B",
            self.name,
            self.family,
            self.lengths.public_key,
            self.lengths.secret_key,
            self.lengths.ciphertext,
            self.lengths.shared_secret
        )
    }
}
