//! Pre-generated inputs for the timed runs.
//!
//! Every entry is built before the clock starts. Encapsulate/encrypt
//! iteration `i` borrows entry `i`; decapsulate/decrypt iteration `i` takes
//! ownership of entry `i`, so no entry ever feeds two iterations of the same
//! run and ciphertext `i` is always paired with its own secret key.
//! Encryption entries also carry their secret key already loaded, so the
//! decrypt run never pays for key parsing.

use rand::RngCore;
use tracing::debug;

use kembench_core::error::Result;
use kembench_core::types::{Ciphertext, KeyPair, OperationFamily};

use crate::adapter::{PreparedSecretKey, PrimitiveAdapter};

/// One iteration's worth of input.
#[derive(Debug)]
pub struct PoolEntry {
    /// Independent key pair for this entry.
    pub keypair: KeyPair,
    /// Ciphertext produced from this entry's public key.
    pub ciphertext: Ciphertext,
    /// Encryption family only: the plaintext that `ciphertext` encrypts.
    pub payload: Option<Vec<u8>>,
    /// Encryption family only: `keypair.secret`, loaded for decryption.
    pub decryption_key: Option<PreparedSecretKey>,
}

/// Inputs for `count` timed iterations.
#[derive(Debug)]
pub struct InputPool {
    family: OperationFamily,
    entries: Vec<PoolEntry>,
}

impl InputPool {
    /// Generates `count` key pairs and one ciphertext from each.
    ///
    /// For KEMs the paired shared secret is discarded here; for encryption
    /// a random payload of the declared plaintext length is kept so the
    /// encrypt run can reuse it, and the secret key is loaded.
    pub fn prepare(adapter: &PrimitiveAdapter, count: usize) -> Result<Self> {
        let family = adapter.family();
        let mut rng = rand::thread_rng();
        let mut entries = Vec::with_capacity(count);

        for _ in 0..count {
            let keypair = adapter.generate_keypair()?;
            let entry = match family {
                OperationFamily::Kem => {
                    let (ciphertext, _secret) = adapter.encapsulate(&keypair.public)?;
                    PoolEntry {
                        keypair,
                        ciphertext,
                        payload: None,
                        decryption_key: None,
                    }
                }
                OperationFamily::Encryption => {
                    let mut payload = vec![0u8; adapter.lengths().shared_secret];
                    rng.fill_bytes(&mut payload);
                    let ciphertext = adapter.encrypt(&keypair.public, &payload)?;
                    let decryption_key = adapter.prepare_secret_key(&keypair.secret)?;
                    PoolEntry {
                        keypair,
                        ciphertext,
                        payload: Some(payload),
                        decryption_key: Some(decryption_key),
                    }
                }
            };
            entries.push(entry);
        }

        let pool = Self { family, entries };
        debug!(variant = %adapter.name(), count, bytes = pool.memory_bytes(), "input pool prepared");
        Ok(pool)
    }

    /// Family the entries were prepared for.
    pub fn family(&self) -> OperationFamily {
        self.family
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the pool holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in preparation order, for borrowing runs.
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    /// Hands each entry to exactly one consuming iteration.
    pub fn into_entries(self) -> std::vec::IntoIter<PoolEntry> {
        self.entries.into_iter()
    }

    /// Approximate bytes held: keys, ciphertexts and payloads.
    pub fn memory_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|e| {
                e.keypair.public.len()
                    + e.keypair.secret.len()
                    + e.ciphertext.len()
                    + e.payload.as_ref().map_or(0, Vec::len)
            })
            .sum()
    }
}
