//! Test doubles shared by the engine integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kembench_core::{
    BenchError, DecryptionKey, EncryptionPrimitive, KemPrimitive, KeyLengths, NativeHandle, NativeResource,
    OperationFamily, OperationKind, Result,
};
use kembench_crypto::{runtime, Registry};

/// Counters observed from outside the double.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    pub keypairs: Arc<AtomicUsize>,
    pub encapsulations: Arc<AtomicUsize>,
    pub decapsulations: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub constructions: Arc<AtomicUsize>,
    pub key_loads: Arc<AtomicUsize>,
    pub decryptions: Arc<AtomicUsize>,
}

impl Counters {
    pub fn get(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// How the scripted KEM misbehaves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Script {
    /// Decapsulation returns a different secret.
    pub corrupt_decaps: bool,
    /// Decapsulation number `n` (1-based, counting the gate) fails.
    pub fail_decaps_at: Option<usize>,
    /// Key generation number `n` (1-based) fails.
    pub fail_keygen_at: Option<usize>,
}

/// KEM with 8-byte artifacts: ss = ct = pk, sk = pk.
pub struct ScriptedKem {
    script: Script,
    counters: Counters,
    released: bool,
}

impl ScriptedKem {
    pub fn new(script: Script, counters: Counters) -> Self {
        counters.constructions.fetch_add(1, Ordering::SeqCst);
        Self {
            script,
            counters,
            released: false,
        }
    }
}

pub const SCRIPTED_LENGTHS: KeyLengths = KeyLengths::new(8, 8, 8, 8);

impl NativeResource for ScriptedKem {
    fn key_lengths(&self) -> KeyLengths {
        SCRIPTED_LENGTHS
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let n = self.counters.keypairs.fetch_add(1, Ordering::SeqCst) + 1;
        if self.script.fail_keygen_at == Some(n) {
            return Err(BenchError::native("Scripted", OperationKind::KeyGen, "scripted keygen failure"));
        }
        let key = vec![n as u8; 8];
        Ok((key.clone(), key))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl KemPrimitive for ScriptedKem {
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        self.counters.encapsulations.fetch_add(1, Ordering::SeqCst);
        Ok((public_key.to_vec(), public_key.to_vec()))
    }

    fn decapsulate(&self, ciphertext: &[u8], _secret_key: &[u8]) -> Result<Vec<u8>> {
        let n = self.counters.decapsulations.fetch_add(1, Ordering::SeqCst) + 1;
        if self.script.fail_decaps_at == Some(n) {
            return Err(BenchError::native("Scripted", OperationKind::Decapsulate, "scripted failure"));
        }
        let mut secret = ciphertext.to_vec();
        if self.script.corrupt_decaps {
            secret[0] ^= 0x80;
        }
        Ok(secret)
    }
}

/// Initializes the runtime and returns a registry with the toy KEM.
pub fn toy_registry() -> Registry {
    runtime::initialize().expect("runtime init");
    Registry::with_toy()
}

/// Registers a scripted KEM under `name` and returns its counters.
pub fn register_scripted(registry: &mut Registry, name: &str, script: Script) -> Counters {
    let counters = Counters::default();
    let shared = counters.clone();
    registry.register(name, OperationFamily::Kem, move || {
        Ok(NativeHandle::Kem(Box::new(ScriptedKem::new(script, shared.clone()))))
    });
    counters
}

/// Identity encryption with 8-byte artifacts that counts key loads.
pub struct CountingPke {
    counters: Counters,
}

struct CountingKey {
    decryptions: Arc<AtomicUsize>,
}

impl DecryptionKey for CountingKey {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decryptions.fetch_add(1, Ordering::SeqCst);
        Ok(ciphertext.to_vec())
    }
}

impl NativeResource for CountingPke {
    fn key_lengths(&self) -> KeyLengths {
        SCRIPTED_LENGTHS
    }

    fn keypair(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        self.counters.keypairs.fetch_add(1, Ordering::SeqCst);
        Ok((vec![1; 8], vec![2; 8]))
    }

    fn release(&mut self) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl EncryptionPrimitive for CountingPke {
    fn encrypt(&self, _public_key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn load_secret_key(&self, _secret_key: &[u8]) -> Result<Box<dyn DecryptionKey>> {
        self.counters.key_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingKey {
            decryptions: self.counters.decryptions.clone(),
        }))
    }
}

/// Registers a counting encryption primitive under `name`.
pub fn register_counting_pke(registry: &mut Registry, name: &str) -> Counters {
    let counters = Counters::default();
    let shared = counters.clone();
    registry.register(name, OperationFamily::Encryption, move || {
        Ok(NativeHandle::Encryption(Box::new(CountingPke {
            counters: shared.clone(),
        })))
    });
    counters
}
