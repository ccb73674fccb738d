//! Data-driven variant registry.
//!
//! One entry per variant name, each holding a factory that builds a fresh
//! native handle. Lookup is case-insensitive; the canonical spelling is what
//! the resolved primitive reports.

use tracing::debug;

use kembench_core::constants::*;
use kembench_core::error::{BenchError, Result};
use kembench_core::traits::{NativeHandle, PrimitiveProvider, ResolvedPrimitive};
use kembench_core::types::{AlgorithmVariant, KeyLengths, OperationFamily};

use crate::kyber::{KyberLevel, KyberPrimitive};
use crate::mlkem::{MlKem1024, MlKem512, MlKem768, MlKemPrimitive};
use crate::rsa_oaep::RsaOaepPrimitive;
use crate::runtime;
use crate::toy::ToyKem;

/// Builds a new native handle.
pub type Factory = Box<dyn Fn() -> Result<NativeHandle> + Send + Sync>;

struct Entry {
    name: String,
    family: OperationFamily,
    factory: Factory,
}

/// Maps variant names to primitive factories.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Kyber, ML-KEM and RSA-OAEP at every bundled size.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for level in [KyberLevel::Kyber512, KyberLevel::Kyber768, KyberLevel::Kyber1024] {
            registry.register(level.name(), OperationFamily::Kem, move || {
                Ok(NativeHandle::Kem(Box::new(KyberPrimitive::new(level))))
            });
        }

        registry.register("ML-KEM-512", OperationFamily::Kem, || {
            Ok(NativeHandle::Kem(Box::new(MlKemPrimitive::<MlKem512>::new(
                "ML-KEM-512",
                KeyLengths::new(
                    KEM_512_PUBLIC_KEY_SIZE,
                    KEM_512_SECRET_KEY_SIZE,
                    KEM_512_CIPHERTEXT_SIZE,
                    KEM_SHARED_SECRET_SIZE,
                ),
            ))))
        });
        registry.register("ML-KEM-768", OperationFamily::Kem, || {
            Ok(NativeHandle::Kem(Box::new(MlKemPrimitive::<MlKem768>::new(
                "ML-KEM-768",
                KeyLengths::new(
                    KEM_768_PUBLIC_KEY_SIZE,
                    KEM_768_SECRET_KEY_SIZE,
                    KEM_768_CIPHERTEXT_SIZE,
                    KEM_SHARED_SECRET_SIZE,
                ),
            ))))
        });
        registry.register("ML-KEM-1024", OperationFamily::Kem, || {
            Ok(NativeHandle::Kem(Box::new(MlKemPrimitive::<MlKem1024>::new(
                "ML-KEM-1024",
                KeyLengths::new(
                    KEM_1024_PUBLIC_KEY_SIZE,
                    KEM_1024_SECRET_KEY_SIZE,
                    KEM_1024_CIPHERTEXT_SIZE,
                    KEM_SHARED_SECRET_SIZE,
                ),
            ))))
        });

        for bits in RSA_KEY_SIZES {
            let name = format!("RSA{}", bits);
            let handle_name = name.clone();
            registry.register(name, OperationFamily::Encryption, move || {
                Ok(NativeHandle::Encryption(Box::new(RsaOaepPrimitive::new(
                    handle_name.clone(),
                    bits,
                ))))
            });
        }

        registry
    }

    /// The default set plus the insecure ToyKEM512.
    pub fn with_toy() -> Self {
        let mut registry = Self::with_defaults();
        registry.register(TOY_KEM_NAME, OperationFamily::Kem, || {
            Ok(NativeHandle::Kem(Box::new(ToyKem::new())))
        });
        registry
    }

    /// Adds or replaces the entry for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, family: OperationFamily, factory: F)
    where
        F: Fn() -> Result<NativeHandle> + Send + Sync + 'static,
    {
        let name = name.into();
        self.entries.retain(|e| !e.name.eq_ignore_ascii_case(&name));
        self.entries.push(Entry {
            name,
            family,
            factory: Box::new(factory),
        });
    }

    /// Returns true if `name` resolves (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a throwaway handle per variant to read its declared lengths.
    ///
    /// Variants whose factory fails are skipped.
    pub fn describe(&self) -> Vec<AlgorithmVariant> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let mut handle = (entry.factory)().ok()?;
                let lengths = handle.key_lengths();
                handle.release();
                Some(AlgorithmVariant::new(entry.name.clone(), entry.family, lengths))
            })
            .collect()
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        let name = name.trim();
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|e| &e.name)).finish()
    }
}

impl PrimitiveProvider for Registry {
    fn resolve(&self, name: &str) -> Result<ResolvedPrimitive> {
        runtime::ensure_initialized()?;

        let entry = self
            .find(name)
            .ok_or_else(|| BenchError::UnsupportedAlgorithm(name.to_string()))?;

        let handle = (entry.factory)()?;
        if handle.family() != entry.family {
            return Err(BenchError::NativeInitFailure(format!(
                "{} registered as {} but built a {} primitive",
                entry.name,
                entry.family,
                handle.family()
            )));
        }

        debug!(variant = %entry.name, "resolved primitive");
        Ok(ResolvedPrimitive {
            name: entry.name.clone(),
            handle,
        })
    }

    fn variant_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}
