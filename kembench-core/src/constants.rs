//! Constants for KEMBENCH.
//!
//! Artifact sizes for every bundled variant, plus run defaults. The providers
//! report their lengths at construction time; these tables exist so tests and
//! the catalogue printer can check the providers against the published
//! parameter sets.

// ═══════════════════════════════════════════════════════════════════════════════
// KYBER / ML-KEM SIZES (NIST FIPS 203)
// ═══════════════════════════════════════════════════════════════════════════════

/// Public key size for Kyber512 / ML-KEM-512.
pub const KEM_512_PUBLIC_KEY_SIZE: usize = 800;
/// Secret key size for Kyber512 / ML-KEM-512.
pub const KEM_512_SECRET_KEY_SIZE: usize = 1632;
/// Ciphertext size for Kyber512 / ML-KEM-512.
pub const KEM_512_CIPHERTEXT_SIZE: usize = 768;

/// Public key size for Kyber768 / ML-KEM-768.
pub const KEM_768_PUBLIC_KEY_SIZE: usize = 1184;
/// Secret key size for Kyber768 / ML-KEM-768.
pub const KEM_768_SECRET_KEY_SIZE: usize = 2400;
/// Ciphertext size for Kyber768 / ML-KEM-768.
pub const KEM_768_CIPHERTEXT_SIZE: usize = 1088;

/// Public key size for Kyber1024 / ML-KEM-1024.
pub const KEM_1024_PUBLIC_KEY_SIZE: usize = 1568;
/// Secret key size for Kyber1024 / ML-KEM-1024.
pub const KEM_1024_SECRET_KEY_SIZE: usize = 3168;
/// Ciphertext size for Kyber1024 / ML-KEM-1024.
pub const KEM_1024_CIPHERTEXT_SIZE: usize = 1568;

/// Shared secret size for every Kyber / ML-KEM parameter set.
pub const KEM_SHARED_SECRET_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// RSA-OAEP
// ═══════════════════════════════════════════════════════════════════════════════

/// Supported RSA modulus sizes in bits.
pub const RSA_KEY_SIZES: [usize; 3] = [2048, 3072, 4096];

/// Public exponent used for every generated RSA key.
pub const RSA_PUBLIC_EXPONENT: u64 = 65_537;

/// Plaintext length encrypted by the RSA variants (one symmetric key's worth).
pub const RSA_PAYLOAD_SIZE: usize = 32;

/// Fixed-length encoding sizes for an RSA modulus of `bits` bits.
///
/// Returns `(public, secret, ciphertext)`: the public key is the modulus, the
/// secret key is modulus ‖ d ‖ p ‖ q.
pub const fn rsa_encoded_sizes(bits: usize) -> (usize, usize, usize) {
    let k = bits / 8;
    (k, 3 * k, k)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOY KEM
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the insecure toy KEM used by tests and demos.
pub const TOY_KEM_NAME: &str = "ToyKEM512";
/// Toy KEM public key size.
pub const TOY_PUBLIC_KEY_SIZE: usize = 32;
/// Toy KEM secret key size.
pub const TOY_SECRET_KEY_SIZE: usize = 32;
/// Toy KEM ciphertext size.
pub const TOY_CIPHERTEXT_SIZE: usize = 32;
/// Toy KEM shared secret size.
pub const TOY_SHARED_SECRET_SIZE: usize = 16;

/// Domain separator for the toy KEM's key derivation.
pub const DOMAIN_TOY_PUBLIC: &[u8] = b"KEMBENCH_TOY_PK_V1";
/// Domain separator for the toy KEM's mask.
pub const DOMAIN_TOY_MASK: &[u8] = b"KEMBENCH_TOY_MASK_V1";
/// Domain separator for the toy KEM's shared secret.
pub const DOMAIN_TOY_SECRET: &[u8] = b"KEMBENCH_TOY_SS_V1";

// ═══════════════════════════════════════════════════════════════════════════════
// RUN DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Iterations per timed operation when nothing else is configured.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Variants benchmarked when nothing else is configured.
pub const DEFAULT_VARIANTS: [&str; 3] = ["Kyber512", "Kyber768", "Kyber1024"];

/// Environment variable overriding the iteration count.
pub const ENV_ITERATIONS: &str = "KEMBENCH_ITERATIONS";
/// Environment variable overriding the variant list (comma separated).
pub const ENV_VARIANTS: &str = "KEMBENCH_VARIANTS";
/// Environment variable naming a JSON report destination.
pub const ENV_JSON_OUT: &str = "KEMBENCH_JSON_OUT";
