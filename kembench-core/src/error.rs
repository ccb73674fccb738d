//! Error types for KEMBENCH.
//!
//! This module provides the error taxonomy shared by the providers, the
//! benchmark engine and the command line, using `thiserror`.

use thiserror::Error;

use crate::types::OperationKind;

/// Result type alias using `BenchError`.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for all KEMBENCH operations.
#[derive(Debug, Error)]
pub enum BenchError {
    // ═══════════════════════════════════════════════════════════════════════════
    // SETUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The provider cannot resolve the requested variant name.
    #[error("Unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    /// The primitive runtime is not initialized or failed to initialize.
    #[error("Native initialization failed: {0}")]
    NativeInitFailure(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // PRIMITIVE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Caller-supplied input does not match the variant's declared length.
    #[error("Invalid {what} for {variant}: expected {expected} bytes, got {actual}")]
    InvalidArgument {
        /// Variant the input was meant for
        variant: String,
        /// Which artifact was rejected
        what: &'static str,
        /// Declared length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// The native layer reported a non-success status.
    #[error("{operation} failed for {variant}: {reason}")]
    NativeOperationFailure {
        /// Variant whose primitive failed
        variant: String,
        /// Operation that failed
        operation: OperationKind,
        /// Native error text
        reason: String,
    },

    /// The adapter was used after its native resource was released.
    #[error("Primitive for {0} has already been disposed")]
    ResourceDisposed(String),

    /// The operation is not part of the variant's capability set.
    #[error("{operation} is not supported by {variant}")]
    UnsupportedOperation {
        /// Variant that was asked
        variant: String,
        /// Operation outside its family
        operation: OperationKind,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CORRECTNESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Round-trip secrets differ.
    #[error("Verification mismatch for {variant}: {detail}")]
    VerificationMismatch {
        /// Variant that failed the round trip
        variant: String,
        /// What differed
        detail: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Shorthand for a length mismatch on `what`.
    pub fn invalid_length(
        variant: impl Into<String>,
        what: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        BenchError::InvalidArgument {
            variant: variant.into(),
            what,
            expected,
            actual,
        }
    }

    /// Shorthand for a failed native call.
    pub fn native(
        variant: impl Into<String>,
        operation: OperationKind,
        reason: impl std::fmt::Display,
    ) -> Self {
        BenchError::NativeOperationFailure {
            variant: variant.into(),
            operation,
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error ends benchmarking of the affected variant.
    pub fn is_variant_fatal(&self) -> bool {
        matches!(
            self,
            BenchError::UnsupportedAlgorithm(_)
                | BenchError::NativeInitFailure(_)
                | BenchError::VerificationMismatch { .. }
                | BenchError::ResourceDisposed(_)
        )
    }

    /// Returns true if this error points at the caller rather than the primitive.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            BenchError::InvalidArgument { .. }
                | BenchError::UnsupportedOperation { .. }
                | BenchError::ResourceDisposed(_)
                | BenchError::Config(_)
        )
    }

    /// Returns true if retrying could succeed.
    ///
    /// Nothing in the benchmark taxonomy is transient: a correctness failure
    /// stays a correctness failure and a length mismatch is a logic error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BenchError::Io(_))
    }
}
