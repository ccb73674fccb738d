//! Timing samples, summaries, benchmark results and verification records.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::variant::{AlgorithmVariant, OperationKind};

/// Serializes a `Duration` as whole nanoseconds.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_nanos)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING SAMPLE
// ═══════════════════════════════════════════════════════════════════════════════

/// One measured iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSample {
    /// The measured operation.
    pub operation: OperationKind,
    /// Wall-clock time spent inside the primitive call.
    #[serde(rename = "elapsed_ns", with = "duration_nanos")]
    pub elapsed: Duration,
}

impl TimingSample {
    /// Creates a sample.
    pub fn new(operation: OperationKind, elapsed: Duration) -> Self {
        Self { operation, elapsed }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING SUMMARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Reduced statistics over a non-empty sample set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSummary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    #[serde(rename = "average_ns", with = "duration_nanos")]
    pub average: Duration,
    /// Middle value (mean of the two middle values for even counts).
    #[serde(rename = "median_ns", with = "duration_nanos")]
    pub median: Duration,
    /// Fastest sample.
    #[serde(rename = "min_ns", with = "duration_nanos")]
    pub min: Duration,
    /// Slowest sample.
    #[serde(rename = "max_ns", with = "duration_nanos")]
    pub max: Duration,
}

impl TimingSummary {
    /// Operations per second implied by the average.
    pub fn ops_per_second(&self) -> f64 {
        let secs = self.average.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            1.0 / secs
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BENCHMARK RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// The outcome of one timed run of one operation for one variant.
///
/// Samples are kept in recording order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// The measured operation.
    pub operation: OperationKind,
    /// The variant the operation belongs to.
    pub variant: AlgorithmVariant,
    /// Iterations the run was asked to perform.
    pub requested_iterations: usize,
    /// Raw samples in recording order.
    pub samples: Vec<TimingSample>,
    /// Derived statistics, `None` when no sample was recorded.
    pub summary: Option<TimingSummary>,
    /// Why the run stopped early, if it did.
    pub aborted: Option<String>,
}

impl BenchmarkResult {
    /// True if every requested iteration produced a sample.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.samples.len() == self.requested_iterations
    }

    /// Sample durations in recording order.
    pub fn durations(&self) -> impl Iterator<Item = Duration> + '_ {
        self.samples.iter().map(|s| s.elapsed)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFICATION RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// The outcome of one correctness-gate round trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Requested variant name.
    pub variant: String,
    /// True if the round trip reproduced the secret.
    pub passed: bool,
    /// Human-readable detail (sizes on success, the error on failure).
    pub diagnostic: String,
    /// Time spent on the whole round trip.
    #[serde(rename = "elapsed_ns", with = "duration_nanos")]
    pub elapsed: Duration,
    /// When the check ran.
    pub verified_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// A passing record.
    pub fn pass(variant: impl Into<String>, diagnostic: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            variant: variant.into(),
            passed: true,
            diagnostic: diagnostic.into(),
            elapsed,
            verified_at: Utc::now(),
        }
    }

    /// A failing record.
    pub fn fail(variant: impl Into<String>, diagnostic: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            variant: variant.into(),
            passed: false,
            diagnostic: diagnostic.into(),
            elapsed,
            verified_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyLengths, OperationFamily};

    fn toy_variant() -> AlgorithmVariant {
        AlgorithmVariant::new("ToyKEM512", OperationFamily::Kem, KeyLengths::new(32, 32, 32, 16))
    }

    #[test]
    fn test_ops_per_second() {
        let summary = TimingSummary {
            count: 1,
            average: Duration::from_millis(2),
            median: Duration::from_millis(2),
            min: Duration::from_millis(2),
            max: Duration::from_millis(2),
        };
        assert!((summary.ops_per_second() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_average_has_zero_rate() {
        let summary = TimingSummary {
            count: 1,
            average: Duration::ZERO,
            median: Duration::ZERO,
            min: Duration::ZERO,
            max: Duration::ZERO,
        };
        assert_eq!(summary.ops_per_second(), 0.0);
    }

    #[test]
    fn test_partial_result_is_not_complete() {
        let result = BenchmarkResult {
            operation: OperationKind::Decapsulate,
            variant: toy_variant(),
            requested_iterations: 5,
            samples: vec![TimingSample::new(OperationKind::Decapsulate, Duration::from_nanos(10))],
            summary: None,
            aborted: Some("native failure".into()),
        };
        assert!(!result.is_complete());
        assert_eq!(result.durations().count(), 1);
    }

    #[test]
    fn test_sample_serializes_nanoseconds() {
        let sample = TimingSample::new(OperationKind::KeyGen, Duration::from_micros(3));
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["elapsed_ns"], 3000);
        assert_eq!(json["operation"], "key_gen");

        let back: TimingSample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }
}
