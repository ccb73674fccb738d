//! Timing samples and their summary.

use std::time::Duration;

use kembench_core::types::{AlgorithmVariant, BenchmarkResult, OperationKind, TimingSample, TimingSummary};

/// Collects samples for one operation's timed run.
#[derive(Clone, Debug)]
pub struct StatsCollector {
    operation: OperationKind,
    samples: Vec<TimingSample>,
}

impl StatsCollector {
    /// Creates an empty collector for `operation`.
    pub fn new(operation: OperationKind) -> Self {
        Self::with_capacity(operation, 0)
    }

    /// Creates an empty collector with room for `capacity` samples.
    pub fn with_capacity(operation: OperationKind, capacity: usize) -> Self {
        Self {
            operation,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// The measured operation.
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Appends one sample.
    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(TimingSample::new(self.operation, elapsed));
    }

    /// Samples in recording order.
    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reduces the samples, or `None` when there are none.
    pub fn summarize(&self) -> Option<TimingSummary> {
        let durations: Vec<Duration> = self.samples.iter().map(|s| s.elapsed).collect();
        summarize_durations(&durations)
    }

    /// Freezes the run into a [`BenchmarkResult`].
    pub fn finish(
        self,
        variant: AlgorithmVariant,
        requested_iterations: usize,
        aborted: Option<String>,
    ) -> BenchmarkResult {
        let summary = self.summarize();
        BenchmarkResult {
            operation: self.operation,
            variant,
            requested_iterations,
            samples: self.samples,
            summary,
            aborted,
        }
    }
}

/// Mean, median, min and max of `durations`; `None` for an empty slice.
///
/// The median of an even count is the mean of the two central values.
/// Means are taken over whole nanoseconds and truncate, so `[1ns, 2ns]` has
/// a median and average of 1 ns. `durations` is not reordered.
pub fn summarize_durations(durations: &[Duration]) -> Option<TimingSummary> {
    if durations.is_empty() {
        return None;
    }

    let mut sorted = durations.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        mean(&sorted[mid - 1..=mid])
    } else {
        sorted[mid]
    };

    Some(TimingSummary {
        count,
        average: mean(&sorted),
        median,
        min: sorted[0],
        max: sorted[count - 1],
    })
}

fn mean(durations: &[Duration]) -> Duration {
    let total: u128 = durations.iter().map(Duration::as_nanos).sum();
    let nanos = total / durations.len() as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kembench_core::types::{KeyLengths, OperationFamily};
    use proptest::prelude::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_even_median_is_mean_of_middle_pair() {
        let summary = summarize_durations(&ms(&[1, 2, 3, 4])).unwrap();
        assert_eq!(summary.median, Duration::from_micros(2500));
        assert_eq!(summary.average, Duration::from_micros(2500));
    }

    #[test]
    fn test_means_truncate_to_whole_nanoseconds() {
        let durations = [Duration::from_nanos(1), Duration::from_nanos(2)];
        let summary = summarize_durations(&durations).unwrap();
        assert_eq!(summary.median, Duration::from_nanos(1));
        assert_eq!(summary.average, Duration::from_nanos(1));
    }

    #[test]
    fn test_odd_median_is_middle() {
        let summary = summarize_durations(&ms(&[3, 1, 2])).unwrap();
        assert_eq!(summary.median, Duration::from_millis(2));
        assert_eq!(summary.min, Duration::from_millis(1));
        assert_eq!(summary.max, Duration::from_millis(3));
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_empty_is_no_data() {
        assert!(summarize_durations(&[]).is_none());
        assert!(StatsCollector::new(OperationKind::KeyGen).summarize().is_none());
    }

    #[test]
    fn test_recording_order_preserved() {
        let mut stats = StatsCollector::new(OperationKind::Encapsulate);
        for d in ms(&[5, 1, 3]) {
            stats.record(d);
        }
        let _ = stats.summarize();
        let order: Vec<_> = stats.samples().iter().map(|s| s.elapsed).collect();
        assert_eq!(order, ms(&[5, 1, 3]));
        assert!(stats.samples().iter().all(|s| s.operation == OperationKind::Encapsulate));
    }

    #[test]
    fn test_finish_builds_result() {
        let variant = AlgorithmVariant::new("Toy", OperationFamily::Kem, KeyLengths::new(1, 1, 1, 1));
        let mut stats = StatsCollector::with_capacity(OperationKind::Decapsulate, 2);
        stats.record(Duration::from_millis(1));

        let result = stats.finish(variant, 2, Some("native failure".into()));
        assert_eq!(result.samples.len(), 1);
        assert_eq!(result.summary.unwrap().count, 1);
        assert!(!result.is_complete());
    }

    proptest! {
        #[test]
        fn prop_median_between_extrema(values in prop::collection::vec(0u64..1_000_000, 1..64)) {
            let durations: Vec<Duration> = values.iter().map(|&v| Duration::from_nanos(v)).collect();
            let s = summarize_durations(&durations).unwrap();
            prop_assert!(s.min <= s.median && s.median <= s.max);
            prop_assert!(s.min <= s.average && s.average <= s.max);
            prop_assert_eq!(s.count, values.len());
        }

        #[test]
        fn prop_order_does_not_change_summary(mut values in prop::collection::vec(0u64..1_000_000, 1..64)) {
            let forward: Vec<Duration> = values.iter().map(|&v| Duration::from_nanos(v)).collect();
            values.reverse();
            let backward: Vec<Duration> = values.iter().map(|&v| Duration::from_nanos(v)).collect();
            prop_assert_eq!(summarize_durations(&forward), summarize_durations(&backward));
        }
    }
}
