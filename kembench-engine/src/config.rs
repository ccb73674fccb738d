//! Run configuration.

use std::path::PathBuf;

use kembench_core::constants::{DEFAULT_ITERATIONS, DEFAULT_VARIANTS, ENV_ITERATIONS, ENV_JSON_OUT, ENV_VARIANTS};
use kembench_core::error::{BenchError, Result};

/// What to benchmark and where to put the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Iterations per timed run
    pub iterations: usize,
    /// Variant names, in run order
    pub variants: Vec<String>,
    /// Optional JSON report path
    pub json_out: Option<PathBuf>,
    /// Whether to show per-state progress
    pub verbose: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            variants: DEFAULT_VARIANTS.iter().map(|s| s.to_string()).collect(),
            json_out: None,
            verbose: false,
        }
    }
}

impl BenchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `KEMBENCH_ITERATIONS`, `KEMBENCH_VARIANTS` and `KEMBENCH_JSON_OUT`,
    /// loading `.env` first if present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ITERATIONS) {
            config.iterations = raw.trim().parse().map_err(|_| {
                BenchError::Config(format!("{} must be a positive integer, got {:?}", ENV_ITERATIONS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_VARIANTS) {
            config.variants = parse_variant_list(&raw);
        }
        if let Some(raw) = lookup(ENV_JSON_OUT) {
            if !raw.trim().is_empty() {
                config.json_out = Some(PathBuf::from(raw.trim()));
            }
        }

        Ok(config)
    }

    /// Sets the iteration count.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the variant list.
    pub fn variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the JSON report path.
    pub fn json_out(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_out = Some(path.into());
        self
    }

    /// Enables per-state progress output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Rejects zero iterations and empty variant lists.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config("iterations must be at least 1".into()));
        }
        if self.variants.is_empty() {
            return Err(BenchError::Config("no variants requested".into()));
        }
        Ok(())
    }
}

/// Splits a comma-separated list, dropping blanks.
pub fn parse_variant_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
