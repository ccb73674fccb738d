//! Console tables and JSON export for benchmark reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;

use kembench_core::types::{AlgorithmVariant, BenchmarkResult, VerificationRecord};
use kembench_core::Result;
use kembench_engine::{BenchmarkReport, VariantOutcome, VariantStatus};

// ═══════════════════════════════════════════════════════════════════════════════
// CONSOLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Formats a duration with a unit that keeps three significant decimals.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{} ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.3} µs", nanos as f64 / 1e3)
    } else if nanos < 1_000_000_000 {
        format!("{:.3} ms", nanos as f64 / 1e6)
    } else {
        format!("{:.3} s", nanos as f64 / 1e9)
    }
}

/// Prints every variant's outcome as a table.
pub fn print_report(report: &BenchmarkReport) {
    println!(
        "\n{} {} iteration(s), {}",
        "📈 Results:".green().bold(),
        report.iterations,
        format_duration(report.elapsed).dimmed()
    );

    for outcome in &report.outcomes {
        print_outcome(outcome);
    }

    let failed = report.outcomes.iter().filter(|o| !o.is_success()).count();
    if failed == 0 {
        println!("\n   {} All variants verified and benchmarked", "✅".green());
    } else {
        println!("\n   {} {} variant(s) did not complete", "❌".red(), failed);
    }
}

fn print_outcome(outcome: &VariantOutcome) {
    println!("\n{}", outcome.variant_name.cyan().bold());

    match &outcome.status {
        VariantStatus::Skipped => {
            println!("   {}", "skipped (stop requested)".yellow());
            return;
        }
        VariantStatus::Failed { stage, error } => {
            println!("   {} {} failed: {}", "❌".red(), stage, error.to_string().red());
        }
        VariantStatus::Completed => {}
    }

    if let Some(record) = &outcome.verification {
        print_verification(record);
    }

    if outcome.results.is_empty() {
        return;
    }

    println!(
        "   {:<8} {:>8} {:>13} {:>13} {:>13} {:>13} {:>12}",
        "op".dimmed(),
        "samples".dimmed(),
        "average".dimmed(),
        "median".dimmed(),
        "min".dimmed(),
        "max".dimmed(),
        "ops/s".dimmed()
    );
    for result in &outcome.results {
        print_result_row(result);
    }
}

fn print_result_row(result: &BenchmarkResult) {
    let label = result.operation.label();
    match &result.summary {
        Some(s) => println!(
            "   {:<8} {:>8} {:>13} {:>13} {:>13} {:>13} {:>12.1}",
            label,
            s.count,
            format_duration(s.average),
            format_duration(s.median),
            format_duration(s.min),
            format_duration(s.max),
            s.ops_per_second()
        ),
        None => println!("   {:<8} {:>8} {}", label, 0, "no data".yellow()),
    }

    if let Some(reason) = &result.aborted {
        println!(
            "   {} aborted after {}/{} samples: {}",
            "⚠️ ".yellow(),
            result.samples.len(),
            result.requested_iterations,
            reason
        );
    }
}

/// Prints one verification record.
pub fn print_verification(record: &VerificationRecord) {
    if record.passed {
        println!(
            "   {} verified in {} ({})",
            "✅".green(),
            format_duration(record.elapsed),
            record.diagnostic.dimmed()
        );
    } else {
        println!("   {} verification failed: {}", "❌".red(), record.diagnostic.red());
    }
}

/// Prints the variant catalogue.
pub fn print_variants(variants: &[AlgorithmVariant]) {
    println!(
        "   {:<12} {:<6} {:>6} {:>6} {:>6} {:>6}",
        "name".dimmed(),
        "family".dimmed(),
        "pk".dimmed(),
        "sk".dimmed(),
        "ct".dimmed(),
        "ss/pt".dimmed()
    );
    for v in variants {
        println!(
            "   {:<12} {:<6} {:>6} {:>6} {:>6} {:>6}",
            v.name,
            v.family.label(),
            v.lengths.public_key,
            v.lengths.secret_key,
            v.lengths.ciphertext,
            v.lengths.shared_secret
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON EXPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable form of a whole report.
#[derive(Debug, Serialize)]
pub struct ReportDto<'a> {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Iterations requested per timed run
    pub iterations: usize,
    /// Wall time in nanoseconds
    pub elapsed_ns: u128,
    /// Per-variant outcomes
    pub variants: Vec<VariantDto<'a>>,
}

/// Serializable form of one variant outcome.
#[derive(Debug, Serialize)]
pub struct VariantDto<'a> {
    /// Variant name
    pub name: &'a str,
    /// `completed`, `failed` or `skipped`
    pub status: &'static str,
    /// Failing stage, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
    /// Failure message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Verification record, if the gate ran
    pub verification: Option<&'a VerificationRecord>,
    /// Timed runs
    pub results: &'a [BenchmarkResult],
}

impl<'a> From<&'a BenchmarkReport> for ReportDto<'a> {
    fn from(report: &'a BenchmarkReport) -> Self {
        Self {
            started_at: report.started_at,
            iterations: report.iterations,
            elapsed_ns: report.elapsed.as_nanos(),
            variants: report.outcomes.iter().map(VariantDto::from).collect(),
        }
    }
}

impl<'a> From<&'a VariantOutcome> for VariantDto<'a> {
    fn from(outcome: &'a VariantOutcome) -> Self {
        let (status, failed_stage, error) = match &outcome.status {
            VariantStatus::Completed => ("completed", None, None),
            VariantStatus::Failed { stage, error } => {
                ("failed", Some(stage.to_string()), Some(error.to_string()))
            }
            VariantStatus::Skipped => ("skipped", None, None),
        };
        Self {
            name: &outcome.variant_name,
            status,
            failed_stage,
            error,
            verification: outcome.verification.as_ref(),
            results: &outcome.results,
        }
    }
}

/// Writes `report` to `path` as pretty-printed JSON.
pub fn export_json(report: &BenchmarkReport, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &ReportDto::from(report))?;
    Ok(())
}
