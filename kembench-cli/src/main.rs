//! KEMBENCH CLI
//!
//! Command-line interface for the KEMBENCH post-quantum KEM benchmark.

mod interactive;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kembench_core::constants::TOY_KEM_NAME;
use kembench_core::types::OperationFamily;
use kembench_crypto::{runtime, Registry};
use kembench_engine::config::parse_variant_list;
use kembench_engine::{BenchConfig, BenchmarkOrchestrator, PrimitiveAdapter, RunProgress, RunState};

use interactive::{parse_line, Command, ParseError};

/// KEMBENCH - Post-Quantum KEM Benchmark
#[derive(Parser)]
#[command(name = "kembench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify and benchmark variants
    Bench {
        /// Comma-separated variant names (default: KEMBENCH_VARIANTS or Kyber512,Kyber768,Kyber1024)
        #[arg(short, long)]
        algorithms: Option<String>,
        /// Iterations per timed run (default: KEMBENCH_ITERATIONS or 100)
        #[arg(short = 'n', long)]
        iterations: Option<usize>,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Run only the correctness check for one variant
    Verify {
        /// Variant name
        name: String,
    },

    /// List registered variants and their declared sizes
    List,

    /// Compare declared sizes with generated artifacts
    Sizes {
        /// Comma-separated variant names (default: all)
        #[arg(short, long)]
        algorithms: Option<String>,
    },

    /// Prompt for "Name,Iterations" lines until "quit"
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "kembench=debug,info"
    } else {
        "kembench=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(fmt::layer())
        .init();

    let _runtime = runtime::RuntimeGuard::acquire().context("Failed to initialize crypto runtime")?;
    let registry = Registry::with_toy();

    match cli.command {
        Commands::Bench {
            algorithms,
            iterations,
            json,
        } => cmd_bench(&registry, algorithms, iterations, json, cli.verbose),
        Commands::Verify { name } => cmd_verify(&registry, &name),
        Commands::List => cmd_list(&registry),
        Commands::Sizes { algorithms } => cmd_sizes(&registry, algorithms),
        Commands::Interactive => cmd_interactive(&registry),
    }
}

/// Verify and benchmark every requested variant
fn cmd_bench(
    registry: &Registry,
    algorithms: Option<String>,
    iterations: Option<usize>,
    json: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut config = BenchConfig::from_env().context("Invalid environment configuration")?;
    if let Some(list) = algorithms {
        config = config.variants(parse_variant_list(&list));
    }
    if let Some(n) = iterations {
        config = config.iterations(n);
    }
    if let Some(path) = json {
        config = config.json_out(path);
    }
    if verbose {
        config = config.verbose();
    }
    config.validate().context("Invalid benchmark configuration")?;
    debug!(?config, "resolved configuration");

    println!(
        "{} {} variant(s) × {} iteration(s)",
        "🔬 Benchmarking".cyan().bold(),
        config.variants.len(),
        config.iterations
    );

    let pb = ProgressBar::new(config.variants.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let bar = pb.clone();
    let verbose = config.verbose;
    let mut orchestrator = BenchmarkOrchestrator::new(registry).with_progress(Box::new(move |p: RunProgress| {
        bar.set_position(p.variant_index as u64);
        bar.set_message(format!("{} ({})", p.variant, p.state));
        if verbose && p.state != RunState::Done {
            bar.println(format!("   {} {}", p.variant.dimmed(), p.state));
        }
    }));

    let report = orchestrator.run_benchmark(&config.variants, config.iterations);
    pb.finish_and_clear();

    report::print_report(&report);

    if let Some(path) = &config.json_out {
        report::export_json(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\n   {} Report written to {}", "💾".green(), path.display());
    }

    if !report.is_success() {
        let names: Vec<&str> = report
            .outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.variant_name.as_str())
            .collect();
        bail!("{} variant(s) failed: {}", names.len(), names.join(", "));
    }

    Ok(())
}

/// Correctness check only
fn cmd_verify(registry: &Registry, name: &str) -> Result<()> {
    println!("{} {}", "🔍 Verifying".cyan().bold(), name);

    let record = BenchmarkOrchestrator::new(registry).run_verification(name);
    report::print_verification(&record);

    if !record.passed {
        bail!("{} failed verification", name);
    }
    Ok(())
}

/// Print the catalogue
fn cmd_list(registry: &Registry) -> Result<()> {
    println!("{}", "📋 Registered variants".cyan().bold());
    report::print_variants(&registry.describe());

    if registry.contains(TOY_KEM_NAME) {
        println!(
            "\n   {} {} is an insecure test construction",
            "⚠️ ".yellow(),
            TOY_KEM_NAME
        );
    }
    Ok(())
}

/// Generate one of each artifact and compare with the declared sizes
fn cmd_sizes(registry: &Registry, algorithms: Option<String>) -> Result<()> {
    let names: Vec<String> = match algorithms {
        Some(list) => parse_variant_list(&list),
        None => registry.describe().into_iter().map(|v| v.name).collect(),
    };

    println!("{}", "📏 Artifact sizes (declared / actual)".cyan().bold());

    for name in &names {
        let mut adapter = PrimitiveAdapter::construct(registry, name)
            .with_context(|| format!("Failed to construct {}", name))?;
        let sizes = artifact_sizes(&adapter);
        adapter.dispose();
        let (pk, sk, ct, ss) = sizes.with_context(|| format!("Failed to generate {} artifacts", name))?;

        let declared = adapter.lengths();
        println!(
            "   {:<12} pk {}  sk {}  ct {}  {} {}",
            adapter.name().bold(),
            size_cell(declared.public_key, pk),
            size_cell(declared.secret_key, sk),
            size_cell(declared.ciphertext, ct),
            match adapter.family() {
                OperationFamily::Kem => "ss",
                OperationFamily::Encryption => "pt",
            },
            size_cell(declared.shared_secret, ss),
        );
    }
    Ok(())
}

fn artifact_sizes(adapter: &PrimitiveAdapter) -> kembench_core::Result<(usize, usize, usize, usize)> {
    let keypair = adapter.generate_keypair()?;
    let (ct, ss) = match adapter.family() {
        OperationFamily::Kem => {
            let (ciphertext, secret) = adapter.encapsulate(&keypair.public)?;
            (ciphertext.len(), secret.len())
        }
        OperationFamily::Encryption => {
            let payload = vec![0u8; adapter.lengths().shared_secret];
            let ciphertext = adapter.encrypt(&keypair.public, &payload)?;
            let recovered = adapter.decrypt(&ciphertext, &keypair.secret)?;
            (ciphertext.len(), recovered.len())
        }
    };
    Ok((keypair.public.len(), keypair.secret.len(), ct, ss))
}

fn size_cell(declared: usize, actual: usize) -> ColoredString {
    let cell = format!("{}/{}", declared, actual);
    if declared == actual {
        cell.green()
    } else {
        cell.red().bold()
    }
}

/// Prompt loop
fn cmd_interactive(registry: &Registry) -> Result<()> {
    println!("{}", "🧪 Interactive mode".cyan().bold());
    println!("   Enter {} or {}", "Name,Iterations".bold(), "quit".bold());

    loop {
        let line: String = Input::new()
            .with_prompt("kembench")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        match parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Run { name, iterations }) => {
                let report = BenchmarkOrchestrator::new(registry).run_benchmark(&[name], iterations);
                report::print_report(&report);
            }
            Err(ParseError::Empty) => continue,
            Err(e) => println!("   {} {}", "❌".red(), e),
        }
    }

    println!("{}", "👋 Bye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use kembench_core::constants::DEFAULT_VARIANTS;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bench_help_names_default_variants() {
        let cli = Cli::command();
        let bench = cli.find_subcommand("bench").unwrap();
        let algorithms = bench
            .get_arguments()
            .find(|arg| arg.get_id() == "algorithms")
            .unwrap();
        let help = algorithms.get_help().unwrap().to_string();
        assert!(help.contains(&DEFAULT_VARIANTS.join(",")));
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from(["kembench", "-v", "bench", "-a", "ToyKEM512", "-n", "5"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Bench { algorithms, iterations, json } => {
                assert_eq!(algorithms.as_deref(), Some("ToyKEM512"));
                assert_eq!(iterations, Some(5));
                assert!(json.is_none());
            }
            _ => panic!("expected bench"),
        }
    }
}
