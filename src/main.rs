//! dicecheck - die type inference and fairness testing
//!
//! A CLI tool that reads a list of die rolls, guesses what kind of die
//! produced them, and runs a chi-squared test for fairness.
//!
//! Exit codes:
//!   0 - Success (rolls consistent with a fair die, or no --fail-on-unfair set)
//!   1 - Runtime error (unreadable input, bad config, etc.)
//!   2 - Rolls look unfair and --fail-on-unfair was set

use anyhow::{Context, Result};
use dicecheck::analysis::{parse_dice_rolls, IncompleteGammaCdf};
use dicecheck::cli::{Args, OutputFormat};
use dicecheck::config::{Config, CONFIG_FILE_NAME};
use dicecheck::report;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the config file can turn on verbose output
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    debug!("dicecheck v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_check(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Check failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .dicecheck.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the significance level, fixed side count, and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete check. Returns exit code (0 or 2).
fn run_check(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Read and count the rolls
    let source = args.source_name();
    let input = read_input(&args)?;
    let rolls = parse_dice_rolls(&input);
    info!(
        "Read {} rolls ({} distinct) from {}",
        rolls.total_rolls(),
        rolls.distinct_count(),
        source
    );

    // Step 2: Classify and test
    let report = report::build_report(&source, &rolls, &config, &IncompleteGammaCdf)?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }

    // Step 3: Render and write the report
    match args.output {
        Some(ref path) => {
            let written = match config.report.format {
                OutputFormat::Json => report::write_json_report(&report, path),
                OutputFormat::Markdown => report::write_report(&report, path),
            };
            written.with_context(|| format!("Failed to write report to {}", path.display()))?;

            if !args.quiet {
                print_summary(&report);
                println!("\n✅ Report saved to: {}", path.display());
            }
        }
        None => {
            let output = match config.report.format {
                OutputFormat::Json => report::generate_json_report(&report)?,
                OutputFormat::Markdown => report::generate_markdown_report(&report),
            };
            println!("{}", output);
        }
    }

    debug!("Finished in {:.3}s", start_time.elapsed().as_secs_f64());

    // Check --fail-on-unfair
    if args.fail_on_unfair && report.looks_unfair() {
        eprintln!("\n⛔ Rolls are unlikely to come from a fair die. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Print a short summary to stdout.
fn print_summary(report: &dicecheck::Report) {
    println!("\n📊 Summary:");
    println!("   Rolls: {}", report.metadata.total_rolls);
    match report.die_type {
        Some(die) => println!("   Die type: {}", die),
        None => println!("   Die type: indeterminate"),
    }
    if let Some(ref fit) = report.fit {
        match report.sides_source {
            Some(source) => println!("   Sides tested: {} ({})", fit.sides, source),
            None => println!("   Sides tested: {}", fit.sides),
        }
        println!(
            "   Chi-squared: {:.4} (df {}), p = {:.4}",
            fit.statistic, fit.degrees_of_freedom, fit.p_value
        );
        println!(
            "   Verdict: {}",
            if fit.consistent_with_fair {
                "consistent with a fair die"
            } else {
                "unlikely to be fair"
            }
        );
    }
}

/// Read the raw roll text from the input file or stdin.
fn read_input(args: &Args) -> Result<String> {
    match args.input_path() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rolls from {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read rolls from stdin")?;
            Ok(buffer)
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so problems are reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        // Try explicit config path
        Some(ref config_path) => Config::load(config_path)?,
        // Try default location
        None => match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    Ok(config)
}
