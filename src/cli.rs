//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// dicecheck - guess what die produced a list of rolls and test its fairness
///
/// Reads one roll per line. Numeric rolls are matched against standard
/// dice (d2 to d20); any other labels are treated as a custom die. The
/// rolls are then checked against a fair die with a chi-squared test.
///
/// Examples:
///   dicecheck rolls.txt
///   dicecheck rolls.txt --sides 20 --format json --output report.json
///   cat rolls.txt | dicecheck --fail-on-unfair
///   dicecheck --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// File with one roll per line
    ///
    /// Reads from stdin when omitted or set to "-".
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Number of sides to test against
    ///
    /// Overrides the classifier's guess. Can also be set in .dicecheck.toml.
    #[arg(short, long, value_name = "N", env = "DICECHECK_SIDES")]
    pub sides: Option<u32>,

    /// Significance level for the fairness verdict (default 0.05)
    #[arg(long, value_name = "P")]
    pub significance: Option<f64>,

    /// Output file path for the report
    ///
    /// Prints to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .dicecheck.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave the frequency table out of the report
    #[arg(long)]
    pub no_counts: bool,

    /// Exit with code 2 when the rolls look unfair
    ///
    /// Useful in scripts that check a batch of dice.
    #[arg(long)]
    pub fail_on_unfair: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .dicecheck.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The input file, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Display name of the input for reports and logs.
    pub fn source_name(&self) -> String {
        match self.input_path() {
            Some(path) => path.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.sides == Some(0) {
            return Err("Sides must be at least 1".to_string());
        }

        if let Some(significance) = self.significance {
            if !(significance > 0.0 && significance < 1.0) {
                return Err("Significance must be between 0 and 1 (exclusive)".to_string());
            }
        }

        // Validate input file if provided
        if let Some(path) = self.input_path() {
            if !path.exists() {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
            if !path.is_file() {
                return Err(format!("Input path is not a file: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            sides: None,
            significance: None,
            output: None,
            format: None,
            config: None,
            no_counts: false,
            fail_on_unfair: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "dicecheck",
            "rolls.txt",
            "--sides",
            "6",
            "--format",
            "json",
            "--fail-on-unfair",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("rolls.txt")));
        assert_eq!(args.sides, Some(6));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.fail_on_unfair);
    }

    #[test]
    fn test_stdin_input() {
        let mut args = make_args();
        assert!(args.input_path().is_none());
        assert_eq!(args.source_name(), "<stdin>");

        args.input = Some(PathBuf::from("-"));
        assert!(args.input_path().is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_file() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("definitely/not/here.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bad_values() {
        let mut args = make_args();
        args.sides = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.significance = Some(1.0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
