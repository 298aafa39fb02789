//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.dicecheck.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".dicecheck.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Classification and fit test settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance level below which a p-value rejects fairness.
    #[serde(default = "default_significance")]
    pub significance: f64,

    /// Fixed side count; skips the classifier's guess when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,

    /// Warn when the sample is smaller than the suggested minimum.
    #[serde(default = "default_true")]
    pub warn_small_sample: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance: default_significance(),
            sides: None,
            warn_small_sample: true,
        }
    }
}

fn default_significance() -> f64 {
    crate::analysis::DEFAULT_SIGNIFICANCE
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the frequency table in the report.
    #[serde(default = "default_true")]
    pub include_counts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_counts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.dicecheck.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(sides) = args.sides {
            self.analysis.sides = Some(sides);
        }
        if let Some(significance) = args.significance {
            self.analysis.significance = significance;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags only ever switch things on (or off, for --no-counts)
        if args.no_counts {
            self.report.include_counts = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<(), String> {
        let significance = self.analysis.significance;
        if !(significance > 0.0 && significance < 1.0) {
            return Err(format!(
                "Significance must be between 0 and 1 (exclusive), got {}",
                significance
            ));
        }

        if self.analysis.sides == Some(0) {
            return Err("Sides must be at least 1".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
