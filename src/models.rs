//! Data models for the dice checker.
//!
//! This module contains the core data structures used throughout
//! the application: the roll aggregate, die classifications, fit
//! results and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Immutable frequency table of observed rolls.
///
/// Maps each roll label (e.g. `"4"`, `"heads"`) to the number of times it
/// was observed. Every stored count is at least 1; a label that was never
/// rolled is simply absent. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollSet {
    counts: HashMap<String, usize>,
}

impl RollSet {
    /// Creates a roll set from precomputed counts.
    ///
    /// Entries with a zero count are dropped.
    pub fn new(counts: HashMap<String, usize>) -> Self {
        let counts = counts.into_iter().filter(|(_, n)| *n > 0).collect();
        Self { counts }
    }

    /// Creates a roll set by counting each label in `rolls`.
    pub fn from_rolls<I, S>(rolls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for roll in rolls {
            *counts.entry(roll.into()).or_default() += 1;
        }

        Self { counts }
    }

    /// Total number of rolls observed.
    pub fn total_rolls(&self) -> usize {
        self.counts.values().sum()
    }

    /// The set of distinct labels that were rolled.
    pub fn distinct_labels(&self) -> HashSet<&str> {
        self.counts.keys().map(String::as_str).collect()
    }

    /// Number of distinct labels.
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences of a single label (zero if never rolled).
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Iterate over `(label, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, n)| (label.as_str(), *n))
    }

    /// Iterate over the counts alone, in unspecified order.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.values().copied()
    }

    /// True when no rolls were observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counts as rows sorted for display: numeric labels by value first,
    /// then the remaining labels alphabetically.
    pub fn sorted_counts(&self) -> Vec<RollCount> {
        let mut rows: Vec<RollCount> = self
            .iter()
            .map(|(label, count)| RollCount {
                label: label.to_string(),
                count,
            })
            .collect();

        rows.sort_by(|a, b| {
            let a_num = a.label.parse::<u64>().ok();
            let b_num = b.label.parse::<u64>().ok();
            match (a_num, b_num) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.label.cmp(&b.label),
            }
        });

        rows
    }
}

impl<S: Into<String>> FromIterator<S> for RollSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_rolls(iter)
    }
}

/// One row of the frequency table, used in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCount {
    pub label: String,
    pub count: usize,
}

/// Kind of die a set of rolls appears to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieKind {
    D2,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    /// Arbitrary labels, classified by sample size alone
    Custom,
}

impl fmt::Display for DieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DieKind::D2 => write!(f, "d2"),
            DieKind::D4 => write!(f, "d4"),
            DieKind::D6 => write!(f, "d6"),
            DieKind::D8 => write!(f, "d8"),
            DieKind::D10 => write!(f, "d10"),
            DieKind::D12 => write!(f, "d12"),
            DieKind::D20 => write!(f, "d20"),
            DieKind::Custom => write!(f, "custom"),
        }
    }
}

/// A die classification: its kind plus the number of sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieType {
    pub kind: DieKind,
    pub sides: u32,
}

impl DieType {
    pub fn new(kind: DieKind, sides: u32) -> Self {
        Self { kind, sides }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DieKind::Custom => write!(f, "custom ({} sides)", self.sides),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Outcome of a chi-squared goodness-of-fit test against a fair die.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// Side count the rolls were tested against.
    pub sides: u32,
    /// The chi-squared statistic.
    pub statistic: f64,
    /// Degrees of freedom (sides - 1).
    pub degrees_of_freedom: u32,
    /// CDF of the chi-squared distribution at `statistic`.
    pub cdf: f64,
    /// Probability of a deviation at least this large from a fair die.
    pub p_value: f64,
    /// Significance level the p-value was compared to.
    pub significance: f64,
    /// Recommended sample size for this side count.
    pub suggested_minimum_rolls: usize,
    /// Whether the sample reached `suggested_minimum_rolls`.
    pub enough_rolls: bool,
    /// True when the p-value is not below the significance level.
    pub consistent_with_fair: bool,
}

/// Where the side count used for the fit test came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidesSource {
    /// Taken from the classifier's guess.
    Guessed,
    /// Supplied on the command line or in the config file.
    Override,
}

impl fmt::Display for SidesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SidesSource::Guessed => write!(f, "guessed"),
            SidesSource::Override => write!(f, "override"),
        }
    }
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Name of the input (file path or `<stdin>`).
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Total number of rolls read.
    pub total_rolls: usize,
    /// Number of distinct roll labels.
    pub distinct_labels: usize,
    /// Version of the tool that produced the report.
    pub tool_version: String,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Frequency table, sorted for display.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub counts: Vec<RollCount>,
    /// Classifier output; `None` means indeterminate.
    pub die_type: Option<DieType>,
    /// Origin of the side count used for the fit test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides_source: Option<SidesSource>,
    /// Fit test result, absent when no side count was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitResult>,
    /// Human-readable caveats about the analysis.
    pub warnings: Vec<String>,
}

impl Report {
    /// True when a fit test ran and rejected fairness.
    pub fn looks_unfair(&self) -> bool {
        self.fit
            .as_ref()
            .map(|fit| !fit.consistent_with_fair)
            .unwrap_or(false)
    }
}
