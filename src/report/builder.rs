//! Assembles a [`Report`] from a set of rolls.

use crate::analysis::{classify, fit_test, suggested_minimum_rolls, ChiSquaredCdf};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{Report, ReportMetadata, RollSet, SidesSource};
use chrono::Utc;
use tracing::{debug, info};

/// Classify `rolls`, run the fit test when a side count is known, and
/// collect everything into a report.
pub fn build_report(
    source: &str,
    rolls: &RollSet,
    config: &Config,
    cdf: &dyn ChiSquaredCdf,
) -> Result<Report, AnalysisError> {
    let mut warnings = Vec::new();

    let die_type = classify(rolls);
    match die_type {
        Some(die) => info!("Rolls look like a {}", die),
        None => info!("Die type is indeterminate"),
    }

    let sides = match (config.analysis.sides, die_type) {
        (Some(sides), guess) => {
            if let Some(die) = guess.filter(|die| die.sides != sides) {
                warnings.push(format!(
                    "Testing against {} sides, but the rolls look like a {}.",
                    sides, die
                ));
            }
            Some((sides, SidesSource::Override))
        }
        (None, Some(die)) => Some((die.sides, SidesSource::Guessed)),
        (None, None) => None,
    };

    let fit = match sides {
        _ if rolls.is_empty() => {
            warnings.push("No rolls found in the input.".to_string());
            None
        }
        Some((sides, _)) => {
            if rolls.distinct_count() > sides as usize {
                warnings.push(format!(
                    "{} distinct rolls but only {} sides; rolls beyond the first {} were ignored by the fit test.",
                    rolls.distinct_count(),
                    sides,
                    sides
                ));
            }

            let minimum = suggested_minimum_rolls(sides);
            if config.analysis.warn_small_sample && rolls.total_rolls() < minimum {
                warnings.push(format!(
                    "Only {} rolls; at least {} are suggested for a {}-sided die.",
                    rolls.total_rolls(),
                    minimum,
                    sides
                ));
            }

            Some(fit_test(rolls, sides, config.analysis.significance, cdf)?)
        }
        None => {
            warnings.push(
                "Could not determine the die type; pass --sides to run the fit test."
                    .to_string(),
            );
            None
        }
    };

    debug!("Report built with {} warnings", warnings.len());

    let counts = if config.report.include_counts {
        rolls.sorted_counts()
    } else {
        Vec::new()
    };

    Ok(Report {
        metadata: ReportMetadata {
            source: source.to_string(),
            analysis_date: Utc::now(),
            total_rolls: rolls.total_rolls(),
            distinct_labels: rolls.distinct_count(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        counts,
        die_type,
        sides_source: sides.map(|(_, source)| source),
        fit,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::IncompleteGammaCdf;
    use crate::models::{DieKind, DieType};

    fn d6_rolls() -> RollSet {
        let mut rolls = Vec::new();
        for face in ["1", "2", "3", "4", "5", "6"] {
            for _ in 0..10 {
                rolls.push(face);
            }
        }
        RollSet::from_rolls(rolls)
    }

    #[test]
    fn test_guessed_sides_run_fit_test() {
        let report = build_report("test", &d6_rolls(), &Config::default(), &IncompleteGammaCdf)
            .unwrap();

        assert_eq!(report.die_type, Some(DieType::new(DieKind::D6, 6)));
        assert_eq!(report.sides_source, Some(SidesSource::Guessed));
        let fit = report.fit.as_ref().unwrap();
        assert_eq!(fit.sides, 6);
        assert_eq!(fit.statistic, 0.0);
        assert!(fit.consistent_with_fair);
        assert!(report.warnings.is_empty());
        assert!(!report.looks_unfair());
        assert_eq!(report.counts.len(), 6);
        assert_eq!(report.metadata.total_rolls, 60);
    }

    #[test]
    fn test_override_sides() {
        let mut config = Config::default();
        config.analysis.sides = Some(8);

        let report = build_report("test", &d6_rolls(), &config, &IncompleteGammaCdf).unwrap();

        assert_eq!(report.sides_source, Some(SidesSource::Override));
        assert_eq!(report.fit.as_ref().unwrap().sides, 8);
        assert!(report.warnings.iter().any(|w| w.contains("look like a d6")));
    }

    #[test]
    fn test_indeterminate_without_override_skips_fit() {
        let rolls = RollSet::from_rolls(["1", "5", "6"]);
        let report = build_report("test", &rolls, &Config::default(), &IncompleteGammaCdf).unwrap();

        assert!(report.die_type.is_none());
        assert!(report.fit.is_none());
        assert!(report.warnings.iter().any(|w| w.contains("--sides")));
    }

    #[test]
    fn test_empty_input_with_override_skips_fit() {
        let mut config = Config::default();
        config.analysis.sides = Some(6);

        let report =
            build_report("test", &RollSet::default(), &config, &IncompleteGammaCdf).unwrap();

        assert!(report.fit.is_none());
        assert!(report.warnings.iter().any(|w| w.contains("No rolls")));
    }

    #[test]
    fn test_small_sample_and_extra_label_warnings() {
        let mut config = Config::default();
        config.analysis.sides = Some(2);
        let rolls = RollSet::from_rolls(["a", "b", "c"]);

        let report = build_report("test", &rolls, &config, &IncompleteGammaCdf).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("were ignored")));
        assert!(report.warnings.iter().any(|w| w.contains("at least 20")));

        config.analysis.warn_small_sample = false;
        let report = build_report("test", &rolls, &config, &IncompleteGammaCdf).unwrap();
        assert!(!report.warnings.iter().any(|w| w.contains("at least 20")));
    }

    #[test]
    fn test_counts_can_be_omitted() {
        let mut config = Config::default();
        config.report.include_counts = false;

        let report = build_report("test", &d6_rolls(), &config, &IncompleteGammaCdf).unwrap();
        assert!(report.counts.is_empty());
    }
}
