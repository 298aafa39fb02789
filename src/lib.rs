//! dicecheck - die type inference and fairness testing.
//!
//! Rolls are read as text labels, counted into a [`RollSet`], classified
//! into a standard or custom die, and tested against a fair die of the
//! same size with a chi-squared goodness-of-fit test.
//!
//! ```
//! use dicecheck::analysis::{chi_squared, classify, parse_dice_rolls};
//! use dicecheck::models::DieKind;
//!
//! let rolls = parse_dice_rolls("4\n2\n3\n4\n3\n6\n6\n3\n1\n5\n");
//! let die = classify(&rolls).unwrap();
//! assert_eq!(die.kind, DieKind::D6);
//!
//! let statistic = chi_squared(&rolls, die.sides).unwrap();
//! assert!(statistic > 0.0);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;

pub use error::AnalysisError;
pub use models::{DieKind, DieType, FitResult, Report, RollSet};
