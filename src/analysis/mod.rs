//! Analysis modules.
//!
//! Rolls flow one way: raw text is aggregated into a [`RollSet`], which is
//! then classified and tested for fit independently.
//!
//! [`RollSet`]: crate::models::RollSet

pub mod aggregator;
pub mod classifier;
pub mod fit;

pub use aggregator::{aggregate_rolls, parse_dice_rolls, sanitize_line};
pub use classifier::classify;
pub use fit::{
    chi_squared, chi_squared_cdf_at, fit_test, suggested_minimum_rolls, ChiSquaredCdf,
    IncompleteGammaCdf, DEFAULT_SIGNIFICANCE,
};
