//! Error types for the analysis core.

use thiserror::Error;

/// Precondition failures of the fit statistic calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The roll set has no rolls, so the expected count per side is zero.
    #[error("cannot test fit on an empty set of rolls")]
    EmptyRollSet,

    /// A die needs at least one side.
    #[error("invalid side count: {0} (must be at least 1)")]
    InvalidSides(u32),
}
