//! Die-type classification.
//!
//! Guesses which die produced a [`RollSet`]. Numeric labels are matched
//! against a fixed table of standard dice, smallest first; anything else
//! falls back to a ratio test on the number of distinct labels.

use crate::models::{DieKind, DieType, RollSet};
use tracing::debug;

/// Minimum rolls per distinct label before an arbitrary-label die is
/// reported as custom.
pub const CUSTOM_ROLLS_PER_SIDE: f64 = 4.0;

/// A standard die and the evidence required to recognise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericRule {
    pub kind: DieKind,
    pub sides: u32,
    /// Smallest sample that may be classified as this die.
    pub min_rolls: usize,
}

impl NumericRule {
    const fn new(kind: DieKind, sides: u32, min_rolls: usize) -> Self {
        Self {
            kind,
            sides,
            min_rolls,
        }
    }

    /// True when the observed bounds fit on this die and the sample is
    /// large enough.
    pub fn matches(&self, bounds: NumericBounds, total_rolls: usize) -> bool {
        let sides = u64::from(self.sides);
        bounds.range() <= sides && bounds.max <= sides && total_rolls >= self.min_rolls
    }

    pub fn die_type(&self) -> DieType {
        DieType::new(self.kind, self.sides)
    }
}

/// Standard dice in priority order. The first matching rule wins.
pub const NUMERIC_RULES: [NumericRule; 7] = [
    NumericRule::new(DieKind::D2, 2, 4),
    NumericRule::new(DieKind::D4, 4, 6),
    NumericRule::new(DieKind::D6, 6, 9),
    NumericRule::new(DieKind::D8, 8, 12),
    NumericRule::new(DieKind::D10, 10, 15),
    NumericRule::new(DieKind::D12, 12, 15),
    NumericRule::new(DieKind::D20, 20, 15),
];

/// Smallest and largest value among numeric roll labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericBounds {
    pub min: u64,
    pub max: u64,
}

impl NumericBounds {
    /// Number of values between `min` and `max`, inclusive.
    pub fn range(&self) -> u64 {
        (self.max - self.min).saturating_add(1)
    }
}

/// Guess the die type behind a set of rolls.
///
/// Returns `None` when there is not enough information to decide.
pub fn classify(rolls: &RollSet) -> Option<DieType> {
    let total_rolls = rolls.total_rolls();

    if let Some(bounds) = numeric_bounds(rolls) {
        debug!(
            "Numeric rolls: min={} max={} range={} total={}",
            bounds.min,
            bounds.max,
            bounds.range(),
            total_rolls
        );

        if let Some(rule) = NUMERIC_RULES
            .iter()
            .find(|rule| rule.matches(bounds, total_rolls))
        {
            return Some(rule.die_type());
        }

        debug!("No standard die matched, trying custom classification");
    }

    classify_custom(rolls)
}

/// Ratio test for dice with arbitrary labels.
fn classify_custom(rolls: &RollSet) -> Option<DieType> {
    let distinct = rolls.distinct_count();
    if distinct == 0 {
        return None;
    }

    let rolls_to_sides = rolls.total_rolls() as f64 / distinct as f64;
    if rolls_to_sides >= CUSTOM_ROLLS_PER_SIDE {
        Some(DieType::new(DieKind::Custom, distinct as u32))
    } else {
        debug!(
            "Only {:.2} rolls per distinct label, classification indeterminate",
            rolls_to_sides
        );
        None
    }
}

/// Bounds of the labels if every label is an unsigned decimal integer.
///
/// Returns `None` for an empty set or when any label contains a sign,
/// decimal point, whitespace or other non-digit character. Values too
/// large for `u64` saturate.
pub fn numeric_bounds(rolls: &RollSet) -> Option<NumericBounds> {
    let mut bounds: Option<NumericBounds> = None;

    for (label, _) in rolls.iter() {
        if !is_unsigned_integer(label) {
            return None;
        }

        let value = label.parse::<u64>().unwrap_or(u64::MAX);
        bounds = Some(match bounds {
            None => NumericBounds {
                min: value,
                max: value,
            },
            Some(b) => NumericBounds {
                min: b.min.min(value),
                max: b.max.max(value),
            },
        });
    }

    bounds
}

/// True for a non-empty string made only of ASCII digits.
pub fn is_unsigned_integer(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}
