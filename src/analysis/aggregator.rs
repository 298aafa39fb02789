//! Roll aggregation and input sanitization.
//!
//! This module turns raw text into roll labels and counts them into a
//! [`RollSet`].

use crate::models::RollSet;
use tracing::debug;

/// Count a sequence of already-sanitized roll labels.
pub fn aggregate_rolls<I, S>(rolls: I) -> RollSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RollSet::from_rolls(rolls)
}

/// Parse one roll per line from raw text.
///
/// Each line is trimmed of leading and trailing non-word characters
/// (anything other than ASCII letters, digits and `_`). Lines that end up
/// empty are discarded.
pub fn parse_dice_rolls(input: &str) -> RollSet {
    let mut discarded = 0usize;

    let labels: Vec<&str> = input
        .split('\n')
        .filter_map(|line| {
            let label = sanitize_line(line);
            if label.is_empty() {
                discarded += 1;
                None
            } else {
                Some(label)
            }
        })
        .collect();

    debug!(
        "Parsed {} rolls ({} blank or symbol-only lines discarded)",
        labels.len(),
        discarded
    );

    aggregate_rolls(labels)
}

/// Strip leading and trailing non-word characters from a line.
pub fn sanitize_line(line: &str) -> &str {
    line.trim_matches(|c: char| !is_word_char(c))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
