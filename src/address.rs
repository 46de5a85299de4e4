//! Address list normalization from pasted multiline text

use std::collections::HashSet;

/// Split raw input into a clean address list.
///
/// One address per line; surrounding whitespace (including `\r`) is trimmed,
/// blank lines are dropped and duplicates removed, keeping the first
/// occurrence so row order follows what the operator pasted.
pub fn normalize_addresses(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}
