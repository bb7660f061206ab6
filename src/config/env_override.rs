//! Typed parsing of `APOS_*` override values
//!
//! A bad value never aborts startup: the current setting is kept and a
//! warning naming the variable is written, with the closest accepted
//! spelling when one is near enough.

use std::io::Write;

/// Spellings accepted for on/off variables
pub const FLAG_SPELLINGS: &[&str] = &["1", "0", "true", "false", "yes", "no"];

/// Largest edit distance still offered as a suggestion
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Parses override values, reporting rejects to a warning stream.
pub struct EnvOverrides<'w, W: Write> {
    warnings: &'w mut W,
}

impl<'w, W: Write> EnvOverrides<'w, W> {
    pub fn new(warnings: &'w mut W) -> Self {
        Self { warnings }
    }

    /// On/off value; `current` survives an unrecognised spelling.
    pub fn flag(&mut self, var: &str, raw: &str, current: bool) -> bool {
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                self.reject(var, raw, FLAG_SPELLINGS);
                current
            }
        }
    }

    /// Duration in whole milliseconds.
    pub fn millis(&mut self, var: &str, raw: &str, current: u64) -> u64 {
        raw.trim().parse().unwrap_or_else(|_| {
            self.reject(var, raw, &["<milliseconds>"]);
            current
        })
    }

    fn reject(&mut self, var: &str, raw: &str, accepted: &[&str]) {
        let hint = closest(&raw.trim().to_lowercase(), accepted.iter().copied())
            .map(|s| format!(". Did you mean '{}'?", s))
            .unwrap_or_default();
        let _ = writeln!(self.warnings, "Warning: Invalid {} value '{}'{}", var, raw, hint);
        let _ = writeln!(self.warnings, "Valid values: {}", accepted.join(", "));
    }
}

/// Nearest candidate within the suggestion distance, ignoring exact matches.
pub fn closest<'c>(input: &str, candidates: impl IntoIterator<Item = &'c str>) -> Option<&'c str> {
    candidates
        .into_iter()
        .map(|candidate| (candidate, edit_distance(input, candidate)))
        .filter(|(_, dist)| (1..=MAX_SUGGESTION_DISTANCE).contains(dist))
        .min_by_key(|(_, dist)| *dist)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
