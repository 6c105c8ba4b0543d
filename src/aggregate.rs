//! Bucket finalization: name corrections, duplicate removal and ordering.

use std::collections::{HashMap, HashSet};

use crate::classify::OrderMode;

/// Apply the correction table to the name component of each line.
/// Lines without a comma are dropped.
pub fn apply_corrections(
    corrections: &HashMap<String, String>,
    lines: &[String],
) -> Vec<String> {
    let mut corrected = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim();
        let Some((name, url)) = line.split_once(',') else {
            continue;
        };
        match corrections.get(name) {
            Some(canonical) if canonical != name => {
                corrected.push(format!("{},{}", canonical, url));
            }
            _ => corrected.push(line.to_string()),
        }
    }
    corrected
}

/// Remove duplicate whole lines, keeping first occurrences in order.
pub fn dedup_lines(lines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

/// Stable sort by position of each line's name in the dictionary.
/// Names absent from the dictionary keep their relative order at the end.
pub fn sort_by_dictionary(dictionary: &[String], mut lines: Vec<String>) -> Vec<String> {
    let positions: HashMap<&str, usize> = dictionary
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();
    lines.sort_by_key(|line| {
        let name = line.split(',').next().unwrap_or("");
        positions.get(name).copied().unwrap_or(dictionary.len())
    });
    lines
}

/// Corrections, then full-line dedup, then the bucket's ordering.
pub fn finalize(
    lines: &[String],
    dictionary: &[String],
    order_mode: OrderMode,
    corrections: &HashMap<String, String>,
) -> Vec<String> {
    let lines = dedup_lines(apply_corrections(corrections, lines));
    match order_mode {
        OrderMode::Dictionary => sort_by_dictionary(dictionary, lines),
        OrderMode::Lexicographic => {
            let mut lines = lines;
            lines.sort();
            lines
        }
    }
}
