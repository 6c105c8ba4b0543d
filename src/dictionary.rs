//! Loaders for the data directory: category dictionaries, the correction
//! table, blacklists, the latency whitelist, logos and URL pools.
//!
//! A missing file is never fatal. It loads as empty and is logged, so a
//! half-populated data directory still produces a run.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::classify::CATEGORIES;

/// Non-empty trimmed lines of a text file; empty when the file is missing.
pub fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "data file missing, treating as empty");
            Vec::new()
        }
    }
}

/// All category dictionaries, keyed by category id.
#[derive(Debug, Default)]
pub struct DictionarySet {
    dicts: HashMap<&'static str, Vec<String>>,
}

impl DictionarySet {
    /// Load every category dictionary from its file under the data directory.
    pub fn load(data_dir: &Path) -> Self {
        let mut dicts = HashMap::new();
        for category in CATEGORIES {
            let entries = read_lines(&data_dir.join(category.dict_path));
            debug!(category = category.id, entries = entries.len(), "dictionary loaded");
            dicts.insert(category.id, entries);
        }
        Self { dicts }
    }

    /// Build from explicit per-category entries. Categories not named get
    /// empty dictionaries.
    pub fn from_entries(entries: &[(&str, &[&str])]) -> Self {
        let mut dicts: HashMap<&'static str, Vec<String>> = HashMap::new();
        for category in CATEGORIES {
            let names = entries
                .iter()
                .find(|(id, _)| *id == category.id)
                .map(|(_, names)| names.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();
            dicts.insert(category.id, names);
        }
        Self { dicts }
    }

    pub fn get(&self, id: &str) -> &[String] {
        self.dicts.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Correction table: each file line is `canonical,alias1,alias2,...` and
/// every alias maps to the canonical form.
pub fn load_corrections(path: &Path) -> HashMap<String, String> {
    let mut corrections = HashMap::new();
    for line in read_lines(path) {
        let mut parts = line.split(',');
        let Some(canonical) = parts.next() else {
            continue;
        };
        for alias in parts {
            corrections.insert(alias.to_string(), canonical.to_string());
        }
    }
    corrections
}

/// Blocked addresses: the second comma-separated field of each line, from
/// every listed file, merged into one set.
pub fn load_blacklist<P: AsRef<Path>>(paths: &[P]) -> HashSet<String> {
    let mut blacklist = HashSet::new();
    for path in paths {
        for line in read_lines(path.as_ref()) {
            if let Some((_, address)) = line.split_once(',') {
                blacklist.insert(address.trim().to_string());
            }
        }
    }
    blacklist
}

/// Lines admitted from a latency whitelist. Each candidate looks like
/// `347ms,name,url`; only entries measured under the threshold re-enter the
/// classification path. An unparseable latency is logged and skipped.
pub fn load_whitelist(path: &Path, threshold_ms: f64) -> Vec<String> {
    let mut admitted = Vec::new();
    for line in read_lines(path) {
        if line.contains("#genre#") || !line.contains(',') || !line.contains("://") {
            continue;
        }
        let Some((latency, rest)) = line.split_once(',') else {
            continue;
        };
        match latency.trim().trim_end_matches("ms").parse::<f64>() {
            Ok(ms) if ms < threshold_ms => admitted.push(rest.to_string()),
            Ok(_) => {}
            Err(_) => {
                warn!(line = %line, "whitelist entry has unparseable latency, skipping");
            }
        }
    }
    admitted
}

/// Channel logo table: exact name to logo URL.
pub fn load_logos(path: &Path) -> HashMap<String, String> {
    let mut logos = HashMap::new();
    for line in read_lines(path) {
        if let Some((name, url)) = line.split_once(',') {
            logos.insert(name.to_string(), url.to_string());
        }
    }
    logos
}

/// URL pool for the daily-pick lines: the last comma-separated field of
/// each line in the file.
pub fn load_url_pool(path: &Path) -> Vec<String> {
    read_lines(path)
        .iter()
        .filter_map(|line| line.rsplit(',').next())
        .map(String::from)
        .collect()
}
