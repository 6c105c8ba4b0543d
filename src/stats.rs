//! End-of-run statistics.

use std::time::Instant;

use tracing::info;

/// Counters accumulated over one aggregation run.
#[derive(Debug)]
pub struct RunStats {
    started: Instant,
    pub sources_total: usize,
    pub sources_failed: usize,
    pub lines_ingested: usize,
    pub blacklist_size: usize,
    pub whitelist_admitted: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            sources_total: 0,
            sources_failed: 0,
            lines_ingested: 0,
            blacklist_size: 0,
            whitelist_admitted: 0,
        }
    }

    /// Log the run summary with per-variant line counts.
    pub fn log_summary(&self, full: usize, lite: usize, custom: usize, others: usize) {
        let elapsed = self.started.elapsed();
        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        info!(
            sources_total = self.sources_total,
            sources_failed = self.sources_failed,
            lines_ingested = self.lines_ingested,
            blacklist_size = self.blacklist_size,
            whitelist_admitted = self.whitelist_admitted,
            "run complete in {}m{}s", minutes, seconds
        );
        info!(full, lite, custom, others, "variant line counts");
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
