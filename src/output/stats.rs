//! Scrape counters and history statistics

use crate::storage::DomainCount;
use std::fmt;
use std::ops::AddAssign;

/// Outcome counters for a run or a worker cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    /// Articles extracted and saved
    pub saved: u64,

    /// URLs skipped by the classifier or the history
    pub skipped: u64,

    /// URLs whose fetch failed
    pub fetch_failures: u64,

    /// Pages fetched but rejected as too short
    pub rejected: u64,

    /// Articles extracted but not written by the sink
    pub save_errors: u64,
}

impl ScrapeStats {
    /// Total number of URLs accounted for
    pub fn total(&self) -> u64 {
        self.saved + self.skipped + self.fetch_failures + self.rejected + self.save_errors
    }

    /// Logs the counters at info level
    pub fn log_summary(&self, label: &str) {
        tracing::info!("{}: {}", label, self);
    }
}

impl AddAssign for ScrapeStats {
    fn add_assign(&mut self, other: Self) {
        self.saved += other.saved;
        self.skipped += other.skipped;
        self.fetch_failures += other.fetch_failures;
        self.rejected += other.rejected;
        self.save_errors += other.save_errors;
    }
}

impl fmt::Display for ScrapeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} saved, {} skipped, {} fetch failures, {} rejected",
            self.saved, self.skipped, self.fetch_failures, self.rejected
        )?;
        if self.save_errors > 0 {
            write!(f, ", {} save errors", self.save_errors)?;
        }
        Ok(())
    }
}

/// Prints the scrape history statistics to stdout
///
/// # Arguments
///
/// * `total` - Total number of remembered URLs
/// * `per_domain` - Remembered URLs per domain, largest first
pub fn print_history_stats(total: u64, per_domain: &[DomainCount]) {
    println!("=== Scrape History ===\n");
    println!("Total URLs scraped: {}", total);
    println!("Domains: {}", per_domain.len());
    println!();

    if per_domain.is_empty() {
        return;
    }

    println!("URLs by Domain:");
    for entry in per_domain {
        let percentage = if total > 0 {
            (entry.count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let domain = if entry.domain.is_empty() {
            "(unknown)"
        } else {
            entry.domain.as_str()
        };
        println!("  {}: {} ({:.1}%)", domain, entry.count, percentage);
    }
}
