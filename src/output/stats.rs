//! Crawl statistics
//!
//! The coordinator fills a [`CrawlStats`] as rounds complete; the CLI prints
//! it with [`print_statistics`] when asked.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Per-round counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Depth of the round (0 is the root)
    pub depth: u32,

    /// URLs submitted to the worker pool
    pub urls_queued: usize,

    /// Pages fetched successfully
    pub pages_fetched: usize,

    /// Pages that failed (status, timeout, transport)
    pub pages_failed: usize,

    /// Accepted links across the round, duplicates included
    pub links_accepted: usize,

    /// URLs marked for the first time in this round
    pub new_urls: usize,
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,
    pub rounds: Vec<RoundStats>,
    /// Size of the final URL set, root included
    pub urls_discovered: usize,
}

impl CrawlStats {
    /// Starts a new, empty statistics record
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            elapsed: Duration::ZERO,
            rounds: Vec::new(),
            urls_discovered: 0,
        }
    }

    /// Records the end of the crawl
    pub fn finish(&mut self, elapsed: Duration, urls_discovered: usize) {
        self.finished_at = Some(Utc::now());
        self.elapsed = elapsed;
        self.urls_discovered = urls_discovered;
    }

    pub fn pages_fetched(&self) -> usize {
        self.rounds.iter().map(|r| r.pages_fetched).sum()
    }

    pub fn pages_failed(&self) -> usize {
        self.rounds.iter().map(|r| r.pages_failed).sum()
    }

    pub fn links_accepted(&self) -> usize {
        self.rounds.iter().map(|r| r.links_accepted).sum()
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the sitemap document.
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("  Finished: {}", finished.to_rfc3339());
    }
    eprintln!("  Duration: {:.2}s", stats.elapsed.as_secs_f64());
    eprintln!("  URLs in sitemap: {}", stats.urls_discovered);
    eprintln!("  Pages fetched: {}", stats.pages_fetched());
    eprintln!("  Pages failed: {}", stats.pages_failed());
    eprintln!("  Links accepted: {}", stats.links_accepted());
    eprintln!();

    if !stats.rounds.is_empty() {
        eprintln!("Rounds:");
        for round in &stats.rounds {
            eprintln!(
                "  depth {}: {} queued, {} fetched, {} failed, {} new URLs",
                round.depth,
                round.urls_queued,
                round.pages_fetched,
                round.pages_failed,
                round.new_urls
            );
        }
        eprintln!();
    }

    let attempted = stats.pages_fetched() + stats.pages_failed();
    let success_rate = if attempted > 0 {
        (stats.pages_fetched() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    eprintln!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        success_rate,
        stats.pages_fetched(),
        attempted
    );
}
