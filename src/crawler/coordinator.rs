//! Crawler coordinator - round-based crawl orchestration
//!
//! This module contains the breadth-first crawl loop:
//! - Seeding the seen set and the first round with the root
//! - Handing each round to the worker pool and waiting for it to drain
//! - Merging discovered links into the seen set to build the next round
//! - Stopping at the depth limit or on an empty round
//! - Materializing the final URL set

use crate::crawler::context::{CrawlContext, CrawlOptions};
use crate::crawler::fetcher::FetchError;
use crate::crawler::frontier::SeenSet;
use crate::crawler::pool::{PageOutcome, WorkerPool};
use crate::output::{CrawlStats, RoundStats, UrlSet};
use crate::state::{CrawlPhase, PhaseTracker};
use crate::SitemapError;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use url::Url;

/// Main crawler coordinator structure
///
/// A coordinator runs exactly one crawl; [`Coordinator::run`] consumes it.
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    seen: SeenSet,
    phase: PhaseTracker,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `root` - The URL to start crawling from
    /// * `options` - Depth, concurrency, timeout and filter settings
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Root and options are valid
    /// * `Err(SitemapError)` - Root URL or options are invalid
    pub fn new(root: &str, options: CrawlOptions) -> Result<Self, SitemapError> {
        let ctx = CrawlContext::new(root, options)?;
        let seen = SeenSet::with_root(&ctx.root);

        Ok(Self {
            ctx: Arc::new(ctx),
            seen,
            phase: PhaseTracker::new(),
            stats: CrawlStats::start(),
        })
    }

    /// The immutable context of this crawl
    pub fn context(&self) -> &CrawlContext {
        &self.ctx
    }

    /// Runs the crawl and returns the discovered URL set
    pub async fn run(self) -> Result<UrlSet, SitemapError> {
        self.run_with_stats().await.map(|(urls, _)| urls)
    }

    /// Runs the crawl and returns the URL set along with crawl statistics
    ///
    /// # Crawl Loop
    ///
    /// 1. Round 0 fetches the root (already marked seen)
    /// 2. Each round's outcomes are merged through `SeenSet::try_mark`;
    ///    newly marked URLs form the next round
    /// 3. The loop ends once `max_depth` rounds have run or a round finds
    ///    nothing new
    ///
    /// Only a failure of the root fetch is fatal; every other page failure
    /// is logged and skipped.
    pub async fn run_with_stats(mut self) -> Result<(UrlSet, CrawlStats), SitemapError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            self.ctx.root,
            self.ctx.max_depth,
            self.ctx.concurrency
        );

        if self.ctx.max_depth > 0 {
            self.crawl_rounds().await?;
        } else {
            tracing::info!("Max depth is 0, nothing to fetch");
        }
        self.phase.advance(CrawlPhase::Terminated)?;

        let Self { seen, mut stats, .. } = self;
        let urls = UrlSet::from_urls(seen.into_urls());
        stats.finish(start_time.elapsed(), urls.len());

        tracing::info!(
            "Crawl completed: {} URLs, {} pages fetched, {} failed in {:?}",
            urls.len(),
            stats.pages_fetched(),
            stats.pages_failed(),
            stats.elapsed
        );

        Ok((urls, stats))
    }

    /// Runs rounds until the depth limit or an empty frontier
    ///
    /// Leaves the tracker in `RoundDrained` of the last round.
    async fn crawl_rounds(&mut self) -> Result<(), SitemapError> {
        let pool = WorkerPool::new(Arc::clone(&self.ctx));
        let mut queue = vec![self.ctx.root.clone()];
        let mut depth = 0u32;

        loop {
            self.phase.advance(CrawlPhase::RoundActive(depth))?;
            let queued = queue.len();

            let span = tracing::info_span!("round", depth);
            let outcomes = pool
                .run_round(std::mem::take(&mut queue))
                .instrument(span)
                .await;

            self.phase.advance(CrawlPhase::RoundDrained(depth))?;
            if depth == 0 {
                self.check_root(&outcomes)?;
            }

            let (next, round) = self.merge_round(depth, queued, outcomes);
            tracing::info!(
                "Round {} done: {} fetched, {} failed, {} new URLs",
                depth,
                round.pages_fetched,
                round.pages_failed,
                round.new_urls
            );
            self.stats.rounds.push(round);

            if depth + 1 >= self.ctx.max_depth {
                tracing::debug!("Depth limit {} reached", self.ctx.max_depth);
                return Ok(());
            }
            if next.is_empty() {
                tracing::debug!("No new URLs after round {}", depth);
                return Ok(());
            }

            queue = next;
            depth += 1;
        }
    }

    /// Fails the crawl if the root itself could not be fetched
    fn check_root(&self, outcomes: &[PageOutcome]) -> Result<(), SitemapError> {
        match outcomes.iter().find(|o| o.url == self.ctx.root) {
            Some(PageOutcome { result: Ok(_), .. }) => Ok(()),
            Some(PageOutcome { result: Err(e), .. }) => Err(SitemapError::RootUnreachable {
                url: self.ctx.root.to_string(),
                source: e.clone(),
            }),
            None => Err(SitemapError::RootUnreachable {
                url: self.ctx.root.to_string(),
                source: FetchError::Transport("root fetch produced no result".to_string()),
            }),
        }
    }

    /// Marks every discovered link and returns the next round's queue
    fn merge_round(
        &self,
        depth: u32,
        queued: usize,
        outcomes: Vec<PageOutcome>,
    ) -> (Vec<Url>, RoundStats) {
        let mut round = RoundStats {
            depth,
            urls_queued: queued,
            ..RoundStats::default()
        };
        let mut next = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(page) => {
                    round.pages_fetched += 1;
                    round.links_accepted += page.links.len();

                    for link in page.links {
                        if self.seen.try_mark(link.as_str()) {
                            next.push(link);
                        }
                    }
                }
                Err(_) => round.pages_failed += 1,
            }
        }

        round.new_urls = next.len();
        (next, round)
    }
}

/// Runs a complete crawl and returns the sitemap URL set
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::crawler::{run_crawl, CrawlOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = run_crawl("https://example.com/", CrawlOptions::default()).await?;
/// println!("{}", urls.to_xml()?);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(root: &str, options: CrawlOptions) -> Result<UrlSet, SitemapError> {
    Coordinator::new(root, options)?.run().await
}
