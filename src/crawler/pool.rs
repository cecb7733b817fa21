//! Fixed-size fetch worker pool
//!
//! One round of the crawl is handed to [`WorkerPool::run_round`]. The pool
//! spawns at most `concurrency` workers that pull URLs from a bounded
//! multi-consumer job queue, fetch and filter each page, and push one
//! [`PageOutcome`] per URL into a bounded result queue. `run_round` returns
//! only after every worker has exited and every outcome has been collected.

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{fetch_page, FetchError};
use kanal::AsyncReceiver;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use url::Url;

/// Links accepted from one successfully fetched page
#[derive(Debug, Clone)]
pub struct PageLinks {
    /// Final URL after redirects
    pub final_url: Url,

    /// Accepted, normalized links in document order (may repeat)
    pub links: Vec<Url>,

    /// Number of raw hrefs before filtering
    pub hrefs_found: usize,
}

/// Result of processing one URL
#[derive(Debug)]
pub struct PageOutcome {
    /// The URL that was fetched
    pub url: Url,

    /// Accepted links, or why the page contributed none
    pub result: Result<PageLinks, FetchError>,
}

impl PageOutcome {
    /// Accepted links; empty for failed pages
    pub fn links(&self) -> &[Url] {
        match &self.result {
            Ok(page) => &page.links,
            Err(_) => &[],
        }
    }
}

/// Runs the fetch workers for each round
pub struct WorkerPool {
    ctx: Arc<CrawlContext>,
}

impl WorkerPool {
    pub fn new(ctx: Arc<CrawlContext>) -> Self {
        Self { ctx }
    }

    /// Fetches every URL in `urls` with at most `concurrency` in flight
    ///
    /// Outcomes arrive in completion order. A worker that panics loses its
    /// in-flight URL; every other URL still yields an outcome.
    pub async fn run_round(&self, urls: Vec<Url>) -> Vec<PageOutcome> {
        if urls.is_empty() {
            return Vec::new();
        }

        let total = urls.len();
        let capacity = self.ctx.concurrency;
        let worker_count = capacity.min(total);

        let (job_tx, job_rx) = kanal::bounded_async::<Url>(capacity);
        let (result_tx, mut result_rx) = mpsc::channel::<PageOutcome>(capacity);

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            workers.spawn(run_worker(
                id,
                Arc::clone(&self.ctx),
                job_rx.clone(),
                result_tx.clone(),
            ));
        }
        // Only workers may keep the queues open
        drop(job_rx);
        drop(result_tx);

        let feeder = tokio::spawn(async move {
            for url in urls {
                if job_tx.send(url).await.is_err() {
                    tracing::error!("Job queue closed before the round was fully submitted");
                    break;
                }
            }
        });

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Fetch worker failed: {}", e);
            }
        }
        if let Err(e) = feeder.await {
            tracing::error!("Job feeder failed: {}", e);
        }

        if outcomes.len() != total {
            tracing::warn!(
                "Round finished with {} outcomes for {} URLs",
                outcomes.len(),
                total
            );
        }

        outcomes
    }
}

/// Worker loop: pull, fetch, filter, report, until the job queue closes
async fn run_worker(
    id: usize,
    ctx: Arc<CrawlContext>,
    jobs: AsyncReceiver<Url>,
    results: mpsc::Sender<PageOutcome>,
) {
    let mut processed = 0usize;

    while let Ok(url) = jobs.recv().await {
        let outcome = process_page(&ctx, url).await;
        processed += 1;

        if results.send(outcome).await.is_err() {
            break;
        }
    }

    tracing::trace!("Worker {} exiting after {} pages", id, processed);
}

/// Fetches one page and filters its links
pub async fn process_page(ctx: &CrawlContext, url: Url) -> PageOutcome {
    tracing::debug!("Fetching {}", url);

    let result = match fetch_page(&ctx.client, &url).await {
        Ok(page) => {
            let links: Vec<Url> = page
                .hrefs
                .iter()
                .filter_map(|href| ctx.accept(&page.final_url, href))
                .collect();

            tracing::debug!(
                "{}: {} of {} links accepted",
                page.final_url,
                links.len(),
                page.hrefs.len()
            );

            Ok(PageLinks {
                final_url: page.final_url,
                hrefs_found: page.hrefs.len(),
                links,
            })
        }
        Err(e) => {
            tracing::warn!("Could not get links from {}: {}", url, e);
            Err(e)
        }
    };

    PageOutcome { url, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlOptions;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(root: &str, concurrency: usize) -> Arc<CrawlContext> {
        let options = CrawlOptions::default().with_concurrency(concurrency);
        Arc::new(CrawlContext::new(root, options).unwrap())
    }

    async fn html_page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_empty_round() {
        let pool = WorkerPool::new(context("http://example.com/", 4));
        assert!(pool.run_round(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_round_yields_one_outcome_per_url() {
        let server = MockServer::start().await;
        for i in 0..10 {
            html_page(
                &server,
                &format!("/p{}", i),
                &format!(r#"<a href="/p{}">next</a>"#, i + 1),
            )
            .await;
        }

        let root = format!("{}/", server.uri());
        let ctx = context(&root, 3);
        let urls: Vec<Url> = (0..10)
            .map(|i| ctx.root.join(&format!("/p{}", i)).unwrap())
            .collect();

        let outcomes = WorkerPool::new(Arc::clone(&ctx)).run_round(urls).await;

        assert_eq!(outcomes.len(), 10);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert!(outcomes.iter().all(|o| o.links().len() == 1));
    }

    #[tokio::test]
    async fn test_failed_page_does_not_stop_round() {
        let server = MockServer::start().await;
        html_page(&server, "/ok", r#"<a href="/found">found</a>"#).await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let root = format!("{}/", server.uri());
        let ctx = context(&root, 1);
        let urls = vec![ctx.root.join("/gone").unwrap(), ctx.root.join("/ok").unwrap()];

        let outcomes = WorkerPool::new(Arc::clone(&ctx)).run_round(urls).await;

        assert_eq!(outcomes.len(), 2);
        let gone = outcomes.iter().find(|o| o.url.path() == "/gone").unwrap();
        assert!(matches!(
            gone.result,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert!(gone.links().is_empty());

        let ok = outcomes.iter().find(|o| o.url.path() == "/ok").unwrap();
        assert_eq!(ok.links().len(), 1);
        assert_eq!(ok.links()[0].path(), "/found");
    }

    #[tokio::test]
    async fn test_process_page_filters_links() {
        let server = MockServer::start().await;
        html_page(
            &server,
            "/",
            r##"<a href="/about">a</a>
                <a href="#top">t</a>
                <a href="http://other.com/x">o</a>
                <a href="mailto:me@example.com">m</a>"##,
        )
        .await;

        let root = format!("{}/", server.uri());
        let ctx = context(&root, 1);
        let outcome = process_page(&ctx, ctx.root.clone()).await;

        let page = outcome.result.unwrap();
        assert_eq!(page.hrefs_found, 4);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].path(), "/about");
    }
}
