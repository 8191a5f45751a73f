//! One logical crawl: fan out fetch→extract→build per source, concurrently.
//!
//! Every requested source runs its own pipeline; the pipelines are polled
//! together and nothing one source does — timeouts, bad status codes,
//! malformed payloads — can abort another's in-flight work. The result
//! always carries exactly one entry per requested source.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::FetchError;
use crate::fetch::{PageFetch, SourceFetcher};
use crate::models::{CrawlResult, SourceFailure, SourceName, SourceOutcome};
use crate::record;
use crate::sources;

pub struct CrawlOrchestrator<'a, F> {
    fetcher: &'a SourceFetcher<F>,
    config: &'a AppConfig,
}

impl<'a, F: PageFetch> CrawlOrchestrator<'a, F> {
    pub fn new(fetcher: &'a SourceFetcher<F>, config: &'a AppConfig) -> Self {
        CrawlOrchestrator { fetcher, config }
    }

    /// Crawl one keyword across the given sources against the wall clock.
    pub async fn crawl(
        &self,
        keyword: &str,
        sources: &[SourceName],
        count: u32,
    ) -> CrawlResult {
        self.crawl_at(keyword, sources, count, Utc::now()).await
    }

    /// Crawl with an injected clock for relative-time resolution.
    pub async fn crawl_at(
        &self,
        keyword: &str,
        sources: &[SourceName],
        count: u32,
        now: DateTime<Utc>,
    ) -> CrawlResult {
        let pipelines = sources.iter().map(|&source| async move {
            (source, self.run_source(keyword, source, count, now).await)
        });
        let by_source: HashMap<SourceName, SourceOutcome> =
            future::join_all(pipelines).await.into_iter().collect();
        CrawlResult {
            keyword: keyword.to_string(),
            by_source,
        }
    }

    /// One source's pipeline. Source-level failures become `Failed`
    /// entries; item-level failures drop only the offending item.
    async fn run_source(
        &self,
        keyword: &str,
        source: SourceName,
        count: u32,
        now: DateTime<Utc>,
    ) -> SourceOutcome {
        let query = sources::build_query(source, keyword, count, self.config);

        let payload = match self.fetcher.fetch(&query).await {
            Ok(payload) => payload,
            Err(FetchError::Status(code)) => {
                warn!(%source, %keyword, code, "source returned non-200 status");
                return SourceOutcome::Failed(SourceFailure::Status(code));
            }
            Err(FetchError::Transport(kind)) => {
                return SourceOutcome::Failed(SourceFailure::Transport(kind));
            }
        };

        let items = match sources::extract(source, &payload) {
            Ok(items) => items,
            Err(error) => {
                warn!(%source, %keyword, %error, "payload did not have the expected shape");
                return SourceOutcome::Failed(SourceFailure::MalformedPayload);
            }
        };

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for item in items {
            match item {
                Ok(raw) => match record::build(&raw, now) {
                    Ok(built) => records.push(built),
                    Err(error) => {
                        dropped += 1;
                        warn!(%source, %keyword, %error, url = %raw.url, "dropping item");
                    }
                },
                Err(error) => {
                    dropped += 1;
                    warn!(%source, %keyword, %error, "dropping item");
                }
            }
        }

        info!(%source, %keyword, count = records.len(), dropped, "collected records");
        SourceOutcome::Ok(records)
    }
}
