//! # Trend News Crawler
//!
//! Crawls several news sources concurrently for a set of generated search
//! keywords, normalizes every source's payload into one record shape, and
//! keeps keyword data in a sharded Redis store.
//!
//! ## Features
//!
//! - Naver and Daum news via their JSON search APIs, Google News via HTML
//!   scraping of the news tab
//! - One record shape (`url`, cleaned title, resolved timestamp) across
//!   sources, with relative labels like "3 hours ago" resolved to absolute
//!   time
//! - Partial-failure tolerance: one source timing out or answering 500
//!   never hides another source's results
//! - Keyword and generated-query storage in node-sharded Redis
//! - Optional LLM relevance scoring of collected records
//!
//! ## Usage
//!
//! ```sh
//! trend_news_crawler -c config.yaml -o ./out -k "AI 규제"
//! ```
//!
//! ## Architecture
//!
//! One crawl per keyword: the orchestrator fans out fetch → extract →
//! build per source, concurrently, and merges the survivors into a
//! per-source result map. Keyword-level crawls run 4 at a time.

use std::error::Error;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod errors;
mod extract;
mod fetch;
mod keywords;
mod models;
mod orchestrator;
mod outputs;
mod record;
mod scoring;
mod sources;
mod utils;

use cache::KeywordStore;
use cli::Cli;
use config::AppConfig;
use fetch::{HttpFetcher, SourceFetcher};
use models::{CrawlResult, SourceName, SourceOutcome};
use orchestrator::CrawlOrchestrator;

/// How many keyword crawls run at once.
const PARALLEL_CRAWLS: usize = 4;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trend_news_crawler starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, ?args.sources, "Parsed CLI arguments");

    let mut config = AppConfig::load(&args.config)?;
    if let Some(client_id) = args.naver_client_id.clone() {
        config.naver.client_id = client_id;
    }
    if let Some(client_secret) = args.naver_client_secret.clone() {
        config.naver.client_secret = client_secret;
    }
    if let Some(api_key) = args.daum_api_key.clone() {
        config.daum.api_key = api_key;
    }

    // --- Keyword store (degrades, never blocks the crawl) ---
    let store = match KeywordStore::connect(&config.cache).await {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "keyword store unavailable; continuing without it");
            None
        }
    };

    if args.seed_keywords {
        let Some(templates) = config.keywords.as_ref() else {
            error!("cannot seed: no keyword templates in config");
            return Err("no keyword templates configured".into());
        };
        let Some(store) = store.as_ref() else {
            return Err("cannot seed: keyword store unavailable".into());
        };
        keywords::seed_keyword_store(store, templates).await?;
        info!("keyword store seeded");
        return Ok(());
    }

    // --- Keywords to crawl ---
    let crawl_keywords: Vec<String> = if !args.keyword.is_empty() {
        args.keyword.clone()
    } else if let Some(store) = store.as_ref() {
        match store.get(&args.keyword_key).await {
            Ok(Some(list)) => list,
            Ok(None) => {
                warn!(key = %args.keyword_key, "no keywords stored under key");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "keyword store unavailable; no keywords to crawl");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    if crawl_keywords.is_empty() {
        info!("nothing to crawl");
        return Ok(());
    }

    let crawl_sources: Vec<SourceName> = if args.sources.is_empty() {
        SourceName::all().to_vec()
    } else {
        args.sources.iter().copied().unique().collect()
    };

    // Early check: output directory must be writable before crawling.
    if let Err(e) = tokio::fs::create_dir_all(&args.output_dir).await {
        error!(path = %args.output_dir, error = %e, "output directory is not writable");
        return Err(e.into());
    }

    let transport = HttpFetcher::new(Duration::from_secs(config.http_timeout_secs))?;
    let fetcher = if args.no_delay {
        SourceFetcher::with_delay_policy(transport, fetch::no_delay)
    } else {
        SourceFetcher::new(transport)
    };
    let orchestrator = CrawlOrchestrator::new(&fetcher, &config);

    info!(
        keywords = crawl_keywords.len(),
        sources = ?crawl_sources,
        count = args.count,
        "starting crawl"
    );

    // --- Crawl keywords concurrently ---
    let orchestrator_ref = &orchestrator;
    let sources_ref = &crawl_sources;
    let count = args.count;
    let results: Vec<CrawlResult> = stream::iter(crawl_keywords.iter())
        .map(|keyword| async move { orchestrator_ref.crawl(keyword, sources_ref, count).await })
        .buffer_unordered(PARALLEL_CRAWLS)
        .collect()
        .await;

    // --- Optional relevance scoring ---
    let scoring_key = args
        .scoring_api_key
        .clone()
        .or_else(|| config.scoring.as_ref().and_then(|s| s.api_key.clone()));
    if let (Some(scoring_config), Some(api_key)) = (config.scoring.as_ref(), scoring_key.as_deref())
    {
        let client = reqwest::Client::new();
        for result in &results {
            for record in result.records() {
                match scoring::score_record(&client, scoring_config, api_key, record, &result.keyword)
                    .await
                {
                    Ok(score) => info!(
                        keyword = %result.keyword,
                        url = %record.url,
                        overall = score.overall,
                        "scored record"
                    ),
                    Err(e) => warn!(
                        keyword = %result.keyword,
                        url = %record.url,
                        error = %e,
                        "scoring failed; keeping record unscored"
                    ),
                }
            }
        }
    }

    // --- Persist results ---
    let date = Local::now().date_naive();
    for result in &results {
        if result.is_total_failure() {
            warn!(keyword = %result.keyword, "every source failed for keyword");
        }
        if let Err(e) = outputs::json::write_crawl_result(result, &args.output_dir, date).await {
            error!(keyword = %result.keyword, error = %e, "failed to write crawl result");
        }
    }

    // --- Summary ---
    let total_records: usize = results.iter().map(CrawlResult::record_count).sum();
    let failed_sources = results
        .iter()
        .flat_map(|result| result.by_source.values())
        .filter(|outcome| matches!(outcome, SourceOutcome::Failed(_)))
        .count();
    let elapsed = start_time.elapsed();
    info!(
        keywords = results.len(),
        total_records,
        failed_sources,
        ?elapsed,
        "execution complete"
    );

    Ok(())
}
