//! Data models shared across the crawl pipeline.
//!
//! - [`SourceName`]: the closed set of news sources we know how to crawl
//! - [`SourceQuery`]: one immutable fetch request, built per crawl
//! - [`RawItem`]: one unnormalized item as extracted from a payload
//! - [`NewsRecord`]: the canonical normalized news item
//! - [`CrawlResult`]: per-source outcome map for one keyword

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TransportError;

/// One external news origin with its own API or HTML shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    Naver,
    Daum,
    Google,
}

/// Whether a source answers with a JSON API body or scraped HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Html,
}

impl SourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Naver => "naver",
            SourceName::Daum => "daum",
            SourceName::Google => "google",
        }
    }

    pub fn all() -> [SourceName; 3] {
        [SourceName::Naver, SourceName::Daum, SourceName::Google]
    }

    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            SourceName::Naver | SourceName::Daum => PayloadKind::Json,
            SourceName::Google => PayloadKind::Html,
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naver" => Ok(SourceName::Naver),
            "daum" => Ok(SourceName::Daum),
            "google" => Ok(SourceName::Google),
            other => Err(format!("unknown source `{other}` (expected naver, daum, or google)")),
        }
    }
}

/// A fetched page body, already classified by source kind.
///
/// JSON bodies are parsed at the fetch boundary; a body that is not valid
/// JSON parses to `Value::Null`, which the extractor then reports as a
/// malformed payload.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Json(serde_json::Value),
    Html(String),
}

/// One item as pulled out of a raw payload, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub url: String,
    pub title: String,
    /// Original datetime text from the source, absolute or relative.
    pub datetime_text: String,
}

/// One fetch request: constructed per crawl invocation, immutable,
/// discarded after the fetch completes.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub source: SourceName,
    pub keyword: String,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

/// Canonical normalized news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    /// Unique within one crawl, not across sources.
    pub url: String,
    /// Cleaned of tags, entities, and tracking tokens.
    pub title: String,
    pub published_at: DateTime<Utc>,
    /// Original source time text, kept for display and debugging.
    pub relative_time_label: String,
}

/// Why one source produced no records this crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFailure {
    Status(u16),
    Transport(TransportError),
    MalformedPayload,
    CacheUnavailable,
}

/// Outcome of one source's pipeline within a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    Ok(Vec<NewsRecord>),
    Failed(SourceFailure),
}

impl SourceOutcome {
    pub fn records(&self) -> &[NewsRecord] {
        match self {
            SourceOutcome::Ok(records) => records,
            SourceOutcome::Failed(_) => &[],
        }
    }
}

/// Output of one orchestrated crawl: exactly one entry per requested
/// source, whether it succeeded or failed.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub keyword: String,
    pub by_source: HashMap<SourceName, SourceOutcome>,
}

impl CrawlResult {
    /// All surviving records across sources, in per-source extraction order.
    pub fn records(&self) -> impl Iterator<Item = &NewsRecord> {
        self.by_source.values().flat_map(|outcome| outcome.records().iter())
    }

    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    /// True when every requested source failed.
    pub fn is_total_failure(&self) -> bool {
        !self.by_source.is_empty()
            && self
                .by_source
                .values()
                .all(|outcome| matches!(outcome, SourceOutcome::Failed(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(url: &str) -> NewsRecord {
        NewsRecord {
            url: url.to_string(),
            title: "Title".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
            relative_time_label: "3 hours ago".to_string(),
        }
    }

    #[test]
    fn test_source_name_round_trip() {
        for source in SourceName::all() {
            assert_eq!(source.as_str().parse::<SourceName>().unwrap(), source);
        }
        assert!("reuters".parse::<SourceName>().is_err());
    }

    #[test]
    fn test_payload_kind_split() {
        assert_eq!(SourceName::Naver.payload_kind(), PayloadKind::Json);
        assert_eq!(SourceName::Daum.payload_kind(), PayloadKind::Json);
        assert_eq!(SourceName::Google.payload_kind(), PayloadKind::Html);
    }

    #[test]
    fn test_news_record_serde_round_trip() {
        let original = record("https://news.example/a");
        let json = serde_json::to_string(&original).unwrap();
        let back: NewsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_crawl_result_total_failure() {
        let mut by_source = HashMap::new();
        by_source.insert(
            SourceName::Naver,
            SourceOutcome::Failed(SourceFailure::Status(500)),
        );
        by_source.insert(
            SourceName::Daum,
            SourceOutcome::Failed(SourceFailure::Transport(TransportError::Timeout)),
        );
        let result = CrawlResult {
            keyword: "AI".to_string(),
            by_source,
        };
        assert!(result.is_total_failure());
        assert_eq!(result.record_count(), 0);
    }

    #[test]
    fn test_crawl_result_partial_success_is_not_total_failure() {
        let mut by_source = HashMap::new();
        by_source.insert(
            SourceName::Naver,
            SourceOutcome::Ok(vec![record("https://news.example/a")]),
        );
        by_source.insert(
            SourceName::Daum,
            SourceOutcome::Failed(SourceFailure::Status(500)),
        );
        let result = CrawlResult {
            keyword: "AI".to_string(),
            by_source,
        };
        assert!(!result.is_total_failure());
        assert_eq!(result.record_count(), 1);
    }

    #[test]
    fn test_crawl_result_serializes_sources_as_map_keys() {
        let mut by_source = HashMap::new();
        by_source.insert(SourceName::Google, SourceOutcome::Ok(vec![]));
        let result = CrawlResult {
            keyword: "AI".to_string(),
            by_source,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"google\""));
    }
}
