//! Naver news search API adapter.
//!
//! One GET against `{base}/news.json` authenticated with the client
//! id/secret header pair. The answer is JSON with an `items` array; the
//! original article link lives in `originallink` and the publication time
//! in RFC 2822 `pubDate`.

use serde_json::Value;

use crate::config::NaverConfig;
use crate::errors::ExtractionError;
use crate::extract::{JsonExtractHints, json_items};
use crate::models::{RawItem, SourceName, SourceQuery};

use super::display_size;

const HINTS: JsonExtractHints = JsonExtractHints {
    items_key: "items",
    url_key: "originallink",
    title_key: "title",
    datetime_key: "pubDate",
};

pub fn build_query(keyword: &str, count: u32, config: &NaverConfig) -> SourceQuery {
    SourceQuery {
        source: SourceName::Naver,
        keyword: keyword.to_string(),
        url: format!("{}/news.json", config.url.trim_end_matches('/')),
        params: vec![
            ("query".to_string(), keyword.to_string()),
            ("start".to_string(), "1".to_string()),
            ("display".to_string(), display_size(count).to_string()),
        ],
        headers: vec![
            ("X-Naver-Client-Id".to_string(), config.client_id.clone()),
            (
                "X-Naver-Client-Secret".to_string(),
                config.client_secret.clone(),
            ),
        ],
    }
}

pub fn extract(payload: &Value) -> Result<Vec<Result<RawItem, ExtractionError>>, ExtractionError> {
    Ok(json_items(payload, HINTS)?.collect())
}
