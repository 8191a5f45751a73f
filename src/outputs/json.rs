//! JSON persistence for crawl results.
//!
//! One file per keyword per day:
//!
//! ```text
//! output_dir/
//! └── 2024-01-10/
//!     ├── 인공지능-규제.json
//!     └── ai-trend.json
//! ```

use std::error::Error;

use chrono::NaiveDate;
use tokio::fs;
use tracing::{error, info};

use crate::models::CrawlResult;
use crate::utils::slugify_keyword;

/// Write one crawl result under its dated directory.
pub async fn write_crawl_result(
    result: &CrawlResult,
    output_dir: &str,
    date: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(result)?;

    let dir = format!("{}/{}", output_dir.trim_end_matches('/'), date);
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(%dir, error = %e, "failed to create output dir");
        return Err(e.into());
    }

    let path = format!("{}/{}.json", dir, slugify_keyword(&result.keyword));
    fs::write(&path, json).await?;
    info!(%path, records = result.record_count(), "wrote crawl result");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceName, SourceOutcome};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_write_creates_dated_file() {
        let dir = std::env::temp_dir().join("trend_news_crawler_json_test");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        let out = dir.to_str().unwrap();

        let mut by_source = HashMap::new();
        by_source.insert(SourceName::Naver, SourceOutcome::Ok(vec![]));
        let result = CrawlResult {
            keyword: "AI trend".to_string(),
            by_source,
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        write_crawl_result(&result, out, date).await.unwrap();

        let path = dir.join("2024-01-10").join("ai-trend.json");
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("\"keyword\":\"AI trend\""));
        assert!(written.contains("\"naver\""));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
