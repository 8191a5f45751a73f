//! Daum (Kakao) search API adapter.
//!
//! One GET against the Kakao web-search endpoint with a `KakaoAK` bearer
//! header. The news scope rides on the query string itself; the answer is
//! JSON with a `documents` array using the default field names.

use serde_json::Value;

use crate::config::DaumConfig;
use crate::errors::ExtractionError;
use crate::extract::{JsonExtractHints, json_items};
use crate::models::{RawItem, SourceName, SourceQuery};

use super::display_size;

const HINTS: JsonExtractHints = JsonExtractHints {
    items_key: "documents",
    url_key: "url",
    title_key: "title",
    datetime_key: "datetime",
};

pub fn build_query(keyword: &str, count: u32, config: &DaumConfig) -> SourceQuery {
    SourceQuery {
        source: SourceName::Daum,
        keyword: keyword.to_string(),
        url: config.url.clone(),
        params: vec![
            ("query".to_string(), format!("{keyword} /news")),
            ("page".to_string(), "1".to_string()),
            ("size".to_string(), display_size(count).to_string()),
        ],
        headers: vec![(
            "Authorization".to_string(),
            format!("KakaoAK {}", config.api_key),
        )],
    }
}

pub fn extract(payload: &Value) -> Result<Vec<Result<RawItem, ExtractionError>>, ExtractionError> {
    Ok(json_items(payload, HINTS)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> DaumConfig {
        DaumConfig {
            api_key: "kakao-key".to_string(),
            url: "https://dapi.kakao.com/v2/search/web".to_string(),
        }
    }

    #[test]
    fn test_query_shape() {
        let query = build_query("AI", 1, &config());
        assert_eq!(query.url, "https://dapi.kakao.com/v2/search/web");
        assert!(
            query
                .params
                .contains(&("query".to_string(), "AI /news".to_string()))
        );
        assert!(query.params.contains(&("size".to_string(), "10".to_string())));
        assert_eq!(
            query.headers,
            vec![("Authorization".to_string(), "KakaoAK kakao-key".to_string())]
        );
    }

    #[test]
    fn test_extract_reads_daum_fields() {
        let payload = json!({"documents": [
            {
                "title": "생성형 AI 전망",
                "url": "https://news.example/daum-1",
                "datetime": "2024-01-10T21:00:00.000+09:00"
            }
        ]});
        let items = extract(&payload).unwrap();
        let item = items[0].as_ref().unwrap();
        assert_eq!(item.url, "https://news.example/daum-1");
        assert_eq!(item.datetime_text, "2024-01-10T21:00:00.000+09:00");
    }

    #[test]
    fn test_extract_flags_malformed_payload() {
        let payload = json!({"items": []});
        assert_eq!(
            extract(&payload).unwrap_err(),
            ExtractionError::MalformedPayload("documents".to_string())
        );
    }
}
