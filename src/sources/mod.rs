//! Per-source adapters.
//!
//! Each source is one variant of the closed [`SourceName`] set with two
//! customization points: how its query is built (endpoint, auth headers,
//! paging parameters) and how items come out of its payload. Dispatch is a
//! plain match — there is no inheritance chain to follow, just one module
//! per source.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Naver  | [`naver`]  | news search JSON API (client id/secret headers) |
//! | Daum   | [`daum`]   | Kakao search JSON API (`KakaoAK` auth header) |
//! | Google | [`google`] | news-tab HTML scraping |

pub mod daum;
pub mod google;
pub mod naver;

use crate::config::AppConfig;
use crate::errors::ExtractionError;
use crate::models::{RawItem, RawPayload, SourceName, SourceQuery};

/// Build the immutable fetch query for one source and keyword.
pub fn build_query(
    source: SourceName,
    keyword: &str,
    count: u32,
    config: &AppConfig,
) -> SourceQuery {
    match source {
        SourceName::Naver => naver::build_query(keyword, count, &config.naver),
        SourceName::Daum => daum::build_query(keyword, count, &config.daum),
        SourceName::Google => google::build_query(keyword, count, &config.google),
    }
}

/// Walk one source's payload into raw items.
///
/// The outer error is source-level (malformed payload, wrong payload kind);
/// inner per-item errors mark items the caller should drop.
pub fn extract(
    source: SourceName,
    payload: &RawPayload,
) -> Result<Vec<Result<RawItem, ExtractionError>>, ExtractionError> {
    match (source, payload) {
        (SourceName::Naver, RawPayload::Json(value)) => naver::extract(value),
        (SourceName::Daum, RawPayload::Json(value)) => daum::extract(value),
        (SourceName::Google, RawPayload::Html(body)) => Ok(google::extract(body)),
        _ => Err(ExtractionError::MalformedPayload(
            "payload kind does not match source".to_string(),
        )),
    }
}

/// Display size requested from the APIs: ten results per requested page.
pub(crate) fn display_size(count: u32) -> u32 {
    count.max(1) * 10
}
