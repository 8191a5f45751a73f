//! Google news-tab HTML adapter.
//!
//! No API here: one GET against the search endpoint with `tbm=nws` and
//! Korean locale parameters, then a DOM walk. Result entries are grouped in
//! `data-hveid` containers; each holds an anchor (often a `/url?q=…`
//! redirect that must be unwrapped) and a span with the relative age of
//! the article.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::config::GoogleConfig;
use crate::errors::ExtractionError;
use crate::models::{RawItem, SourceName, SourceQuery};
use crate::record::is_time_text;

use super::display_size;

/// Anchor text is capped; Google repeats the snippet inside the link.
const TITLE_MAX_CHARS: usize = 64;

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("div[data-hveid]").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TIME_LABEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

pub fn build_query(keyword: &str, count: u32, config: &GoogleConfig) -> SourceQuery {
    SourceQuery {
        source: SourceName::Google,
        keyword: keyword.to_string(),
        url: config.url.clone(),
        params: vec![
            ("q".to_string(), keyword.to_string()),
            ("tbm".to_string(), "nws".to_string()),
            ("gl".to_string(), "ko".to_string()),
            ("hl".to_string(), "kr".to_string()),
            ("num".to_string(), display_size(count).to_string()),
        ],
        headers: vec![("User-Agent".to_string(), config.user_agent.clone())],
    }
}

/// Walk the result page into raw items.
///
/// A page without any result container is an empty result, not an error;
/// containers missing an anchor or a time label surface as per-item
/// `MissingField` errors so the caller can drop just those entries.
pub fn extract(html: &str) -> Vec<Result<RawItem, ExtractionError>> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();

    for container in document.select(&CONTAINER) {
        let Some(anchor) = container.select(&ANCHOR).next() else {
            out.push(Err(ExtractionError::MissingField("a[href]".to_string())));
            continue;
        };
        let href = anchor.value().attr("href").unwrap_or_default();
        let Some(url) = resolve_link(href) else {
            out.push(Err(ExtractionError::MissingField("a[href]".to_string())));
            continue;
        };

        let title: String = anchor
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        let title: String = title.chars().take(TITLE_MAX_CHARS).collect();

        let Some(label) = container
            .select(&TIME_LABEL)
            .map(|span| span.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .find(|text| is_time_text(text))
        else {
            out.push(Err(ExtractionError::MissingField("time label".to_string())));
            continue;
        };

        out.push(Ok(RawItem {
            url,
            title,
            datetime_text: label,
        }));
    }

    out
}

/// Resolve a result anchor to the article URL.
///
/// Relative links are joined against the search origin; `/url` redirect
/// links are unwrapped to their `q` target.
fn resolve_link(href: &str) -> Option<String> {
    static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.google.com/").unwrap());
    let resolved = BASE.join(href).ok()?;
    if resolved.path() == "/url" {
        resolved
            .query_pairs()
            .find(|(name, _)| name == "q" || name == "url")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(resolved.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleConfig {
        GoogleConfig::default()
    }

    #[test]
    fn test_query_shape() {
        let query = build_query("AI 규제", 1, &config());
        assert_eq!(query.url, "https://www.google.com/search");
        assert!(query.params.contains(&("tbm".to_string(), "nws".to_string())));
        assert!(query.params.contains(&("gl".to_string(), "ko".to_string())));
        assert!(query.params.contains(&("hl".to_string(), "kr".to_string())));
        assert!(query.headers.iter().any(|(name, _)| name == "User-Agent"));
    }

    #[test]
    fn test_extract_unwraps_redirect_links() {
        let html = r#"
            <div data-hveid="x1">
              <a href="/url?q=https://news.example/google-1&sa=U&ved=2ahUKE">
                <h3>Regulators weigh new AI rules</h3>
              </a>
              <span>publisher</span>
              <span>3 hours ago</span>
            </div>
        "#;
        let items = extract(html);
        assert_eq!(items.len(), 1);
        let item = items[0].as_ref().unwrap();
        assert_eq!(item.url, "https://news.example/google-1");
        assert_eq!(item.title, "Regulators weigh new AI rules");
        assert_eq!(item.datetime_text, "3 hours ago");
    }

    #[test]
    fn test_extract_keeps_absolute_links() {
        let html = r#"
            <div data-hveid="x1">
              <a href="https://news.example/google-2"><h3>Headline</h3></a>
              <span>1 day ago</span>
            </div>
        "#;
        let item = extract(html)[0].clone().unwrap();
        assert_eq!(item.url, "https://news.example/google-2");
    }

    #[test]
    fn test_container_without_anchor_is_item_error() {
        let html = r#"
            <div data-hveid="x1"><span>3 hours ago</span></div>
            <div data-hveid="x2">
              <a href="https://news.example/ok"><h3>Fine</h3></a>
              <span>1 day ago</span>
            </div>
        "#;
        let items = extract(html);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(ExtractionError::MissingField(_))));
        assert!(items[1].is_ok());
    }

    #[test]
    fn test_container_without_time_label_is_item_error() {
        let html = r#"
            <div data-hveid="x1">
              <a href="https://news.example/no-time"><h3>Headline</h3></a>
              <span>publisher name</span>
            </div>
        "#;
        let items = extract(html);
        assert_eq!(
            items[0],
            Err(ExtractionError::MissingField("time label".to_string()))
        );
    }

    #[test]
    fn test_page_without_containers_is_empty() {
        assert!(extract("<html><body><p>nothing</p></body></html>").is_empty());
    }

    #[test]
    fn test_title_is_truncated() {
        let long = "word ".repeat(40);
        let html = format!(
            r#"<div data-hveid="x"><a href="https://news.example/a"><h3>{long}</h3></a><span>2 days ago</span></div>"#
        );
        let item = extract(&html)[0].clone().unwrap();
        assert!(item.title.chars().count() <= TITLE_MAX_CHARS);
    }
}
