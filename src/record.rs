//! Normalization of raw items into canonical [`NewsRecord`]s.
//!
//! Title text arrives with HTML tags, entities, and tracking junk; time
//! text arrives either as an absolute stamp (Naver's RFC 2822 `pubDate`,
//! Daum's ISO-8601 `datetime`) or as a relative label ("3 hours ago",
//! "3시간 전"). Everything here is pure: the current time is injected so
//! the same input and the same clock always produce the same record.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::BuildError;
use crate::models::{NewsRecord, RawItem};

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(minutes?|hours?|days?|분|시간|일)\s*(?:ago|전)$").unwrap()
});

/// Query parameters stripped from record URLs.
const TRACKING_PARAMS: &[&str] = &["sa", "ved", "usg", "ei", "oq"];

/// Build one canonical record from a raw item against the given clock.
pub fn build(raw: &RawItem, now: DateTime<Utc>) -> Result<NewsRecord, BuildError> {
    let title = clean_title(&raw.title);
    if title.is_empty() {
        return Err(BuildError::MissingRequiredField("title"));
    }
    let url = scrub_url(&raw.url);
    if url.is_empty() {
        return Err(BuildError::MissingRequiredField("url"));
    }
    let published_at = resolve_published_at(&raw.datetime_text, now)?;
    Ok(NewsRecord {
        url,
        title,
        published_at,
        relative_time_label: raw.datetime_text.trim().to_string(),
    })
}

/// Strip tags and entities from anchor text and collapse whitespace.
pub fn clean_title(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let stripped = RE_TAGS.replace_all(&decoded, "");
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}

/// Drop known tracking query parameters from a record URL.
///
/// Non-URL text passes through trimmed; rejecting it is the builder's job
/// only when it is empty.
pub fn scrub_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (name, value) in &kept {
            pairs.append_pair(name, value);
        }
        drop(pairs);
    }
    url.to_string()
}

fn is_tracking_param(name: &str) -> bool {
    TRACKING_PARAMS.contains(&name) || name.starts_with("utm_")
}

/// Resolve a source time text to an absolute timestamp.
///
/// Absolute formats are tried first; otherwise the text must be a relative
/// expression with a minute/hour/day unit, resolved against `now`.
pub fn resolve_published_at(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, BuildError> {
    let trimmed = text.trim();
    if let Some(absolute) = parse_absolute(trimmed) {
        return Ok(absolute);
    }
    if let Some(captures) = RE_RELATIVE.captures(trimmed) {
        let count: i64 = captures[1]
            .parse()
            .map_err(|_| BuildError::UnparseableTime(trimmed.to_string()))?;
        let unit = captures[2].to_ascii_lowercase();
        let delta = if unit.starts_with("minute") || unit == "분" {
            Duration::minutes(count)
        } else if unit.starts_with("hour") || unit == "시간" {
            Duration::hours(count)
        } else if unit.starts_with("day") || unit == "일" {
            Duration::days(count)
        } else {
            return Err(BuildError::UnparseableTime(trimmed.to_string()));
        };
        return Ok(now - delta);
    }
    Err(BuildError::UnparseableTime(trimmed.to_string()))
}

/// True when the text reads as a time label, relative or absolute.
pub fn is_time_text(text: &str) -> bool {
    let trimmed = text.trim();
    RE_RELATIVE.is_match(trimmed) || parse_absolute(trimmed).is_some()
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}
