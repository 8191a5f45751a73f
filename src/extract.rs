//! JSON payload extraction.
//!
//! API sources differ only in which top-level key holds the item array and
//! which field names carry url/title/datetime, so extraction is one walk
//! parameterized by [`JsonExtractHints`]. Items are yielded lazily by
//! [`JsonItems`]; calling [`json_items`] again restarts the walk, and the
//! payload is never materialized into an intermediate tree.

use serde_json::Value;

use crate::errors::ExtractionError;
use crate::models::RawItem;

/// Field names used to walk one source's JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonExtractHints {
    pub items_key: &'static str,
    pub url_key: &'static str,
    pub title_key: &'static str,
    pub datetime_key: &'static str,
}

impl Default for JsonExtractHints {
    fn default() -> Self {
        JsonExtractHints {
            items_key: "items",
            url_key: "url",
            title_key: "title",
            datetime_key: "datetime",
        }
    }
}

/// Lazy iterator over the item array of one JSON payload.
///
/// Each element is either a [`RawItem`] or a per-item
/// [`ExtractionError::MissingField`]; the caller decides to drop the item,
/// extraction itself never aborts once the array was found.
#[derive(Debug)]
pub struct JsonItems<'a> {
    items: std::slice::Iter<'a, Value>,
    hints: JsonExtractHints,
}

impl<'a> Iterator for JsonItems<'a> {
    type Item = Result<RawItem, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        Some(raw_item(item, &self.hints))
    }
}

/// Begin a lazy walk over `payload[hints.items_key]`.
///
/// An absent or non-array top-level key means the payload does not have
/// the shape this source promises; that is a source-level
/// [`ExtractionError::MalformedPayload`], not an empty success.
pub fn json_items(
    payload: &Value,
    hints: JsonExtractHints,
) -> Result<JsonItems<'_>, ExtractionError> {
    let items = payload
        .get(hints.items_key)
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractionError::MalformedPayload(hints.items_key.to_string()))?;
    Ok(JsonItems {
        items: items.iter(),
        hints,
    })
}

fn raw_item(item: &Value, hints: &JsonExtractHints) -> Result<RawItem, ExtractionError> {
    let field = |key: &str| -> Result<String, ExtractionError> {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::MissingField(key.to_string()))
    };
    Ok(RawItem {
        url: field(hints.url_key)?,
        title: field(hints.title_key)?,
        datetime_text: field(hints.datetime_key)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_top_level_key_is_malformed_payload() {
        let payload = json!({"unexpected_key": []});
        let err = json_items(&payload, JsonExtractHints::default()).unwrap_err();
        assert_eq!(err, ExtractionError::MalformedPayload("items".to_string()));
    }

    #[test]
    fn test_non_array_top_level_key_is_malformed_payload() {
        let payload = json!({"items": "not an array"});
        assert!(json_items(&payload, JsonExtractHints::default()).is_err());
    }

    #[test]
    fn test_null_payload_is_malformed() {
        assert!(json_items(&Value::Null, JsonExtractHints::default()).is_err());
    }

    #[test]
    fn test_items_extracted_in_document_order() {
        let payload = json!({"items": [
            {"url": "https://a", "title": "A", "datetime": "3 hours ago"},
            {"url": "https://b", "title": "B", "datetime": "1 day ago"},
        ]});
        let items: Vec<_> = json_items(&payload, JsonExtractHints::default())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url, "https://a");
        assert_eq!(items[1].title, "B");
    }

    #[test]
    fn test_missing_datetime_drops_only_that_item() {
        let payload = json!({"items": [
            {"url": "https://a", "title": "A", "datetime": "3 hours ago"},
            {"url": "https://b", "title": "B"},
            {"url": "https://c", "title": "C", "datetime": "1 day ago"},
        ]});
        let results: Vec<_> = json_items(&payload, JsonExtractHints::default())
            .unwrap()
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(ExtractionError::MissingField("datetime".to_string()))
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_custom_field_hints() {
        let hints = JsonExtractHints {
            items_key: "documents",
            url_key: "originallink",
            title_key: "title",
            datetime_key: "pubDate",
        };
        let payload = json!({"documents": [
            {"originallink": "https://a", "title": "A", "pubDate": "Wed, 10 Jan 2024 12:00:00 +0900"},
        ]});
        let items: Vec<_> = json_items(&payload, hints)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(items[0].url, "https://a");
        assert_eq!(items[0].datetime_text, "Wed, 10 Jan 2024 12:00:00 +0900");
    }

    #[test]
    fn test_walk_is_restartable() {
        let payload = json!({"items": [
            {"url": "https://a", "title": "A", "datetime": "3 hours ago"},
        ]});
        let first: Vec<_> = json_items(&payload, JsonExtractHints::default())
            .unwrap()
            .collect();
        let second: Vec<_> = json_items(&payload, JsonExtractHints::default())
            .unwrap()
            .collect();
        assert_eq!(first, second);
    }
}
