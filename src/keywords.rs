//! Search-query generation.
//!
//! Keywords come in two lists — core subjects and context terms — plus a
//! set of question templates. One crawl keyword is a template with one
//! (core, context) pair substituted in; the full set is the cartesian
//! product over all templates, deduplicated. Generated sets are seeded
//! into the keyword store under the node-prefixed keys the crawler reads
//! back at startup.

use itertools::Itertools;
use serde::Deserialize;
use tracing::info;

use crate::cache::KeywordStore;
use crate::errors::CacheError;

/// Key the crawler reads its generated question list from.
pub const GENERATED_KEYWORDS_KEY: &str = "KR:default:core_keywords";

#[derive(Debug, Clone, Deserialize)]
pub struct QueryTemplates {
    pub core_keywords: Vec<String>,
    pub context_keywords: Vec<String>,
    /// Question templates with `{core}` and `{context}` placeholders.
    pub templates: Vec<String>,
}

impl QueryTemplates {
    /// Every (core, context) pairing, in list order.
    pub fn generate_search_queries(&self) -> Vec<(String, String)> {
        self.core_keywords
            .iter()
            .cartesian_product(self.context_keywords.iter())
            .map(|(core, context)| (core.clone(), context.clone()))
            .collect()
    }

    /// Substitute every pairing into every template, dropping duplicates
    /// while keeping first-seen order.
    pub fn apply_question_templates(&self, queries: &[(String, String)]) -> Vec<String> {
        self.templates
            .iter()
            .flat_map(|template| {
                queries.iter().map(move |(core, context)| {
                    template
                        .replace("{core}", core)
                        .replace("{context}", context)
                })
            })
            .unique()
            .collect()
    }
}

/// Seed the keyword store: base lists on the first node, combination
/// halves split across the shard-named keys, and the generated question
/// set under [`GENERATED_KEYWORDS_KEY`].
pub async fn seed_keyword_store(
    store: &KeywordStore,
    templates: &QueryTemplates,
) -> Result<(), CacheError> {
    let queries = templates.generate_search_queries();
    let combinations: Vec<String> = queries
        .iter()
        .map(|(core, context)| format!("{core} {context}"))
        .collect();
    let (front, back) = split_halves(&combinations);
    let questions = templates.apply_question_templates(&queries);

    let writes: [(&str, &[String]); 5] = [
        ("node7000:korea_keywords", templates.core_keywords.as_slice()),
        ("node7000:context_keywords", templates.context_keywords.as_slice()),
        ("node7001:korea_combination", front),
        ("node7002:korea_combination", back),
        (GENERATED_KEYWORDS_KEY, questions.as_slice()),
    ];
    for (key, values) in writes {
        store.set(key, values).await?;
        info!(key, count = values.len(), "seeded keyword data");
    }
    Ok(())
}

fn split_halves(values: &[String]) -> (&[String], &[String]) {
    values.split_at(values.len() / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> QueryTemplates {
        QueryTemplates {
            core_keywords: vec!["인공지능".to_string(), "딥러닝".to_string()],
            context_keywords: vec!["규제".to_string(), "전망".to_string()],
            templates: vec![
                "{core} {context} 최신 동향은?".to_string(),
                "{core} {context}".to_string(),
            ],
        }
    }

    #[test]
    fn test_search_queries_are_full_product() {
        let queries = templates().generate_search_queries();
        assert_eq!(queries.len(), 4);
        assert_eq!(
            queries[0],
            ("인공지능".to_string(), "규제".to_string())
        );
        assert_eq!(
            queries[3],
            ("딥러닝".to_string(), "전망".to_string())
        );
    }

    #[test]
    fn test_templates_substitute_both_placeholders() {
        let t = templates();
        let questions = t.apply_question_templates(&t.generate_search_queries());
        assert_eq!(questions.len(), 8);
        assert!(questions.contains(&"인공지능 규제 최신 동향은?".to_string()));
        assert!(questions.contains(&"딥러닝 전망".to_string()));
    }

    #[test]
    fn test_duplicate_questions_are_removed() {
        let t = QueryTemplates {
            core_keywords: vec!["AI".to_string()],
            context_keywords: vec!["trend".to_string()],
            templates: vec!["{core} {context}".to_string(), "{core} {context}".to_string()],
        };
        let questions = t.apply_question_templates(&t.generate_search_queries());
        assert_eq!(questions, vec!["AI trend".to_string()]);
    }

    #[test]
    fn test_split_halves() {
        let values: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let (front, back) = split_halves(&values);
        assert_eq!(front.len(), 2);
        assert_eq!(back.len(), 3);
    }
}
