//! Optional LLM relevance scoring for collected records.
//!
//! Strictly post-processing: nothing in the crawl pipeline depends on it,
//! it only runs when an API key is configured, and a scoring failure is a
//! log line, never a crawl failure. The seam is the [`Ask`] trait; the
//! production implementation is one OpenAI-compatible chat-completions
//! call, and [`RetryAsk`] layers exponential backoff with jitter on top of
//! any implementation.

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::errors::ScoreError;
use crate::models::NewsRecord;

/// Send one prompt, get the model's text back.
pub trait Ask {
    async fn ask(&self, prompt: &str) -> Result<String, ScoreError>;
}

/// Retry decorator: exponential backoff from `base_delay`, capped at
/// `max_delay`, with 0–250 ms of jitter per attempt.
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: Ask> RetryAsk<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> RetryAsk<T> {
        RetryAsk {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T: Ask> Ask for RetryAsk<T> {
    async fn ask(&self, prompt: &str) -> Result<String, ScoreError> {
        let mut attempt = 0usize;
        loop {
            match self.inner.ask(prompt).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(error);
                    }
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rand::rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);
                    warn!(attempt, max = self.max_retries, error = %error, ?delay, "scoring attempt failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// One OpenAI-compatible chat-completions round-trip.
pub struct ChatCompletions<'a> {
    pub client: &'a reqwest::Client,
    pub config: &'a ScoringConfig,
    pub api_key: &'a str,
}

impl Ask for ChatCompletions<'_> {
    async fn ask(&self, prompt: &str) -> Result<String, ScoreError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You rate news articles for relevance. Reply with JSON only."
                },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": 300
        });
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoreError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoreError::Request(format!("http status {status}")));
        }
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScoreError::Request(e.to_string()))?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScoreError::Malformed("no message content in response".to_string()))
    }
}

/// Model's verdict on one record. Criteria scores are 0–5, overall 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelevanceScore {
    pub keyword_importance: u8,
    pub trend_relevance: u8,
    pub source_trust: u8,
    pub overall: u8,
}

pub fn score_prompt(record: &NewsRecord, keyword: &str) -> String {
    format!(
        "News article found for the search keyword \"{keyword}\":\n\
         title: {title}\n\
         url: {url}\n\
         published: {published}\n\n\
         Rate it on these criteria:\n\
         1. keyword_importance (0-5): how central the keyword is to the article\n\
         2. trend_relevance (0-5): how related it is to current AI trends\n\
         3. source_trust (0-5): how trustworthy the source looks\n\
         4. overall (0-100): combined value of this article\n\n\
         Answer with a JSON object using exactly those four keys.",
        title = record.title,
        url = record.url,
        published = record.published_at.to_rfc3339(),
    )
}

/// Pull the JSON object out of a model reply that may be fenced or padded
/// with prose.
pub fn parse_score(content: &str) -> Result<RelevanceScore, ScoreError> {
    let start = content
        .find('{')
        .ok_or_else(|| ScoreError::Malformed("no JSON object in reply".to_string()))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| ScoreError::Malformed("no JSON object in reply".to_string()))?;
    serde_json::from_str(&content[start..=end]).map_err(|e| ScoreError::Malformed(e.to_string()))
}

/// Score one record with retries. Up to 5 attempts, backoff from 1 s.
pub async fn score_record(
    client: &reqwest::Client,
    config: &ScoringConfig,
    api_key: &str,
    record: &NewsRecord,
    keyword: &str,
) -> Result<RelevanceScore, ScoreError> {
    let api = RetryAsk::new(
        ChatCompletions {
            client,
            config,
            api_key,
        },
        5,
        Duration::from_secs(1),
    );
    let reply = api.ask(&score_prompt(record, keyword)).await?;
    parse_score(&reply)
}
