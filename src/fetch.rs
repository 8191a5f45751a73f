//! One network round-trip per source, with response classification.
//!
//! [`PageFetch`] is the narrow seam over the HTTP transport: everything
//! above it sees only `(status, body)` or a [`TransportError`]. Tests swap
//! in a scripted implementation; production uses [`HttpFetcher`] over one
//! shared `reqwest` client.
//!
//! [`SourceFetcher`] layers policy on top: the courtesy delay before an
//! HTML fetch returns, status classification, and JSON body parsing. It
//! never retries; retry decisions belong to whoever orchestrates crawls
//! over time.

use std::time::Duration;

use rand::Rng;
use tracing::{error, info, warn};

use crate::errors::{FetchError, TransportError};
use crate::models::{PayloadKind, RawPayload, SourceName, SourceQuery};
use crate::utils::truncate_for_log;

/// Minimal fetch interface: one GET, returning status code and body text.
pub trait PageFetch {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<(u16, String), TransportError>;
}

/// Maps a source to the pause applied before its fetch returns.
///
/// Kept as a plain function pointer so tests can pin it to zero.
pub type DelayPolicy = fn(SourceName) -> Duration;

/// Default policy: 1–5 s uniform for HTML scraping, nothing for JSON APIs.
/// The pause is rate-limit courtesy, not a correctness requirement.
pub fn courtesy_delay(source: SourceName) -> Duration {
    match source.payload_kind() {
        PayloadKind::Html => Duration::from_secs(rand::rng().random_range(1..=5)),
        PayloadKind::Json => Duration::ZERO,
    }
}

pub fn no_delay(_source: SourceName) -> Duration {
    Duration::ZERO
}

/// Classify a `reqwest` failure into the transport taxonomy.
///
/// `reqwest` has no dedicated DNS error kind; resolution failures surface
/// as connect errors whose message names the resolver.
pub fn classify_transport(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        return TransportError::Timeout;
    }
    let detail = format!("{e:?}").to_ascii_lowercase();
    if detail.contains("dns") || detail.contains("resolve") {
        TransportError::DnsFailure
    } else {
        TransportError::ConnectFailed
    }
}

/// Production transport: one shared client with a bounded per-call timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<HttpFetcher, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpFetcher { client })
    }
}

impl PageFetch for HttpFetcher {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<(u16, String), TransportError> {
        let mut request = self.client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify_transport(&e))?;
        Ok((status, body))
    }
}

/// Per-source fetch with delay policy and response classification.
pub struct SourceFetcher<F> {
    transport: F,
    delay: DelayPolicy,
}

impl<F: PageFetch> SourceFetcher<F> {
    pub fn new(transport: F) -> SourceFetcher<F> {
        SourceFetcher {
            transport,
            delay: courtesy_delay,
        }
    }

    pub fn with_delay_policy(transport: F, delay: DelayPolicy) -> SourceFetcher<F> {
        SourceFetcher { transport, delay }
    }

    /// Perform one fetch and classify the outcome.
    ///
    /// Transport failures are logged here and returned as values; nothing
    /// propagates as a panic or an unclassified error.
    pub async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        let delay = (self.delay)(query.source);
        let result = self
            .transport
            .get(&query.url, &query.params, &query.headers)
            .await;

        let (status, body) = match result {
            Ok(ok) => ok,
            Err(kind) => {
                error!(source = %query.source, keyword = %query.keyword, error = %kind, "fetch failed");
                return Err(FetchError::Transport(kind));
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        info!(
            source = %query.source,
            keyword = %query.keyword,
            delay_secs = delay.as_secs(),
            status,
            "fetched page"
        );

        if status != 200 {
            return Err(FetchError::Status(status));
        }

        match query.source.payload_kind() {
            PayloadKind::Html => Ok(RawPayload::Html(body)),
            PayloadKind::Json => {
                let value = serde_json::from_str(&body).unwrap_or_else(|e| {
                    warn!(
                        source = %query.source,
                        error = %e,
                        body = %truncate_for_log(&body, 200),
                        "response body is not valid JSON"
                    );
                    serde_json::Value::Null
                });
                Ok(RawPayload::Json(value))
            }
        }
    }
}
