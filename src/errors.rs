//! Per-layer error taxonomy.
//!
//! Each pipeline layer has its own error enum so a failure carries the
//! vocabulary of the layer that produced it: transport vs. status at the
//! fetch seam, missing-field vs. malformed-payload at extraction, and so
//! on. Types derive `thiserror::Error` for `Display`/`std::error::Error`.

use thiserror::Error;

/// How a transport-level request failed, independent of any HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    ConnectFailed,
    #[error("dns resolution failed")]
    DnsFailure,
}

/// A fetch either came back with a non-success HTTP status or never made
/// it past the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("non-success status: {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(TransportError),
}

/// Turning a source payload into `RawItem`s failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("malformed payload: missing or wrong-typed `{0}`")]
    MalformedPayload(String),
    #[error("missing field: `{0}`")]
    MissingField(String),
}

/// Turning a `RawItem` into a normalized `NewsRecord` failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("missing required field: `{0}`")]
    MissingRequiredField(&'static str),
    #[error("unparseable time: `{0}`")]
    UnparseableTime(String),
}

/// The sharded keyword cache could not be reached or used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Loading or parsing application configuration failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The optional LLM relevance-scoring call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("scoring request failed: {0}")]
    Request(String),
    #[error("malformed scoring reply: {0}")]
    Malformed(String),
}
