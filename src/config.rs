//! Application configuration.
//!
//! All configuration is read from one YAML file into [`AppConfig`] at
//! process start and passed by reference from there on; nothing in this
//! crate reads configuration from module-level state.
//!
//! ```yaml
//! naver:
//!   client_id: "..."
//!   client_secret: "..."
//! daum:
//!   api_key: "..."
//! cache:
//!   nodes:
//!     - { host: "127.0.0.1", port: 7000 }
//!     - { host: "127.0.0.1", port: 7001 }
//!   ttl_secs: 86400
//! keywords:
//!   core_keywords: ["인공지능", "딥러닝"]
//!   context_keywords: ["규제", "전망"]
//!   templates: ["{core} {context}"]
//! ```

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::keywords::QueryTemplates;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub naver: NaverConfig,
    pub daum: DaumConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub keywords: Option<QueryTemplates>,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    /// Per-request time limit; timeouts classify as transport errors.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<AppConfig, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NaverConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_naver_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaumConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_daum_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_google_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        GoogleConfig {
            url: default_google_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_nodes")]
    pub nodes: Vec<CacheNode>,
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            nodes: default_cache_nodes(),
            ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheNode {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_scoring_url")]
    pub api_url: String,
    #[serde(default = "default_scoring_model")]
    pub model: String,
    /// Usually supplied via `OPENAI_API_KEY` instead of the config file.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_naver_url() -> String {
    "https://openapi.naver.com/v1/search".to_string()
}

fn default_daum_url() -> String {
    "https://dapi.kakao.com/v2/search/web".to_string()
}

fn default_google_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_cache_nodes() -> Vec<CacheNode> {
    vec![CacheNode {
        host: "127.0.0.1".to_string(),
        port: 6379,
    }]
}

fn default_scoring_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_scoring_model() -> String {
    "gpt-4o".to_string()
}
