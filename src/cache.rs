//! Keyword store client over a set of sharded Redis nodes.
//!
//! Keys are flat strings of the form `<namespace>:<category>`; keys whose
//! namespace names a node directly (`node7001:korea_combination`) are
//! routed to the node listening on that port, everything else goes to the
//! first configured node. The partitioning scheme itself belongs to the
//! store deployment, not to this client.
//!
//! All JSON encoding and decoding of stored values happens here; callers
//! only ever see `Vec<String>`. Every failure — connect, command, or an
//! empty node list — surfaces as [`CacheError::Unavailable`] so callers
//! can degrade to "no keywords available" instead of crashing a crawl.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::errors::CacheError;

pub struct KeywordStore {
    nodes: Vec<StoreNode>,
    ttl_secs: Option<u64>,
}

struct StoreNode {
    port: u16,
    conn: ConnectionManager,
}

impl KeywordStore {
    /// Connect to every configured node up front; a store with an
    /// unreachable node is treated as unavailable as a whole.
    pub async fn connect(config: &CacheConfig) -> Result<KeywordStore, CacheError> {
        if config.nodes.is_empty() {
            return Err(CacheError::Unavailable("no cache nodes configured".to_string()));
        }
        let mut nodes = Vec::with_capacity(config.nodes.len());
        for node in &config.nodes {
            let url = format!("redis://{}:{}/", node.host, node.port);
            let client = redis::Client::open(url.as_str())
                .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            let conn = ConnectionManager::new(client)
                .await
                .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            debug!(host = %node.host, port = node.port, "connected keyword store node");
            nodes.push(StoreNode {
                port: node.port,
                conn,
            });
        }
        info!(nodes = nodes.len(), "keyword store ready");
        Ok(KeywordStore {
            nodes,
            ttl_secs: config.ttl_secs,
        })
    }

    /// Fetch a keyword list. `None` means the key is absent, which is not
    /// an error.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<String>>, CacheError> {
        let mut conn = self.node_for(key);
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(value.map(|raw| decode_list(&raw)))
    }

    /// Store a keyword list as JSON, honoring the configured TTL.
    pub async fn set(&self, key: &str, values: &[String]) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(values)
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        let value = encoded.as_str();
        let mut conn = self.node_for(key);
        match self.ttl_secs {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, value, ttl)
                    .await
                    .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            }
            None => {
                let _: () = conn
                    .set(key, value)
                    .await
                    .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            }
        }
        debug!(key, "stored keyword data");
        Ok(())
    }

    fn node_for(&self, key: &str) -> ConnectionManager {
        let index = match node_port(key) {
            Some(port) => self
                .nodes
                .iter()
                .position(|node| node.port == port)
                .unwrap_or(0),
            None => 0,
        };
        self.nodes[index].conn.clone()
    }
}

/// Parse the node port out of a `nodeNNNN:`-prefixed key.
fn node_port(key: &str) -> Option<u16> {
    let namespace = key.split(':').next()?;
    namespace.strip_prefix("node")?.parse().ok()
}

/// Stored values are JSON lists; single strings (raw generated queries or
/// pre-JSON writes) fall back to a one-element list.
fn decode_list(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list;
    }
    if let Ok(single) = serde_json::from_str::<String>(raw) {
        return vec![single];
    }
    vec![raw.to_string()]
}
