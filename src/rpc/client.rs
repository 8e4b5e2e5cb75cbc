//! Blocking HTTP client for the node's REST surface (spec §4.8/§6).
//!
//! The core forge/crypto modules are purely functional; this client is the
//! one place the crate touches I/O, and it holds an explicit,
//! caller-managed connection pool (spec §5: `init`/`shutdown` lifecycle,
//! no background tasks, no internal queues).

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::{DEFAULT_RPC_POOL_IDLE_PER_HOST, DEFAULT_RPC_TIMEOUT_SECS};
use crate::rpc::error::RpcError;

/// Connection-pool and timeout configuration for [`NodeClient::new`].
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub idle_per_host: usize,
    pub request_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            idle_per_host: DEFAULT_RPC_POOL_IDLE_PER_HOST,
            request_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        }
    }
}

/// A blocking client over a single Tezos-format node's RPC surface.
pub struct NodeClient {
    http: Client,
    base_url: String,
}

impl NodeClient {
    /// Builds a client with a warmed-up connection pool per `pool_cfg`.
    /// `base_url` must not have a trailing slash (e.g. `http://localhost:8732`).
    pub fn new(base_url: impl Into<String>, pool_cfg: PoolConfig) -> Result<Self, RpcError> {
        let http = Client::builder()
            .timeout(pool_cfg.request_timeout)
            .pool_max_idle_per_host(pool_cfg.idle_per_host)
            .build()?;
        Ok(Self { http, base_url: base_url.into() })
    }

    /// Releases the underlying connection pool. Consuming `self` makes the
    /// lifecycle explicit: there is nothing left to call afterward.
    pub fn shutdown(self) {
        debug!("shutting down node client for {}", self.base_url);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, RpcError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let status_code = status.as_u16();
            let body = response.text().unwrap_or_default();
            warn!("node returned {} for a request: {}", status_code, body);
            Err(RpcError::RpcError { status: status_code, body })
        }
    }

    /// `GET /chains/main/blocks/{id}` — `id` is usually `"head"` or `"head~N"`.
    pub fn get_block(&self, id: &str) -> Result<Value, RpcError> {
        let url = self.url(&format!("/chains/main/blocks/{id}"));
        debug!("GET {url}");
        let response = Self::check_status(self.http.get(&url).send()?)?;
        Ok(response.json()?)
    }

    /// `GET /chains/main/blocks/head/context/contracts/{pkh}/counter`.
    pub fn get_counter(&self, pkh: &str) -> Result<i64, RpcError> {
        let url = self.url(&format!(
            "/chains/main/blocks/head/context/contracts/{pkh}/counter"
        ));
        debug!("GET {url}");
        let response = Self::check_status(self.http.get(&url).send()?)?;
        let value: Value = response.json()?;
        let counter = value
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| value.as_i64())
            .unwrap_or(0);
        Ok(counter)
    }

    /// Convenience over [`Self::get_counter`]: the next counter a caller
    /// should use when building a manager operation (spec §5: callers must
    /// serialize concurrent allocation themselves).
    pub fn get_next_counter_for_account(&self, pkh: &str) -> Result<i64, RpcError> {
        Ok(self.get_counter(pkh)? + 1)
    }

    /// `POST /chains/main/blocks/head/helpers/preapply/operations`.
    pub fn preapply_operations(&self, body: &Value) -> Result<Value, RpcError> {
        let url = self.url("/chains/main/blocks/head/helpers/preapply/operations");
        debug!("POST {url}");
        let response = Self::check_status(self.http.post(&url).json(body).send()?)?;
        Ok(response.json()?)
    }

    /// `POST /injection/operation` with a lowercase-hex body of the forged
    /// bytes concatenated with the raw signature bytes (spec §6).
    pub fn inject_operation(&self, forged_hex: &str, signature_hex: &str) -> Result<String, RpcError> {
        let url = self.url("/injection/operation");
        let body = Value::String(format!("{forged_hex}{signature_hex}"));
        debug!("POST {url}");
        let response = Self::check_status(self.http.post(&url).json(&body).send()?)?;
        let value: Value = response.json()?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient").field("base_url", &self.base_url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_defaults_match_config_constants() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.idle_per_host, DEFAULT_RPC_POOL_IDLE_PER_HOST);
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS));
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = NodeClient::new("http://localhost:8732", PoolConfig::default()).unwrap();
        assert_eq!(
            client.url("/chains/main/blocks/head"),
            "http://localhost:8732/chains/main/blocks/head"
        );
    }
}
