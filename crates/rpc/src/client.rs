//! A single JSON-RPC-over-HTTP endpoint.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RpcError;

/// One configured endpoint. Stateless beyond the URL and an HTTP client;
/// retry/failover bookkeeping lives in [`crate::pool::RpcPool`].
#[derive(Debug, Clone)]
pub struct JsonRpcEndpoint {
    url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues one JSON-RPC call and decodes `result` as `T`. A 429 status or
    /// an RPC error object with `code == 429` (or a message containing
    /// `"rate limit"`) is surfaced as [`RpcError::RateLimited`] so the pool
    /// can rotate without consuming a retry slot.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| RpcError::Transport {
                endpoint: self.url.clone(),
                source,
            })?;

        if response.status().as_u16() == 429 {
            return Err(RpcError::RateLimited {
                endpoint: self.url.clone(),
            });
        }

        let body: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|source| RpcError::Transport {
                endpoint: self.url.clone(),
                source,
            })?;

        if let Some(error) = body.error {
            if error.code == 429 || error.message.to_lowercase().contains("rate limit") {
                return Err(RpcError::RateLimited {
                    endpoint: self.url.clone(),
                });
            }
            return Err(RpcError::RpcReturnedError {
                endpoint: self.url.clone(),
                code: error.code,
                message: error.message,
            });
        }

        body.result.ok_or_else(|| RpcError::RpcReturnedError {
            endpoint: self.url.clone(),
            code: 0,
            message: "response had neither result nor error".to_string(),
        })
    }

    pub async fn block_number(&self) -> Result<String, RpcError> {
        self.call("eth_blockNumber", json!([])).await
    }

    pub async fn get_block_by_number(&self, number: u64) -> Result<Option<Value>, RpcError> {
        self.call(
            "eth_getBlockByNumber",
            json!([format!("0x{:x}", number), true]),
        )
        .await
    }

    /// `topic0_candidates` is an OR-set for the log's topic0 (standard
    /// `eth_getLogs` array-at-position semantics: `"topics": [[a,b,c]]`
    /// matches a log whose topic0 is any of `a`, `b`, `c`). Positions 1+ are
    /// left unconstrained since the classifier itself picks apart the
    /// remaining indexed topics per signature.
    pub async fn get_logs(
        &self,
        from_block: u64,
        to_block: u64,
        topic0_candidates: &[&str],
    ) -> Result<Value, RpcError> {
        self.call(
            "eth_getLogs",
            json!([{
                "fromBlock": format!("0x{:x}", from_block),
                "toBlock": format!("0x{:x}", to_block),
                "topics": [topic0_candidates],
            }]),
        )
        .await
    }

    pub async fn chain_id(&self) -> Result<String, RpcError> {
        self.call("eth_chainId", json!([])).await
    }
}
