//! Round-robin pool of JSON-RPC endpoints with rate-limit failover.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy_primitives::B256;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::JsonRpcEndpoint;
use crate::error::RpcError;
use crate::types::{Block, Log, RawBlock, RawLog};

/// Client interface the Block Processor drives. A trait (rather than a
/// concrete `RpcPool` reference) so the processor can be tested against a
/// mock.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn get_block(&self, number: u64) -> Result<Block, RpcError>;
    /// Fetches every log in `block_number` whose topic0 is any of
    /// `topic0_candidates` (one `eth_getLogs` call per block).
    async fn get_logs(&self, block_number: u64, topic0_candidates: &[B256]) -> Result<Vec<Log>, RpcError>;
    async fn get_head(&self) -> Result<u64, RpcError>;
}

/// Ordered endpoints tried in sequence, with a process-owned (not
/// process-wide) current index. `chain_id` is bound once at construction
/// and never re-probed per call.
#[derive(Debug)]
pub struct RpcPool {
    endpoints: Vec<JsonRpcEndpoint>,
    index: AtomicUsize,
    chain_id: u64,
    retries: u32,
}

impl RpcPool {
    pub fn new(urls: Vec<String>, chain_id: u64, retries: u32) -> Result<Self, RpcError> {
        if urls.is_empty() {
            return Err(RpcError::NoEndpoints);
        }
        Ok(Self {
            endpoints: urls.into_iter().map(JsonRpcEndpoint::new).collect(),
            index: AtomicUsize::new(0),
            chain_id,
            retries,
        })
    }

    /// Runs an optional startup healthcheck: probes `eth_chainId` on the
    /// current endpoint and logs a warning (never errors) if it disagrees
    /// with the bound `chain_id`. Per spec, this never gates startup on a
    /// degraded endpoint.
    pub async fn healthcheck(&self) {
        let endpoint = &self.endpoints[self.index.load(Ordering::Relaxed)];
        match endpoint.chain_id().await {
            Ok(hex) => {
                if let Ok(probed) = u64::from_str_radix(hex.trim_start_matches("0x"), 16) {
                    if probed != self.chain_id {
                        warn!(
                            bound = self.chain_id,
                            probed,
                            endpoint = endpoint.url(),
                            "endpoint chain id disagrees with bound chain id"
                        );
                    }
                }
            }
            Err(error) => {
                warn!(%error, endpoint = endpoint.url(), "startup chain id healthcheck failed, continuing");
            }
        }
    }

    fn current(&self) -> usize {
        self.index.load(Ordering::Relaxed) % self.endpoints.len()
    }

    fn rotate(&self) {
        self.index.fetch_add(1, Ordering::Relaxed);
    }

    /// Drives one logical RPC call across the endpoint pool: `R` retries
    /// with linear backoff per endpoint, immediate rotation (no backoff) on
    /// rate-limit, and [`RpcError::EndpointsExhausted`] once every endpoint
    /// has been tried once without success.
    async fn call_with_failover<T, F, Fut>(&self, mut f: F) -> Result<T, RpcError>
    where
        F: FnMut(JsonRpcEndpoint) -> Fut,
        Fut: std::future::Future<Output = Result<T, RpcError>>,
    {
        let n = self.endpoints.len();
        for _ in 0..n {
            let endpoint = self.endpoints[self.current()].clone();
            let mut last_err = None;
            for attempt in 1..=self.retries.max(1) {
                match f(endpoint.clone()).await {
                    Ok(value) => return Ok(value),
                    Err(error) if error.is_rate_limit() => {
                        debug!(endpoint = endpoint.url(), "rate limited, rotating endpoint");
                        last_err = Some(error);
                        break;
                    }
                    Err(error) => {
                        warn!(endpoint = endpoint.url(), attempt, %error, "rpc call failed, retrying");
                        last_err = Some(error);
                        tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
                    }
                }
            }
            self.rotate();
            if let Some(err) = last_err {
                debug!(%err, "endpoint exhausted, trying next");
            }
        }
        Err(RpcError::EndpointsExhausted)
    }

}

#[async_trait]
impl BlockSource for RpcPool {
    async fn get_block(&self, number: u64) -> Result<Block, RpcError> {
        self.call_with_failover(|endpoint| async move {
            let raw = endpoint
                .get_block_by_number(number)
                .await?
                .ok_or_else(|| RpcError::RpcReturnedError {
                    endpoint: endpoint.url().to_string(),
                    code: 0,
                    message: format!("block {number} not found"),
                })?;
            let raw: RawBlock =
                serde_json::from_value(raw).map_err(|source| RpcError::MalformedResponse {
                    endpoint: endpoint.url().to_string(),
                    source,
                })?;
            Block::try_from(raw).map_err(|_| RpcError::MalformedHex {
                endpoint: endpoint.url().to_string(),
            })
        })
        .await
    }

    async fn get_logs(&self, block_number: u64, topic0_candidates: &[B256]) -> Result<Vec<Log>, RpcError> {
        let candidates: Vec<String> = topic0_candidates
            .iter()
            .map(|b| format!("0x{}", hex::encode(b)))
            .collect();
        self.call_with_failover(|endpoint| {
            let candidates = candidates.clone();
            async move {
                let candidate_refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
                let raw = endpoint
                    .get_logs(block_number, block_number, &candidate_refs)
                    .await?;
                let raw: Vec<RawLog> =
                    serde_json::from_value(raw).map_err(|source| RpcError::MalformedResponse {
                        endpoint: endpoint.url().to_string(),
                        source,
                    })?;
                raw.into_iter()
                    .map(Log::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| RpcError::MalformedHex {
                        endpoint: endpoint.url().to_string(),
                    })
            }
        })
        .await
    }

    async fn get_head(&self) -> Result<u64, RpcError> {
        self.call_with_failover(|endpoint| async move {
            let hex = endpoint.block_number().await?;
            u64::from_str_radix(hex.trim_start_matches("0x"), 16).map_err(|_| RpcError::MalformedHex {
                endpoint: endpoint.url().to_string(),
            })
        })
        .await
    }
}
