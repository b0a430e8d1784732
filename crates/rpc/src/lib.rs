//! JSON-RPC pool with multi-endpoint rate-limit failover.
//!
//! [`RpcPool`] exposes `get_block`, `get_logs`, and `get_head` against an
//! ordered list of endpoints. A rate-limited endpoint is rotated past
//! immediately; any other transient error is retried with linear backoff
//! before rotation. Provider identity is a fixed chain-id binding — the pool
//! never probes `eth_chainId` per call.

mod client;
mod error;
mod pool;
mod types;

pub use client::JsonRpcEndpoint;
pub use error::RpcError;
pub use pool::{BlockSource, RpcPool};
pub use types::{Block, Log, Transaction};

#[cfg(all(test, feature = "test-utils"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_block_source_reports_head() {
        let mut mock = MockBlockSource::new();
        mock.expect_get_head().times(1).returning(|| Ok(12345));
        let head = mock.get_head().await.unwrap();
        assert_eq!(head, 12345);
    }
}

#[cfg(test)]
mod pool_tests {
    use super::*;

    #[test]
    fn rejects_empty_endpoint_list() {
        let result = RpcPool::new(vec![], 8453, 3);
        assert!(matches!(result, Err(RpcError::NoEndpoints)));
    }
}
