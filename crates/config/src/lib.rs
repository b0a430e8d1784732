//! Runtime configuration for the ethscriptions indexer.

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered list of JSON-RPC endpoints, tried in order with failover.
    pub rpc_urls: Vec<String>,

    /// Chain id bound to every RPC client at construction time.
    pub chain_id: u64,

    /// Number of blocks fetched and applied per processing batch.
    pub batch_size: u64,

    /// Number of blocks fetched concurrently within a batch.
    pub concurrency: usize,

    /// Overrides the block to resume from; otherwise resumes from the
    /// persisted checkpoint.
    pub start_block: Option<u64>,

    /// Postgres connection string for the relational store.
    pub database_url: String,

    /// Sleep duration between polls once the indexer has caught up to head.
    pub poll_interval_ms: u64,

    /// Per-endpoint retry count before rotating to the next endpoint.
    pub rpc_retries: u32,

    /// Emit structured JSON logs instead of the default human-readable format.
    pub log_json: bool,

    /// Name under which this instance's checkpoint row is stored.
    pub indexer_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            rpc_urls: std::env::var("INDEXER_RPC_URLS")
                .context("INDEXER_RPC_URLS is required")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            chain_id: std::env::var("INDEXER_CHAIN_ID")
                .unwrap_or_else(|_| "8453".into())
                .parse()
                .context("invalid INDEXER_CHAIN_ID")?,
            batch_size: std::env::var("INDEXER_BATCH_SIZE")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .context("invalid INDEXER_BATCH_SIZE")?,
            concurrency: std::env::var("INDEXER_CONCURRENCY")
                .unwrap_or_else(|_| "8".into())
                .parse()
                .context("invalid INDEXER_CONCURRENCY")?,
            start_block: std::env::var("INDEXER_START_BLOCK")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .context("invalid INDEXER_START_BLOCK")?,
            database_url: std::env::var("INDEXER_DATABASE_URL")
                .context("INDEXER_DATABASE_URL is required")?,
            poll_interval_ms: std::env::var("INDEXER_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .context("invalid INDEXER_POLL_INTERVAL_MS")?,
            rpc_retries: std::env::var("INDEXER_RPC_RETRIES")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .context("invalid INDEXER_RPC_RETRIES")?,
            log_json: std::env::var("INDEXER_LOG_JSON")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            indexer_name: std::env::var("INDEXER_INDEXER_NAME")
                .unwrap_or_else(|_| "ethscriptions".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `env::set_var`/`remove_var` mutate process-global state, so these tests
    /// run serially on a per-var basis via distinct var names where possible
    /// and clean up after themselves.
    fn clear_all() {
        for var in [
            "INDEXER_RPC_URLS",
            "INDEXER_CHAIN_ID",
            "INDEXER_BATCH_SIZE",
            "INDEXER_CONCURRENCY",
            "INDEXER_START_BLOCK",
            "INDEXER_DATABASE_URL",
            "INDEXER_POLL_INTERVAL_MS",
            "INDEXER_RPC_RETRIES",
            "INDEXER_LOG_JSON",
            "INDEXER_INDEXER_NAME",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn missing_required_var_errors() {
        clear_all();
        let result = Config::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn defaults_applied_when_optional_vars_absent() {
        clear_all();
        std::env::set_var("INDEXER_RPC_URLS", "https://a.example,https://b.example");
        std::env::set_var("INDEXER_DATABASE_URL", "postgres://localhost/db");

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.rpc_urls, vec!["https://a.example", "https://b.example"]);
        assert_eq!(cfg.chain_id, 8453);
        assert_eq!(cfg.batch_size, 50);
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.start_block, None);
        assert_eq!(cfg.indexer_name, "ethscriptions");
        clear_all();
    }

    #[test]
    fn invalid_int_errors() {
        clear_all();
        std::env::set_var("INDEXER_RPC_URLS", "https://a.example");
        std::env::set_var("INDEXER_DATABASE_URL", "postgres://localhost/db");
        std::env::set_var("INDEXER_BATCH_SIZE", "not-a-number");

        let result = Config::from_env();
        assert!(result.is_err());
        clear_all();
    }

    #[test]
    fn start_block_override_parsed() {
        clear_all();
        std::env::set_var("INDEXER_RPC_URLS", "https://a.example");
        std::env::set_var("INDEXER_DATABASE_URL", "postgres://localhost/db");
        std::env::set_var("INDEXER_START_BLOCK", "123456");

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.start_block, Some(123_456));
        clear_all();
    }
}
