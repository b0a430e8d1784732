//! Builder and external handle for the Block Processor.
//!
//! A builder assembles the context and hands back a `(Handle, task future)`
//! pair, where the handle exposes a `watch` receiver for status and a
//! cooperative shutdown trigger.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use indexer_rpc::BlockSource;
use indexer_store::Store;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::ctx::ProcessorCtx;
use crate::status::ProcessorStatus;
use crate::task::run;

const DEFAULT_BATCH_SIZE: u64 = 50;
const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// External handle for a running processor task: current status and a
/// cooperative shutdown trigger.
#[derive(Debug)]
pub struct ProcessorHandle {
    status_rx: watch::Receiver<ProcessorStatus>,
    cancel: CancellationToken,
}

impl ProcessorHandle {
    /// Returns a watcher for processor status updates (current phase, last
    /// checkpoint, chain head, last error).
    pub fn status_watcher(&self) -> watch::Receiver<ProcessorStatus> {
        self.status_rx.clone()
    }

    /// Requests cooperative shutdown. The processor task finishes its
    /// current batch (or poll sleep) and returns; it does not abort
    /// mid-intent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Builder for a Block Processor task.
pub struct BlockProcessorBuilder {
    rpc: Arc<dyn BlockSource>,
    store: Arc<dyn Store>,
    indexer_name: String,
    batch_size: Option<u64>,
    concurrency: Option<usize>,
    poll_interval: Option<Duration>,
    start_block: Option<u64>,
}

impl std::fmt::Debug for BlockProcessorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockProcessorBuilder")
            .field("indexer_name", &self.indexer_name)
            .field("batch_size", &self.batch_size)
            .field("concurrency", &self.concurrency)
            .field("poll_interval", &self.poll_interval)
            .field("start_block", &self.start_block)
            .finish_non_exhaustive()
    }
}

impl BlockProcessorBuilder {
    pub fn new(rpc: Arc<dyn BlockSource>, store: Arc<dyn Store>, indexer_name: impl Into<String>) -> Self {
        Self {
            rpc,
            store,
            indexer_name: indexer_name.into(),
            batch_size: None,
            concurrency: None,
            poll_interval: None,
            start_block: None,
        }
    }

    /// Number of blocks fetched and applied per processing batch.
    pub fn with_batch_size(mut self, v: u64) -> Self {
        self.batch_size = Some(v);
        self
    }

    /// Number of blocks fetched concurrently within a batch.
    pub fn with_concurrency(mut self, v: usize) -> Self {
        self.concurrency = Some(v);
        self
    }

    /// Sleep duration between cycles once caught up with chain head.
    pub fn with_poll_interval(mut self, v: Duration) -> Self {
        self.poll_interval = Some(v);
        self
    }

    /// Overrides the block to resume from when no checkpoint row exists
    /// yet. Ignored once a checkpoint has been persisted.
    pub fn with_start_block(mut self, v: u64) -> Self {
        self.start_block = Some(v);
        self
    }

    /// Builds and returns the processor handle and its driving task.
    pub fn build(self) -> (ProcessorHandle, impl Future<Output = ()>) {
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(ProcessorStatus::initial(None));

        let ctx = ProcessorCtx {
            rpc: self.rpc,
            store: self.store,
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            poll_interval: self
                .poll_interval
                .unwrap_or_else(|| Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)),
            indexer_name: self.indexer_name,
            start_block: self.start_block,
            status_tx,
            cancel: cancel.clone(),
        };

        let handle = ProcessorHandle { status_rx, cancel };
        (handle, run(ctx))
    }
}
