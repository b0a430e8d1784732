use std::sync::Arc;
use std::time::Duration;

use indexer_rpc::BlockSource;
use indexer_store::Store;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::status::ProcessorStatus;

pub(crate) struct ProcessorCtx {
    pub rpc: Arc<dyn BlockSource>,
    pub store: Arc<dyn Store>,
    pub batch_size: u64,
    pub concurrency: usize,
    pub poll_interval: Duration,
    pub indexer_name: String,
    /// Only consulted when no checkpoint row exists yet; once a checkpoint
    /// has been written, resumption is always from the checkpoint.
    pub start_block: Option<u64>,
    pub status_tx: watch::Sender<ProcessorStatus>,
    pub cancel: CancellationToken,
}

impl ProcessorCtx {
    pub(crate) fn update_status(&self, f: impl FnOnce(&mut ProcessorStatus)) {
        self.status_tx.send_modify(f);
    }
}
