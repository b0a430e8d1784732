use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("rpc error: {0}")]
    Rpc(#[from] indexer_rpc::RpcError),

    #[error("store error: {0}")]
    Store(#[from] indexer_store::StoreError),

    #[error("materializer error: {0}")]
    Materializer(#[from] indexer_materializer::MaterializerError),

    /// One or more blocks in the batch failed to fetch from every endpoint.
    /// The checkpoint is left untouched so the batch is retried in full on
    /// the next cycle.
    #[error("failed to fetch block {block_number}: {source}")]
    BlockFetchFailed {
        block_number: u64,
        #[source]
        source: indexer_rpc::RpcError,
    },
}

pub(crate) type Result<T> = std::result::Result<T, ProcessorError>;
