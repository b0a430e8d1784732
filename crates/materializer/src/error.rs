use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaterializerError {
    #[error(transparent)]
    Store(#[from] indexer_store::StoreError),

    #[error(transparent)]
    Protocol(#[from] indexer_protocol::ProtocolError),
}
