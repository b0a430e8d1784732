use thiserror::Error;

/// Only store/DB failures are propagated; a malformed or invalid protocol
/// operation is dropped and logged by the handler that detects it, never
/// surfaced as an `Err` — all protocol operations are best-effort.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Store(#[from] indexer_store::StoreError),
}
