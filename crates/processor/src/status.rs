//! Externally observable processor state, broadcast over a
//! `tokio::sync::watch` status channel.

/// Which phase of the IDLE → FETCH_HEAD → CHOOSE_BATCH → FETCH_BLOCKS →
/// APPLY → CHECKPOINT → IDLE cycle the processor is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorPhase {
    Idle,
    FetchHead,
    FetchBlocks,
    Apply,
    Checkpoint,
}

#[derive(Debug, Clone)]
pub struct ProcessorStatus {
    pub phase: ProcessorPhase,
    /// Last block number successfully checkpointed, if any.
    pub last_checkpoint: Option<u64>,
    /// Chain head as of the most recent FETCH_HEAD step.
    pub chain_head: Option<u64>,
    /// Message from the most recent retried failure, cleared on success.
    pub last_error: Option<String>,
}

impl ProcessorStatus {
    pub(crate) fn initial(last_checkpoint: Option<u64>) -> Self {
        Self {
            phase: ProcessorPhase::Idle,
            last_checkpoint,
            chain_head: None,
            last_error: None,
        }
    }
}
