//! Block Processor: the indexer's orchestrator.
//!
//! Drives a moving window of blocks through fetch → classify → materialize
//! → checkpoint, with bounded fetch concurrency and strictly sequential
//! application. See [`BlockProcessorBuilder`] to construct one.

mod ctx;
mod error;
mod handle;
mod status;
mod task;

pub use error::ProcessorError;
pub use handle::{BlockProcessorBuilder, ProcessorHandle};
pub use status::{ProcessorPhase, ProcessorStatus};
