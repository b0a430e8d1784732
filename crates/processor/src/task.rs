//! The Block Processor loop: IDLE → FETCH_HEAD → CHOOSE_BATCH →
//! FETCH_BLOCKS (parallel, bounded) → APPLY (serial, in-order) →
//! CHECKPOINT → IDLE.
//!
//! One logical task, woken on a poll interval, driving one state transition
//! per wakeup and logging (never panicking on) recoverable failures.

use alloy_primitives::B256;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indexer_classifier::{classify_log, classify_transaction, Intent};
use indexer_materializer::{apply_intent, BlockContext};
use indexer_rpc::{Block, BlockSource, Log, RpcError};
use tracing::{error, info, warn};

use crate::ctx::ProcessorCtx;
use crate::error::{ProcessorError, Result};
use crate::status::ProcessorPhase;

/// Drives the processor until `ctx.cancel` is triggered.
pub(crate) async fn run(ctx: ProcessorCtx) {
    loop {
        if ctx.cancel.is_cancelled() {
            info!("processor cancelled, shutting down");
            return;
        }

        match run_once(&ctx).await {
            Ok(Some(checkpoint)) => {
                ctx.update_status(|s| {
                    s.phase = ProcessorPhase::Idle;
                    s.last_checkpoint = Some(checkpoint);
                    s.last_error = None;
                });
            }
            Ok(None) => {
                ctx.update_status(|s| {
                    s.phase = ProcessorPhase::Idle;
                    s.last_error = None;
                });
            }
            Err(error) => {
                error!(%error, "batch processing failed, will retry next cycle");
                ctx.update_status(|s| {
                    s.phase = ProcessorPhase::Idle;
                    s.last_error = Some(error.to_string());
                });
            }
        }

        tokio::select! {
            _ = ctx.cancel.cancelled() => return,
            _ = tokio::time::sleep(ctx.poll_interval) => {}
        }
    }
}

/// One full cycle. Returns the new checkpoint if any blocks were applied,
/// `None` if already caught up with the chain head.
async fn run_once(ctx: &ProcessorCtx) -> Result<Option<u64>> {
    ctx.update_status(|s| s.phase = ProcessorPhase::FetchHead);
    let head = ctx.rpc.get_head().await?;
    ctx.update_status(|s| s.chain_head = Some(head));

    let checkpoint = ctx.store.get_checkpoint(&ctx.indexer_name).await?;
    let start = match checkpoint {
        Some(last) => last + 1,
        None => ctx.start_block.unwrap_or(0),
    };
    if start > head {
        return Ok(None);
    }
    let end = head.min(start + ctx.batch_size - 1);

    ctx.update_status(|s| s.phase = ProcessorPhase::FetchBlocks);
    let mut fetched = fetch_blocks(ctx, start, end).await;
    fetched.sort_by_key(|(number, _)| *number);

    ctx.update_status(|s| s.phase = ProcessorPhase::Apply);
    let mut applied_through = None;
    for (number, result) in fetched {
        match result {
            Ok((block, logs)) => {
                apply_block(ctx, &block, &logs).await?;
                applied_through = Some(number);
            }
            Err(source) => {
                // Never advance the checkpoint past a block that failed every
                // endpoint, and don't apply anything after it in this batch
                // either — it'll be retried in full next cycle.
                warn!(block_number = number, %source, "exhausted all endpoints for block, stopping batch here");
                break;
            }
        }
    }

    let Some(last) = applied_through else {
        return Err(ProcessorError::BlockFetchFailed {
            block_number: start,
            source: RpcError::EndpointsExhausted,
        });
    };

    ctx.update_status(|s| s.phase = ProcessorPhase::Checkpoint);
    ctx.store
        .set_checkpoint(&ctx.indexer_name, last, Utc::now())
        .await?;
    Ok(Some(last))
}

type FetchResult = std::result::Result<(Block, Vec<Log>), RpcError>;

/// Fetches `[start, end]` concurrently, bounded by `ctx.concurrency`. Each
/// block's transactions and logs are fetched together since both are
/// needed before that block can be applied.
async fn fetch_blocks(ctx: &ProcessorCtx, start: u64, end: u64) -> Vec<(u64, FetchResult)> {
    let topics = [
        indexer_classifier::transfer_topic(),
        indexer_classifier::transfer_for_previous_owner_topic(),
        indexer_classifier::create_topic(),
    ];

    stream::iter(start..=end)
        .map(|number| {
            let rpc = ctx.rpc.clone();
            let topics = topics;
            async move {
                let result = fetch_one(rpc.as_ref(), number, &topics).await;
                (number, result)
            }
        })
        .buffer_unordered(ctx.concurrency.max(1))
        .collect()
        .await
}

async fn fetch_one(rpc: &dyn BlockSource, number: u64, topics: &[B256; 3]) -> FetchResult {
    let block = rpc.get_block(number).await?;
    let logs = rpc.get_logs(number, topics).await?;
    Ok((block, logs))
}

/// Classifies and applies one block's intents in the order
/// mandates: transaction intents in block order, then log intents in log
/// order.
async fn apply_block(ctx: &ProcessorCtx, block: &Block, logs: &[Log]) -> Result<()> {
    let block_ctx = BlockContext {
        block_number: block.number,
        block_timestamp: block_timestamp(block.timestamp),
    };

    let mut intents: Vec<Intent> = Vec::new();
    for tx in &block.transactions {
        intents.extend(classify_transaction(tx));
    }
    for log in logs {
        if let Some(intent) = classify_log(log) {
            intents.push(intent);
        }
    }

    for intent in intents {
        apply_intent(ctx.store.as_ref(), &block_ctx, intent).await?;
    }
    Ok(())
}

fn block_timestamp(unix_seconds: u64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds as i64, 0).unwrap_or_else(Utc::now)
}
