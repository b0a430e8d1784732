//! Ethscriptions indexer entrypoint: loads configuration, wires the RPC
//! pool, Postgres store, and Block Processor together, and runs until
//! Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use indexer_config::Config;
use indexer_processor::{BlockProcessorBuilder, ProcessorPhase};
use indexer_rpc::RpcPool;
use indexer_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    init_tracing(config.log_json);

    info!(
        chain_id = config.chain_id,
        indexer_name = %config.indexer_name,
        endpoints = config.rpc_urls.len(),
        "starting ethscriptions indexer"
    );

    let rpc = RpcPool::new(config.rpc_urls.clone(), config.chain_id, config.rpc_retries)
        .context("constructing rpc pool")?;
    rpc.healthcheck().await;

    let store = PostgresStore::connect(&config.database_url)
        .await
        .context("connecting to postgres")?;
    store.run_migrations().await.context("running migrations")?;

    let mut builder = BlockProcessorBuilder::new(
        Arc::new(rpc) as Arc<dyn indexer_rpc::BlockSource>,
        Arc::new(store) as Arc<dyn indexer_store::Store>,
        config.indexer_name.clone(),
    )
    .with_batch_size(config.batch_size)
    .with_concurrency(config.concurrency)
    .with_poll_interval(Duration::from_millis(config.poll_interval_ms));

    if let Some(start_block) = config.start_block {
        builder = builder.with_start_block(start_block);
    }

    let (handle, task) = builder.build();
    let processor = tokio::spawn(task);

    let mut status_rx = handle.status_watcher();
    tokio::spawn(async move {
        loop {
            if status_rx.changed().await.is_err() {
                return;
            }
            let status = status_rx.borrow().clone();
            if let Some(error) = &status.last_error {
                tracing::warn!(phase = ?status.phase, %error, "processor cycle ended with error");
            } else if status.phase == ProcessorPhase::Idle {
                tracing::debug!(
                    checkpoint = status.last_checkpoint,
                    chain_head = status.chain_head,
                    "processor idle"
                );
            }
        }
    });

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutdown requested, waiting for processor to finish its current cycle");
    handle.shutdown();
    processor.await.context("processor task panicked")?;
    info!("indexer stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
