//! `PostgresStore`: connection pool plus per-intent transaction handles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreResult;

/// An open per-intent transaction. The Materializer opens one of these per
/// intent (Create, Transfer, protocol op), performs every store operation
/// for that intent against it, and commits — never leaving a partially
/// applied intent visible to other readers.
pub struct StoreTxn(pub Transaction<'static, Postgres>);

impl StoreTxn {
    pub async fn commit(self) -> StoreResult<()> {
        self.0.commit().await.map_err(Into::into)
    }

    pub async fn rollback(self) -> StoreResult<()> {
        self.0.rollback().await.map_err(Into::into)
    }
}

/// The object-safe surface of the store: opening transactions and reading/
/// writing the checkpoint. Per-intent operations (insert inscription,
/// update owner, mint a note, …) are free functions taking `&mut StoreTxn`
/// in sibling modules, since they don't need dynamic dispatch and sqlx's
/// transaction type isn't trait-object friendly across a generic API.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<StoreTxn>;
    async fn get_checkpoint(&self, indexer_name: &str) -> StoreResult<Option<u64>>;
    async fn set_checkpoint(
        &self,
        indexer_name: &str,
        block_number: u64,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn begin(&self) -> StoreResult<StoreTxn> {
        Ok(StoreTxn(self.pool.begin().await?))
    }

    async fn get_checkpoint(&self, indexer_name: &str) -> StoreResult<Option<u64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT last_processed_block FROM checkpoints WHERE indexer_name = $1",
        )
        .bind(indexer_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(n,)| n as u64))
    }

    async fn set_checkpoint(
        &self,
        indexer_name: &str,
        block_number: u64,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO checkpoints (indexer_name, last_processed_block, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (indexer_name)
             DO UPDATE SET last_processed_block = EXCLUDED.last_processed_block,
                           updated_at = EXCLUDED.updated_at",
        )
        .bind(indexer_name)
        .bind(block_number as i64)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
