//! Collection and CollectionItem operations
//! (`erc-721-ethscriptions-collection`).

use alloy_primitives::Address;

use crate::addr;
use crate::error::StoreResult;
use crate::models::Collection;
use crate::postgres::StoreTxn;

pub async fn insert_collection(txn: &mut StoreTxn, collection: &Collection) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO collections (id, name, symbol, description, max_supply, owner, locked)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&collection.id)
    .bind(&collection.name)
    .bind(&collection.symbol)
    .bind(&collection.description)
    .bind(collection.max_supply)
    .bind(addr::to_text(collection.owner))
    .bind(collection.locked)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

pub async fn get_collection(txn: &mut StoreTxn, collection_id: &str) -> StoreResult<Option<Collection>> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: String,
        name: Option<String>,
        symbol: Option<String>,
        description: Option<String>,
        max_supply: i64,
        owner: String,
        locked: bool,
    }

    let row: Option<Row> = sqlx::query_as(
        "SELECT id, name, symbol, description, max_supply, owner, locked
         FROM collections WHERE id = $1",
    )
    .bind(collection_id)
    .fetch_optional(&mut *txn.0)
    .await?;

    row.map(|r| -> StoreResult<Collection> {
        Ok(Collection {
            id: r.id,
            name: r.name,
            symbol: r.symbol,
            description: r.description,
            max_supply: r.max_supply,
            owner: addr::from_text(&r.owner)?,
            locked: r.locked,
        })
    })
    .transpose()
}

/// Next dense 1-based item index for `collection_id`.
pub async fn next_item_index(txn: &mut StoreTxn, collection_id: &str) -> StoreResult<i32> {
    let (max,): (Option<i32>,) = sqlx::query_as(
        "SELECT MAX(item_index) FROM collection_items WHERE collection_id = $1",
    )
    .bind(collection_id)
    .fetch_one(&mut *txn.0)
    .await?;
    Ok(max.unwrap_or(0) + 1)
}

pub async fn insert_collection_item(
    txn: &mut StoreTxn,
    collection_id: &str,
    item_index: i32,
    inscription_id: &str,
    metadata: Option<serde_json::Value>,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO collection_items (collection_id, item_index, inscription_id, metadata)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(collection_id)
    .bind(item_index)
    .bind(inscription_id)
    .bind(metadata)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

pub async fn update_collection_metadata(
    txn: &mut StoreTxn,
    collection_id: &str,
    name: Option<String>,
    symbol: Option<String>,
    description: Option<String>,
) -> StoreResult<()> {
    sqlx::query(
        "UPDATE collections
         SET name = COALESCE($2, name),
             symbol = COALESCE($3, symbol),
             description = COALESCE($4, description)
         WHERE id = $1",
    )
    .bind(collection_id)
    .bind(name)
    .bind(symbol)
    .bind(description)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

pub async fn lock_collection(txn: &mut StoreTxn, collection_id: &str) -> StoreResult<()> {
    sqlx::query("UPDATE collections SET locked = TRUE WHERE id = $1")
        .bind(collection_id)
        .execute(&mut *txn.0)
        .await?;
    Ok(())
}

pub async fn transfer_collection_ownership(
    txn: &mut StoreTxn,
    collection_id: &str,
    new_owner: Address,
) -> StoreResult<()> {
    sqlx::query("UPDATE collections SET owner = $1 WHERE id = $2")
        .bind(addr::to_text(new_owner))
        .bind(collection_id)
        .execute(&mut *txn.0)
        .await?;
    Ok(())
}
