//! `erc-721-ethscriptions-collection` sub-state-machine.

use alloy_primitives::Address;
use indexer_store::{collections, models::Collection, StoreResult, StoreTxn};
use serde_json::Value;
use tracing::warn;

use crate::fields::{get_address, get_i64, get_str};
use crate::ProtocolError;

pub struct Ctx<'a> {
    pub inscription_id: &'a str,
    pub creator: Address,
}

pub async fn handle(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> Result<(), ProtocolError> {
    let op = payload.get("op").and_then(Value::as_str).unwrap_or("");
    match op {
        "create" => create(txn, ctx, payload, false).await?,
        "create_collection_and_add_self" => create(txn, ctx, payload, true).await?,
        "add_self_to_collection" | "add" => add_item(txn, ctx, payload).await?,
        "edit_collection" => edit(txn, ctx, payload).await?,
        "lock_collection" => lock(txn, ctx, payload).await?,
        "transfer_ownership" => transfer_ownership(txn, ctx, payload).await?,
        other => {
            warn!(op = other, "unrecognized erc-721-ethscriptions-collection op, dropping");
        }
    }
    Ok(())
}

async fn create(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value, add_self: bool) -> StoreResult<()> {
    let max_supply = get_i64(payload, "max_supply").unwrap_or(0);
    collections::insert_collection(
        txn,
        &Collection {
            id: ctx.inscription_id.to_string(),
            name: get_str(payload, "name").map(str::to_string),
            symbol: get_str(payload, "symbol").map(str::to_string),
            description: get_str(payload, "description").map(str::to_string),
            max_supply,
            owner: ctx.creator,
            locked: false,
        },
    )
    .await?;

    if add_self {
        let metadata = payload.get("item").cloned();
        collections::insert_collection_item(txn, ctx.inscription_id, 1, ctx.inscription_id, metadata)
            .await?;
    }
    Ok(())
}

async fn add_item(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> StoreResult<()> {
    let Some(collection_id) = get_str(payload, "collection_id") else {
        warn!("add_self_to_collection missing collection_id, dropping");
        return Ok(());
    };

    let Some(collection) = collections::get_collection(txn, collection_id).await? else {
        warn!(collection_id, "add to unknown collection, dropping");
        return Ok(());
    };
    if collection.locked {
        warn!(collection_id, "add to locked collection, dropping");
        return Ok(());
    }

    let next_index = collections::next_item_index(txn, collection_id).await?;
    if next_index as i64 > collection.max_supply {
        warn!(
            collection_id,
            next_index, max_supply = collection.max_supply, "add would exceed max_supply, dropping"
        );
        return Ok(());
    }

    let metadata = payload.get("item").cloned();
    collections::insert_collection_item(txn, collection_id, next_index, ctx.inscription_id, metadata)
        .await?;
    Ok(())
}

async fn edit(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> StoreResult<()> {
    let Some(collection_id) = get_str(payload, "collection_id") else {
        warn!("edit_collection missing collection_id, dropping");
        return Ok(());
    };
    let Some(collection) = collections::get_collection(txn, collection_id).await? else {
        warn!(collection_id, "edit of unknown collection, dropping");
        return Ok(());
    };
    if collection.owner != ctx.creator {
        warn!(collection_id, "edit_collection by non-owner, dropping");
        return Ok(());
    }
    if collection.locked {
        warn!(collection_id, "edit_collection on locked collection, dropping");
        return Ok(());
    }

    collections::update_collection_metadata(
        txn,
        collection_id,
        get_str(payload, "name").map(str::to_string),
        get_str(payload, "symbol").map(str::to_string),
        get_str(payload, "description").map(str::to_string),
    )
    .await
}

async fn lock(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> StoreResult<()> {
    let Some(collection_id) = get_str(payload, "collection_id") else {
        warn!("lock_collection missing collection_id, dropping");
        return Ok(());
    };
    let Some(collection) = collections::get_collection(txn, collection_id).await? else {
        warn!(collection_id, "lock of unknown collection, dropping");
        return Ok(());
    };
    if collection.owner != ctx.creator {
        warn!(collection_id, "lock_collection by non-owner, dropping");
        return Ok(());
    }
    collections::lock_collection(txn, collection_id).await
}

async fn transfer_ownership(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> StoreResult<()> {
    let Some(collection_id) = get_str(payload, "collection_id") else {
        warn!("transfer_ownership missing collection_id, dropping");
        return Ok(());
    };
    let Some(collection) = collections::get_collection(txn, collection_id).await? else {
        warn!(collection_id, "transfer_ownership of unknown collection, dropping");
        return Ok(());
    };
    if collection.owner != ctx.creator {
        warn!(collection_id, "transfer_ownership by non-owner, dropping");
        return Ok(());
    }
    let Some(new_owner) = get_address(payload, "new_owner") else {
        warn!(collection_id, "transfer_ownership missing/invalid new_owner, dropping");
        return Ok(());
    };
    collections::transfer_collection_ownership(txn, collection_id, new_owner).await
}
