//! Inscription and Transfer operations, applied against an open
//! [`StoreTxn`]. Ownership changes use compare-and-set `UPDATE ... WHERE
//! current_owner = $expected` so the ownership precondition is checked and
//! applied atomically in one statement.

use alloy_primitives::Address;

use crate::addr;
use crate::error::StoreResult;
use crate::models::{NewInscription, NewTransfer};
use crate::postgres::StoreTxn;

/// Count of *ESIP-6-suffixed* inscriptions sharing `content_hash`, used to
/// compute the next ESIP-6 `-N` suffix (`N = count + 1`). The unsuffixed
/// base row (if one exists) is deliberately excluded: ESIP-6 sequencing
/// starts at `-1` regardless of whether a plain, non-ESIP-6 Create for the
/// same content hash already exists.
pub async fn count_esip6_siblings(txn: &mut StoreTxn, content_hash: &str) -> StoreResult<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM inscriptions WHERE content_hash = $1 AND esip6 = TRUE",
    )
    .bind(content_hash)
    .fetch_one(&mut *txn.0)
    .await?;
    Ok(count)
}

/// Inserts a new inscription. Returns `false` (conflict absorbed, not an
/// error) if `id` already exists — the non-ESIP-6 uniqueness escape hatch.
pub async fn insert_inscription(txn: &mut StoreTxn, record: &NewInscription) -> StoreResult<bool> {
    let result = sqlx::query(
        "INSERT INTO inscriptions
            (id, content_hash, content_type, creator, current_owner, creation_tx,
             creation_block, creation_timestamp, esip6, esip6_sequence,
             created_by_contract, creator_contract)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&record.id)
    .bind(&record.content_hash)
    .bind(&record.content_type)
    .bind(addr::to_text(record.creator))
    .bind(addr::to_text(record.initial_owner))
    .bind(format!("0x{}", hex::encode(record.creation_tx)))
    .bind(record.creation_block as i64)
    .bind(record.creation_timestamp)
    .bind(record.esip6)
    .bind(record.esip6_sequence)
    .bind(record.created_by_contract)
    .bind(record.creator_contract.map(addr::to_text))
    .execute(&mut *txn.0)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Current owner of an inscription, or `None` if it doesn't exist.
pub async fn get_owner(txn: &mut StoreTxn, inscription_id: &str) -> StoreResult<Option<Address>> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT current_owner FROM inscriptions WHERE id = $1",
    )
    .bind(inscription_id)
    .fetch_optional(&mut *txn.0)
    .await?;
    row.map(|(s,)| addr::from_text(&s)).transpose()
}

/// Compare-and-set owner update: succeeds only if `current_owner` still
/// equals `expected_owner` at the moment of the update. Returns `false` if
/// the precondition no longer held, so the caller can drop the transfer
/// without recording it.
pub async fn update_owner_cas(
    txn: &mut StoreTxn,
    inscription_id: &str,
    expected_owner: Address,
    new_owner: Address,
) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE inscriptions SET current_owner = $1 WHERE id = $2 AND current_owner = $3",
    )
    .bind(addr::to_text(new_owner))
    .bind(inscription_id)
    .bind(addr::to_text(expected_owner))
    .execute(&mut *txn.0)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn insert_transfer(txn: &mut StoreTxn, record: &NewTransfer) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO transfers
            (inscription_id, from_address, to_address, tx_hash, block_number,
             \"timestamp\", log_index, contract_address, transfer_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(&record.inscription_id)
    .bind(addr::to_text(record.from))
    .bind(addr::to_text(record.to))
    .bind(format!("0x{}", hex::encode(record.tx_hash)))
    .bind(record.block_number as i64)
    .bind(record.timestamp)
    .bind(record.log_index.map(|i| i as i64))
    .bind(record.contract_address.map(addr::to_text))
    .bind(record.transfer_type.as_str())
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

/// Mirrors a new owner into every TokenNote backed by `inscription_id`, in
/// both the fixed-denomination and bonding-curve tables (invariant 6).
pub async fn mirror_token_note_owner(
    txn: &mut StoreTxn,
    inscription_id: &str,
    new_owner: Address,
) -> StoreResult<()> {
    sqlx::query("UPDATE token_notes SET owner = $1 WHERE inscription_id = $2")
        .bind(addr::to_text(new_owner))
        .bind(inscription_id)
        .execute(&mut *txn.0)
        .await?;
    Ok(())
}

/// Whether an id has ever been seen (used for transient checks outside a
/// transaction, e.g. `#[cfg(test)]` assertions in the materializer).
pub async fn exists(txn: &mut StoreTxn, inscription_id: &str) -> StoreResult<bool> {
    Ok(get_owner(txn, inscription_id).await?.is_some())
}
