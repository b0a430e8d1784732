//! Fixed-denomination and bonding-curve token operations
//! (`erc-20-fixed-denomination` / `erc-20-bonding-curve`).

use alloy_primitives::Address;

use crate::addr;
use crate::error::StoreResult;
use crate::models::{BondingToken, FixedToken, TokenKind};
use crate::postgres::StoreTxn;

pub async fn get_fixed_token(txn: &mut StoreTxn, tick: &str) -> StoreResult<Option<FixedToken>> {
    let row: Option<(String, i64, i64, i64)> = sqlx::query_as(
        "SELECT tick, max_supply, denomination, minted FROM fixed_tokens WHERE tick = $1",
    )
    .bind(tick)
    .fetch_optional(&mut *txn.0)
    .await?;
    Ok(row.map(|(tick, max_supply, denomination, minted)| FixedToken {
        tick,
        max_supply,
        denomination,
        minted,
    }))
}

pub async fn insert_fixed_token(
    txn: &mut StoreTxn,
    tick: &str,
    max_supply: i64,
    denomination: i64,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO fixed_tokens (tick, max_supply, denomination, minted) VALUES ($1, $2, $3, 0)",
    )
    .bind(tick)
    .bind(max_supply)
    .bind(denomination)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

/// Increments `fixed_tokens.minted`, guarded by the same `max_supply` bound
/// already validated by the caller, so a concurrent mint can't overshoot.
pub async fn increment_fixed_minted(txn: &mut StoreTxn, tick: &str, amount: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE fixed_tokens SET minted = minted + $1 WHERE tick = $2 AND minted + $1 <= max_supply",
    )
    .bind(amount)
    .bind(tick)
    .execute(&mut *txn.0)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn get_bonding_token(txn: &mut StoreTxn, tick: &str) -> StoreResult<Option<BondingToken>> {
    let row: Option<(String, i64, i64, i64, i64, i64, i64)> = sqlx::query_as(
        "SELECT tick, max_supply, denomination, minted, base_price, price_increment, reserve
         FROM bonding_tokens WHERE tick = $1",
    )
    .bind(tick)
    .fetch_optional(&mut *txn.0)
    .await?;
    Ok(row.map(
        |(tick, max_supply, denomination, minted, base_price, price_increment, reserve)| BondingToken {
            tick,
            max_supply,
            denomination,
            minted,
            base_price,
            price_increment,
            reserve,
        },
    ))
}

pub async fn insert_bonding_token(
    txn: &mut StoreTxn,
    tick: &str,
    max_supply: i64,
    denomination: i64,
    base_price: i64,
    price_increment: i64,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO bonding_tokens
            (tick, max_supply, denomination, minted, base_price, price_increment, reserve)
         VALUES ($1, $2, $3, 0, $4, $5, 0)",
    )
    .bind(tick)
    .bind(max_supply)
    .bind(denomination)
    .bind(base_price)
    .bind(price_increment)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

pub async fn increment_bonding_minted(txn: &mut StoreTxn, tick: &str, amount: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE bonding_tokens SET minted = minted + $1, reserve = reserve + $2
         WHERE tick = $3 AND minted + $1 <= max_supply",
    )
    .bind(amount)
    .bind(amount)
    .bind(tick)
    .execute(&mut *txn.0)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Next dense 1-based note id for `(kind, tick)`.
pub async fn next_note_id(txn: &mut StoreTxn, kind: TokenKind, tick: &str) -> StoreResult<i32> {
    let (max,): (Option<i32>,) = sqlx::query_as(
        "SELECT MAX(note_id) FROM token_notes WHERE kind = $1 AND tick = $2",
    )
    .bind(kind.as_str())
    .bind(tick)
    .fetch_one(&mut *txn.0)
    .await?;
    Ok(max.unwrap_or(0) + 1)
}

pub async fn insert_token_note(
    txn: &mut StoreTxn,
    kind: TokenKind,
    tick: &str,
    note_id: i32,
    inscription_id: &str,
    owner: Address,
    amount: i64,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO token_notes (tick, note_id, kind, inscription_id, owner, amount)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(tick)
    .bind(note_id)
    .bind(kind.as_str())
    .bind(inscription_id)
    .bind(addr::to_text(owner))
    .bind(amount)
    .execute(&mut *txn.0)
    .await?;
    Ok(())
}

/// `sum(TokenNote.amount WHERE tick=T)` for invariant (5) verification in
/// tests; not on the hot path.
pub async fn sum_note_amounts(txn: &mut StoreTxn, kind: TokenKind, tick: &str) -> StoreResult<i64> {
    let (sum,): (Option<i64>,) = sqlx::query_as(
        "SELECT SUM(amount) FROM token_notes WHERE kind = $1 AND tick = $2",
    )
    .bind(kind.as_str())
    .bind(tick)
    .fetch_one(&mut *txn.0)
    .await?;
    Ok(sum.unwrap_or(0))
}
