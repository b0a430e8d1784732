//! `erc-20-fixed-denomination` sub-state-machine.

use alloy_primitives::Address;
use indexer_store::{models::TokenKind, tokens, StoreResult, StoreTxn};
use serde_json::Value;
use tracing::warn;

use crate::fields::get_i64;
use crate::ProtocolError;

const MAX_TICK_LEN: usize = 28;

pub struct Ctx<'a> {
    pub inscription_id: &'a str,
    pub creator: Address,
}

pub async fn handle(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> Result<(), ProtocolError> {
    let op = payload.get("op").and_then(Value::as_str).unwrap_or("");
    match op {
        "deploy" => deploy(txn, payload).await?,
        "mint" => mint(txn, ctx, payload).await?,
        other => {
            warn!(op = other, "unrecognized erc-20-fixed-denomination op, dropping");
        }
    }
    Ok(())
}

fn normalized_tick(payload: &Value) -> Option<String> {
    let tick = payload.get("tick")?.as_str()?.to_lowercase();
    if tick.is_empty() || tick.len() > MAX_TICK_LEN {
        return None;
    }
    Some(tick)
}

async fn deploy(txn: &mut StoreTxn, payload: &Value) -> StoreResult<()> {
    let Some(tick) = normalized_tick(payload) else {
        warn!("fixed-denomination deploy: missing/oversized tick, dropping");
        return Ok(());
    };
    let max = get_i64(payload, "max").unwrap_or(0);
    let lim = get_i64(payload, "lim").unwrap_or(0);
    if max <= 0 || lim <= 0 || max % lim != 0 {
        warn!(tick, max, lim, "fixed-denomination deploy: invalid max/lim, dropping");
        return Ok(());
    }
    if tokens::get_fixed_token(txn, &tick).await?.is_some() {
        warn!(tick, "fixed-denomination deploy: tick already deployed, dropping");
        return Ok(());
    }
    tokens::insert_fixed_token(txn, &tick, max, lim).await
}

async fn mint(txn: &mut StoreTxn, ctx: &Ctx<'_>, payload: &Value) -> StoreResult<()> {
    let Some(tick) = normalized_tick(payload) else {
        warn!("fixed-denomination mint: missing/oversized tick, dropping");
        return Ok(());
    };
    let Some(token) = tokens::get_fixed_token(txn, &tick).await? else {
        warn!(tick, "fixed-denomination mint: tick not deployed, dropping");
        return Ok(());
    };

    let amt = get_i64(payload, "amt").unwrap_or(token.denomination);
    if amt != token.denomination {
        warn!(
            tick,
            amt, denomination = token.denomination, "fixed-denomination mint: amt != denomination, dropping"
        );
        return Ok(());
    }

    let incremented = tokens::increment_fixed_minted(txn, &tick, amt).await?;
    if !incremented {
        warn!(tick, amt, "fixed-denomination mint: would exceed max_supply, dropping");
        return Ok(());
    }

    let note_id = tokens::next_note_id(txn, TokenKind::Fixed, &tick).await?;
    tokens::insert_token_note(txn, TokenKind::Fixed, &tick, note_id, ctx.inscription_id, ctx.creator, amt).await
}
