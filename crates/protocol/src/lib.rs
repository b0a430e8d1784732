//! Protocol Handler: dispatches a created inscription's JSON payload to its
//! sub-state-machine, keyed by the `p` tag.

mod bonding;
mod collection;
mod error;
mod fields;
mod fixed;

use alloy_primitives::Address;
use indexer_store::StoreTxn;
use serde_json::Value;
use tracing::debug;

pub use error::ProtocolError;

/// Identity of the inscription that was just created, for ops that need to
/// attribute ownership (a new collection item, a new token note) to it.
pub struct ProtocolContext<'a> {
    pub inscription_id: &'a str,
    pub creator: Address,
}

/// If `content_type` is `application/json` (ignoring any `;charset=` suffix)
/// and the body parses with a recognized `p` tag, dispatches to that
/// sub-state-machine. Anything else — not JSON, no `p` field, unrecognized
/// `p` value — is a no-op: the inscription itself still exists regardless.
pub async fn dispatch(
    txn: &mut StoreTxn,
    ctx: &ProtocolContext<'_>,
    content_type: &str,
    body: &str,
) -> Result<(), ProtocolError> {
    if !content_type.starts_with("application/json") {
        return Ok(());
    }
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        debug!("inscription content-typed as json but failed to parse, skipping protocol dispatch");
        return Ok(());
    };
    let Some(p) = payload.get("p").and_then(Value::as_str) else {
        return Ok(());
    };

    match p {
        "erc-721-ethscriptions-collection" => {
            let inner = collection::Ctx {
                inscription_id: ctx.inscription_id,
                creator: ctx.creator,
            };
            collection::handle(txn, &inner, &payload).await
        }
        "erc-20-fixed-denomination" => {
            let inner = fixed::Ctx {
                inscription_id: ctx.inscription_id,
                creator: ctx.creator,
            };
            fixed::handle(txn, &inner, &payload).await
        }
        "erc-20-bonding-curve" => {
            let inner = bonding::Ctx {
                inscription_id: ctx.inscription_id,
                creator: ctx.creator,
            };
            bonding::handle(txn, &inner, &payload).await
        }
        other => {
            debug!(protocol = other, "unrecognized protocol tag, ignoring payload");
            Ok(())
        }
    }
}
