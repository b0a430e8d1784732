//! Applies Create and ContractCreate intents.

use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use indexer_protocol::ProtocolContext;
use indexer_store::{inscriptions, NewInscription, Store, StoreTxn};
use tracing::debug;

use crate::error::MaterializerError;

/// Everything needed to materialize one Create, after the classifier's and
/// (for ESIP-3) the codec's canonicalization work is done.
pub(crate) struct CreateRecord {
    pub creator: Address,
    pub initial_owner: Address,
    pub tx_hash: B256,
    pub content_hash: String,
    pub content_type: String,
    /// Canonicalized body, kept only to feed the Protocol Handler; never
    /// persisted as-is.
    pub canonical_uri: String,
    pub esip6: bool,
    pub created_by_contract: bool,
    pub creator_contract: Option<Address>,
}

pub(crate) async fn apply(
    store: &dyn Store,
    block_number: u64,
    block_timestamp: DateTime<Utc>,
    record: CreateRecord,
) -> Result<(), MaterializerError> {
    let mut txn = store.begin().await?;

    let count = inscriptions::count_esip6_siblings(&mut txn, &record.content_hash).await?;
    let (id, esip6_sequence) = if record.esip6 {
        let n = count + 1;
        (format!("{}-{n}", record.content_hash), Some(n as i32))
    } else {
        (record.content_hash.clone(), None)
    };

    let inserted = inscriptions::insert_inscription(
        &mut txn,
        &NewInscription {
            id: id.clone(),
            content_hash: record.content_hash.clone(),
            content_type: record.content_type.clone(),
            creator: record.creator,
            initial_owner: record.initial_owner,
            creation_tx: record.tx_hash,
            creation_block: block_number,
            creation_timestamp: block_timestamp,
            esip6: record.esip6,
            esip6_sequence,
            created_by_contract: record.created_by_contract,
            creator_contract: record.creator_contract,
        },
    )
    .await?;

    if !inserted {
        debug!(id, "duplicate ethscription id, absorbed without error");
        txn.commit().await?;
        return Ok(());
    }

    dispatch_protocol(&mut txn, &id, record.creator, &record.content_type, &record.canonical_uri).await?;

    txn.commit().await?;
    Ok(())
}

/// Parses the canonical URI's body and, if it's JSON, hands it to the
/// Protocol Handler. A body that doesn't parse as a data URI at this point
/// would be a classifier bug, not a user error, so it's silently skipped
/// rather than treated as a hard failure.
async fn dispatch_protocol(
    txn: &mut StoreTxn,
    inscription_id: &str,
    creator: Address,
    content_type: &str,
    canonical_uri: &str,
) -> Result<(), MaterializerError> {
    let Some(parsed) = indexer_codec::parse_data_uri(canonical_uri) else {
        return Ok(());
    };
    let Some(body) = decode_body(&parsed) else {
        debug!(inscription_id, "data URI body did not decode, skipping protocol dispatch");
        return Ok(());
    };

    let ctx = ProtocolContext { inscription_id, creator };
    indexer_protocol::dispatch(txn, &ctx, content_type, &body).await?;
    Ok(())
}

/// Recovers the literal text of a data URI's body, base64-decoding it first
/// if the `;base64` parameter is present (this is the "non-creation
/// consumer" case — identity was already hashed over the raw, still-encoded
/// canonical string).
fn decode_body(uri: &indexer_codec::DataUri) -> Option<String> {
    if uri.is_base64 {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let bytes = STANDARD.decode(&uri.body).ok()?;
        String::from_utf8(bytes).ok()
    } else {
        Some(uri.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use indexer_store::PostgresStore;

    fn record(content_hash: &str, tx_hash: B256, esip6: bool) -> CreateRecord {
        let owner = address!("000000000000000000000000000000000000aa");
        CreateRecord {
            creator: owner,
            initial_owner: owner,
            tx_hash,
            content_hash: content_hash.to_string(),
            content_type: "text/plain".to_string(),
            canonical_uri: "data:text/plain,hi".to_string(),
            esip6,
            created_by_contract: false,
            creator_contract: None,
        }
    }

    // A plain Create for some content, followed by two ESIP-6 Creates of the
    // same content, must yield `<hash>`, `<hash>-1`, `<hash>-2` in that
    // order — the unsuffixed plain row must not shift the ESIP-6 sequence.
    #[sqlx::test(migrations = "../store/migrations")]
    async fn esip6_sequence_starts_at_one_alongside_a_plain_create(pool: sqlx::PgPool) {
        let store = PostgresStore::from_pool(pool);
        let hash = "0x333";

        apply(&store, 200, Utc::now(), record(hash, B256::repeat_byte(1), false))
            .await
            .unwrap();
        apply(&store, 201, Utc::now(), record(hash, B256::repeat_byte(2), true))
            .await
            .unwrap();
        apply(&store, 202, Utc::now(), record(hash, B256::repeat_byte(3), true))
            .await
            .unwrap();

        let mut txn = store.begin().await.unwrap();
        assert!(inscriptions::exists(&mut txn, hash).await.unwrap());
        assert!(inscriptions::exists(&mut txn, &format!("{hash}-1")).await.unwrap());
        assert!(inscriptions::exists(&mut txn, &format!("{hash}-2")).await.unwrap());
    }
}
