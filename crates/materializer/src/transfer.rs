//! Applies Transfer intents.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use indexer_classifier::{ExpectedFrom, TransferIntent, TransferKind};
use indexer_store::{inscriptions, NewTransfer, Store, TransferType};
use tracing::debug;

use crate::error::MaterializerError;

pub(crate) async fn apply(
    store: &dyn Store,
    block_number: u64,
    block_timestamp: DateTime<Utc>,
    intent: TransferIntent,
) -> Result<(), MaterializerError> {
    let mut txn = store.begin().await?;

    let Some(current_owner) = inscriptions::get_owner(&mut txn, &intent.inscription_id).await? else {
        debug!(id = intent.inscription_id, "transfer of unknown inscription, dropped");
        txn.commit().await?;
        return Ok(());
    };

    let expected: Address = match intent.expected_from {
        ExpectedFrom::TxSender(addr) | ExpectedFrom::Exact(addr) => addr,
        ExpectedFrom::NoCheck => current_owner,
    };
    let precondition_holds = match intent.expected_from {
        ExpectedFrom::TxSender(addr) | ExpectedFrom::Exact(addr) => addr == current_owner,
        ExpectedFrom::NoCheck => true,
    };
    if !precondition_holds {
        debug!(
            id = intent.inscription_id,
            expected = %expected,
            actual = %current_owner,
            "transfer precondition failed, dropped"
        );
        txn.commit().await?;
        return Ok(());
    }

    let applied = inscriptions::update_owner_cas(&mut txn, &intent.inscription_id, expected, intent.to).await?;
    if !applied {
        // Owner changed between the read above and this write — another
        // intent in the same block won the race. Drop rather than retry;
        // the loser's precondition is simply no longer true.
        debug!(id = intent.inscription_id, "transfer CAS lost a race, dropped");
        txn.commit().await?;
        return Ok(());
    }

    inscriptions::insert_transfer(
        &mut txn,
        &NewTransfer {
            inscription_id: intent.inscription_id.clone(),
            from: expected,
            to: intent.to,
            tx_hash: intent.tx_hash,
            block_number,
            timestamp: block_timestamp,
            log_index: intent.log_index,
            contract_address: intent.contract_address,
            transfer_type: match intent.kind {
                TransferKind::Eoa => TransferType::Eoa,
                TransferKind::Esip1 => TransferType::Esip1,
                TransferKind::Esip2 => TransferType::Esip2,
            },
        },
    )
    .await?;

    inscriptions::mirror_token_note_owner(&mut txn, &intent.inscription_id, intent.to).await?;

    txn.commit().await?;
    Ok(())
}
