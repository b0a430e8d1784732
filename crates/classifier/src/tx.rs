//! Transaction classification.

use alloy_primitives::{Address, B256};
use indexer_codec::{has_rule_esip6, inflate_gzip, parse_data_uri, sha256_lower_hex, to_utf8};
use indexer_rpc::Transaction;

use crate::intent::{CreateIntent, ExpectedFrom, Intent, TransferIntent, TransferKind};

/// Classifies one transaction into zero, one, or many intents:
/// - absent `to` → no intents (contract creation tx)
/// - self-transfer with a `data:` calldata prefix → one Create
/// - calldata whose length is a positive multiple of 32 bytes → one
///   Transfer per 32-byte chunk (ESIP-5 bulk transfer)
/// - anything else → no intents
pub fn classify_transaction(tx: &Transaction) -> Vec<Intent> {
    let Some(to) = tx.to else {
        return Vec::new();
    };
    let from = tx.from;

    if from == to {
        return classify_self_transfer(&tx.input, from, tx.hash)
            .into_iter()
            .map(Intent::Create)
            .collect();
    }

    classify_bulk_transfer(&tx.input, from, to, tx.hash)
        .into_iter()
        .map(Intent::Transfer)
        .collect()
}

fn classify_self_transfer(input: &[u8], from: Address, tx_hash: B256) -> Option<CreateIntent> {
    let uri = to_utf8(input)?;
    if !uri.starts_with("data:") {
        return None;
    }
    // Validate structure before committing to a Create; a `data:` prefix
    // with no `,` body separator is malformed.
    parse_data_uri(&uri)?;

    let esip6 = has_rule_esip6(&uri);
    let canonical = inflate_gzip(&uri);
    let canonical_parsed = parse_data_uri(&canonical)?;
    let content_hash = sha256_lower_hex(canonical.as_bytes());

    Some(CreateIntent {
        creator: from,
        tx_hash,
        content_hash,
        content_type: canonical_parsed.content_type,
        esip6,
        canonical_uri: canonical,
        created_by_contract: false,
        creator_contract: None,
    })
}

fn classify_bulk_transfer(input: &[u8], from: Address, to: Address, tx_hash: B256) -> Vec<TransferIntent> {
    if input.is_empty() || input.len() % 32 != 0 {
        return Vec::new();
    }
    input
        .chunks_exact(32)
        .map(|chunk| TransferIntent {
            inscription_id: format!("0x{}", hex::encode(chunk)),
            tx_hash,
            to,
            kind: TransferKind::Eoa,
            expected_from: ExpectedFrom::TxSender(from),
            log_index: None,
            contract_address: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn tx(from: Address, to: Option<Address>, input: &[u8]) -> Transaction {
        Transaction {
            from,
            to,
            hash: B256::ZERO,
            input: input.to_vec().into(),
        }
    }

    #[test]
    fn missing_to_is_ignored() {
        let a = address!("0000000000000000000000000000000000000a");
        let intents = classify_transaction(&tx(a, None, b"data:,hi"));
        assert!(intents.is_empty());
    }

    #[test]
    fn self_transfer_with_data_uri_creates() {
        let a = address!("0000000000000000000000000000000000000a");
        let intents = classify_transaction(&tx(a, Some(a), b"data:,hello"));
        assert_eq!(intents.len(), 1);
        match &intents[0] {
            Intent::Create(c) => {
                assert_eq!(c.creator, a);
                assert_eq!(c.content_type, "text/plain");
                assert!(!c.esip6);
            }
            _ => panic!("expected Create"),
        }
    }

    #[test]
    fn self_transfer_without_data_prefix_is_ignored() {
        let a = address!("0000000000000000000000000000000000000a");
        let intents = classify_transaction(&tx(a, Some(a), b"not a data uri"));
        assert!(intents.is_empty());
    }

    #[test]
    fn esip6_rule_detected_on_self_transfer() {
        let a = address!("0000000000000000000000000000000000000a");
        let intents = classify_transaction(&tx(a, Some(a), b"data:,foo;rule=esip6"));
        match &intents[0] {
            Intent::Create(c) => assert!(c.esip6),
            _ => panic!("expected Create"),
        }
    }

    #[test]
    fn bulk_transfer_single_id() {
        let a = address!("0000000000000000000000000000000000000a");
        let b = address!("0000000000000000000000000000000000000b");
        let id = [0x11u8; 32];
        let intents = classify_transaction(&tx(a, Some(b), &id));
        assert_eq!(intents.len(), 1);
        match &intents[0] {
            Intent::Transfer(t) => {
                assert_eq!(t.to, b);
                assert_eq!(t.inscription_id, format!("0x{}", hex::encode(id)));
                assert!(matches!(t.expected_from, ExpectedFrom::TxSender(from) if from == a));
            }
            _ => panic!("expected Transfer"),
        }
    }

    #[test]
    fn bulk_transfer_two_ids() {
        let a = address!("0000000000000000000000000000000000000a");
        let b = address!("0000000000000000000000000000000000000b");
        let mut input = vec![0x11u8; 32];
        input.extend_from_slice(&[0x22u8; 32]);
        let intents = classify_transaction(&tx(a, Some(b), &input));
        assert_eq!(intents.len(), 2);
    }

    #[test]
    fn non_multiple_of_32_is_ignored() {
        let a = address!("0000000000000000000000000000000000000a");
        let b = address!("0000000000000000000000000000000000000b");
        let input = vec![0x11u8; 48]; // hex length 96, not a multiple of 32 bytes
        let intents = classify_transaction(&tx(a, Some(b), &input));
        assert!(intents.is_empty());
    }
}
