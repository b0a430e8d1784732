//! Log classification.

use alloy_primitives::Address;
use alloy_sol_types::SolValue;
use indexer_rpc::Log;

use crate::intent::{ContractCreateIntent, ExpectedFrom, Intent, TransferIntent, TransferKind};
use crate::topics::{create_topic, transfer_for_previous_owner_topic, transfer_topic};

/// Classifies one log against the three topic-0 signatures of interest.
/// Returns `None` for any log whose topic0 doesn't match, or whose payload
/// fails to decode.
pub fn classify_log(log: &Log) -> Option<Intent> {
    let topic0 = *log.topics.first()?;

    if topic0 == transfer_topic() {
        // ethscriptions_protocol_TransferEthscription(address indexed recipient, bytes32 indexed id)
        let recipient = address_from_topic(*log.topics.get(1)?);
        let id = log.topics.get(2)?;
        return Some(Intent::Transfer(TransferIntent {
            inscription_id: format!("0x{}", hex::encode(id)),
            tx_hash: log.tx_hash,
            to: recipient,
            kind: TransferKind::Esip1,
            expected_from: ExpectedFrom::NoCheck,
            log_index: Some(log.log_index),
            contract_address: Some(log.address),
        }));
    }

    if topic0 == transfer_for_previous_owner_topic() {
        // ethscriptions_protocol_TransferEthscriptionForPreviousOwner(address indexed previousOwner, address indexed recipient, bytes32 indexed id)
        let previous_owner = address_from_topic(*log.topics.get(1)?);
        let recipient = address_from_topic(*log.topics.get(2)?);
        let id = log.topics.get(3)?;
        return Some(Intent::Transfer(TransferIntent {
            inscription_id: format!("0x{}", hex::encode(id)),
            tx_hash: log.tx_hash,
            to: recipient,
            kind: TransferKind::Esip2,
            expected_from: ExpectedFrom::Exact(previous_owner),
            log_index: Some(log.log_index),
            contract_address: Some(log.address),
        }));
    }

    if topic0 == create_topic() {
        // ethscriptions_protocol_CreateEthscription(address indexed initialOwner, string contentURI)
        let initial_owner = address_from_topic(*log.topics.get(1)?);
        let content_uri = String::abi_decode(&log.data, true).ok()?;
        return Some(Intent::ContractCreate(ContractCreateIntent {
            contract: log.address,
            tx_hash: log.tx_hash,
            initial_owner,
            content_uri,
        }));
    }

    None
}

/// Recovers a right-padded 32-byte topic's trailing 20 bytes as an address.
fn address_from_topic(topic: alloy_primitives::B256) -> Address {
    Address::from_slice(&topic[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, B256};

    fn padded_address(a: Address) -> B256 {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(a.as_slice());
        B256::from(bytes)
    }

    #[test]
    fn unknown_topic_is_none() {
        let log = Log {
            address: Address::ZERO,
            topics: vec![B256::ZERO],
            data: Vec::new().into(),
            tx_hash: B256::ZERO,
            log_index: 0,
        };
        assert!(classify_log(&log).is_none());
    }

    #[test]
    fn esip1_transfer_recovers_recipient_and_id() {
        let contract = address!("00000000000000000000000000000000000c01");
        let recipient = address!("00000000000000000000000000000000000b01");
        let id = B256::repeat_byte(0xAB);
        let log = Log {
            address: contract,
            topics: vec![transfer_topic(), padded_address(recipient), id],
            data: Vec::new().into(),
            tx_hash: B256::ZERO,
            log_index: 7,
        };
        match classify_log(&log).unwrap() {
            Intent::Transfer(t) => {
                assert_eq!(t.to, recipient);
                assert_eq!(t.contract_address, Some(contract));
                assert_eq!(t.log_index, Some(7));
                assert!(matches!(t.kind, TransferKind::Esip1));
                assert!(matches!(t.expected_from, ExpectedFrom::NoCheck));
            }
            _ => panic!("expected Transfer"),
        }
    }

    #[test]
    fn esip2_transfer_carries_expected_previous_owner() {
        let contract = address!("00000000000000000000000000000000000c02");
        let prev = address!("00000000000000000000000000000000000a02");
        let recipient = address!("00000000000000000000000000000000000b02");
        let id = B256::repeat_byte(0xCD);
        let log = Log {
            address: contract,
            topics: vec![
                transfer_for_previous_owner_topic(),
                padded_address(prev),
                padded_address(recipient),
                id,
            ],
            data: Vec::new().into(),
            tx_hash: B256::ZERO,
            log_index: 3,
        };
        match classify_log(&log).unwrap() {
            Intent::Transfer(t) => {
                assert_eq!(t.to, recipient);
                assert!(matches!(t.expected_from, ExpectedFrom::Exact(p) if p == prev));
                assert!(matches!(t.kind, TransferKind::Esip2));
            }
            _ => panic!("expected Transfer"),
        }
    }

    #[test]
    fn esip3_create_decodes_content_uri() {
        let contract = address!("00000000000000000000000000000000000c03");
        let owner = address!("00000000000000000000000000000000000a03");
        let data = String::from("data:,xyz").abi_encode();
        let log = Log {
            address: contract,
            topics: vec![create_topic(), padded_address(owner)],
            data: data.into(),
            tx_hash: B256::ZERO,
            log_index: 0,
        };
        match classify_log(&log).unwrap() {
            Intent::ContractCreate(c) => {
                assert_eq!(c.contract, contract);
                assert_eq!(c.initial_owner, owner);
                assert_eq!(c.content_uri, "data:,xyz");
            }
            _ => panic!("expected ContractCreate"),
        }
    }
}
