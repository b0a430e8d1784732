//! Topic-0 signatures for the three ethscriptions protocol events.

use std::sync::OnceLock;

use alloy_primitives::{keccak256, B256};

const TRANSFER_SIG: &str = "ethscriptions_protocol_TransferEthscription(address,bytes32)";
const TRANSFER_FOR_PREVIOUS_OWNER_SIG: &str =
    "ethscriptions_protocol_TransferEthscriptionForPreviousOwner(address,address,bytes32)";
const CREATE_SIG: &str = "ethscriptions_protocol_CreateEthscription(address,string)";

/// T1: ESIP-1 contract-emitted transfer, no previous-owner check.
pub fn transfer_topic() -> B256 {
    static CELL: OnceLock<B256> = OnceLock::new();
    *CELL.get_or_init(|| keccak256(TRANSFER_SIG.as_bytes()))
}

/// T2: ESIP-2 contract-emitted transfer with an expected previous owner.
pub fn transfer_for_previous_owner_topic() -> B256 {
    static CELL: OnceLock<B256> = OnceLock::new();
    *CELL.get_or_init(|| keccak256(TRANSFER_FOR_PREVIOUS_OWNER_SIG.as_bytes()))
}

/// T3: ESIP-3 contract-emitted create.
pub fn create_topic() -> B256 {
    static CELL: OnceLock<B256> = OnceLock::new();
    *CELL.get_or_init(|| keccak256(CREATE_SIG.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_stable_and_distinct() {
        let t1 = transfer_topic();
        let t2 = transfer_for_previous_owner_topic();
        let t3 = create_topic();
        assert_ne!(t1, t2);
        assert_ne!(t2, t3);
        assert_ne!(t1, t3);
        assert_eq!(t1, transfer_topic());
    }
}
