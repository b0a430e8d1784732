//! Addresses are persisted as lowercase `0x`-prefixed hex text, matching the
//! string identity scheme the classifier and protocol handler already work
//! in, rather than as `bytea`.

use alloy_primitives::Address;

use crate::error::{StoreError, StoreResult};

pub fn to_text(address: Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

pub fn from_text(s: &str) -> StoreResult<Address> {
    s.parse::<Address>()
        .map_err(|_| StoreError::MalformedAddress(s.to_string()))
}
