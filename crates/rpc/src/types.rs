//! Wire types returned by the JSON-RPC pool.

use alloy_primitives::{Address, Bytes, B256};
use serde::Deserialize;

/// One block, with full transaction objects (never just hashes).
#[derive(Debug, Clone)]
pub struct Block {
    pub number: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
}

/// One transaction from a block fetched with `full-tx = true`.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub from: Address,
    /// Absent for contract-creation transactions.
    pub to: Option<Address>,
    pub hash: B256,
    pub input: Bytes,
}

/// One log entry returned by `eth_getLogs`.
#[derive(Debug, Clone)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub tx_hash: B256,
    pub log_index: u64,
}

/// Raw `eth_getBlockByNumber` result shape, deserialized before conversion
/// to [`Block`].
#[derive(Debug, Deserialize)]
pub(crate) struct RawBlock {
    pub number: String,
    pub timestamp: String,
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransaction {
    pub from: Address,
    pub to: Option<Address>,
    pub hash: B256,
    pub input: Bytes,
}

/// Raw `eth_getLogs` entry shape.
#[derive(Debug, Deserialize)]
pub(crate) struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: B256,
    #[serde(rename = "logIndex")]
    pub log_index: String,
}

impl TryFrom<RawBlock> for Block {
    type Error = std::num::ParseIntError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            number: parse_hex_u64(&raw.number)?,
            timestamp: parse_hex_u64(&raw.timestamp)?,
            transactions: raw
                .transactions
                .into_iter()
                .map(|t| Transaction {
                    from: t.from,
                    to: t.to,
                    hash: t.hash,
                    input: t.input,
                })
                .collect(),
        })
    }
}

impl TryFrom<RawLog> for Log {
    type Error = std::num::ParseIntError;

    fn try_from(raw: RawLog) -> Result<Self, Self::Error> {
        Ok(Log {
            address: raw.address,
            topics: raw.topics,
            data: raw.data,
            tx_hash: raw.transaction_hash,
            log_index: parse_hex_u64(&raw.log_index)?,
        })
    }
}

pub(crate) fn parse_hex_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
}
