//! Semantic record types for the indexer's data model. Mirrors the logical
//! shape, not the raw SQL row shapes (those stay private to each storage
//! module).

use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Eoa,
    Esip1,
    Esip2,
}

impl TransferType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferType::Eoa => "eoa",
            TransferType::Esip1 => "esip1",
            TransferType::Esip2 => "esip2",
        }
    }
}

/// A new inscription to insert. `id` already carries any ESIP-6 `-N` suffix
/// computed by the materializer.
#[derive(Debug, Clone)]
pub struct NewInscription {
    pub id: String,
    pub content_hash: String,
    pub content_type: String,
    pub creator: Address,
    /// Initial `current_owner`. Equal to `creator` for EOA-created
    /// inscriptions; may differ for ESIP-3 contract creates, where the
    /// emitting contract is the creator but `initialOwner` is the owner.
    pub initial_owner: Address,
    pub creation_tx: B256,
    pub creation_block: u64,
    pub creation_timestamp: DateTime<Utc>,
    pub esip6: bool,
    pub esip6_sequence: Option<i32>,
    pub created_by_contract: bool,
    pub creator_contract: Option<Address>,
}

#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub inscription_id: String,
    pub from: Address,
    pub to: Address,
    pub tx_hash: B256,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    pub log_index: Option<u64>,
    pub contract_address: Option<Address>,
    pub transfer_type: TransferType,
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub max_supply: i64,
    pub owner: Address,
    pub locked: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionItem {
    pub collection_id: String,
    pub item_index: i32,
    pub inscription_id: String,
    pub metadata: Option<serde_json::Value>,
}

/// Which fungible-token sub-protocol a TokenNote belongs to; `note_id` is
/// dense only within a given `(kind, tick)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fixed,
    Bonding,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Fixed => "fixed",
            TokenKind::Bonding => "bonding",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedToken {
    pub tick: String,
    pub max_supply: i64,
    pub denomination: i64,
    pub minted: i64,
}

#[derive(Debug, Clone)]
pub struct BondingToken {
    pub tick: String,
    pub max_supply: i64,
    pub denomination: i64,
    pub minted: i64,
    pub base_price: i64,
    pub price_increment: i64,
    pub reserve: i64,
}

#[derive(Debug, Clone)]
pub struct TokenNote {
    pub tick: String,
    pub note_id: i32,
    pub kind: TokenKind,
    pub inscription_id: String,
    pub owner: Address,
    pub amount: i64,
}
