use alloy_primitives::{Address, B256};

/// How a Transfer intent was produced; carried through to the persisted
/// `Transfer.transfer_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// EOA-initiated, either single or part of an ESIP-5 bulk transfer.
    Eoa,
    /// ESIP-1 contract-emitted transfer (no previous-owner check).
    Esip1,
    /// ESIP-2 contract-emitted transfer with an expected previous owner.
    Esip2,
}

/// A Create candidate from an EOA self-transfer transaction.
#[derive(Debug, Clone)]
pub struct CreateIntent {
    pub creator: Address,
    pub tx_hash: B256,
    /// `0x` + lowercase hex SHA-256 of the canonical data URI. Not yet
    /// ESIP-6 suffixed — that is the Materializer's job.
    pub content_hash: String,
    pub content_type: String,
    pub esip6: bool,
    /// The canonicalized URI body, kept only transiently so the Protocol
    /// Handler can parse a JSON payload; never persisted.
    pub canonical_uri: String,
    pub created_by_contract: bool,
    pub creator_contract: Option<Address>,
}

/// A Transfer intent, either EOA-initiated or contract-emitted.
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub inscription_id: String,
    pub tx_hash: B256,
    pub to: Address,
    pub kind: TransferKind,
    /// `tx.from` for EOA transfers; the emitting contract for ESIP-1/2.
    pub expected_from: ExpectedFrom,
    pub log_index: Option<u64>,
    pub contract_address: Option<Address>,
}

/// What a Transfer's precondition check is against.
#[derive(Debug, Clone, Copy)]
pub enum ExpectedFrom {
    /// EOA: must equal `tx.from`.
    TxSender(Address),
    /// ESIP-1: no check, always succeeds against current owner.
    NoCheck,
    /// ESIP-2: must equal exactly this previous-owner address.
    Exact(Address),
}

/// A Create candidate from an ESIP-3 contract-emitted event.
#[derive(Debug, Clone)]
pub struct ContractCreateIntent {
    pub contract: Address,
    pub tx_hash: B256,
    pub initial_owner: Address,
    pub content_uri: String,
}

/// The typed output of classifying one transaction or one log.
#[derive(Debug, Clone)]
pub enum Intent {
    Create(CreateIntent),
    Transfer(TransferIntent),
    ContractCreate(ContractCreateIntent),
}
