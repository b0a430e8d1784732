//! Classifies one transaction or one log into a typed ethscription intent.
//!
//! Ordering of the resulting intents (transaction intents in block order,
//! then log intents in log order) is the Block Processor's responsibility,
//! not this crate's — classification is pure and stateless.

mod intent;
mod log;
mod topics;
mod tx;

pub use intent::{
    ContractCreateIntent, CreateIntent, ExpectedFrom, Intent, TransferIntent, TransferKind,
};
pub use log::classify_log;
pub use topics::{create_topic, transfer_for_previous_owner_topic, transfer_topic};
pub use tx::classify_transaction;
