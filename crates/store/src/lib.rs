//! Relational store for the ethscriptions indexer.
//!
//! [`PostgresStore`] owns the connection pool and exposes [`Store::begin`]
//! for opening one transaction per intent; the free functions in
//! [`inscriptions`], [`collections`], and [`tokens`] operate against that
//! transaction so a crash mid-intent can never leave related rows (an
//! inscription and its collection item, a token note and its supply
//! increment) partially applied.

pub mod addr;
pub mod collections;
pub mod error;
pub mod inscriptions;
pub mod models;
pub mod postgres;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use postgres::{PostgresStore, Store, StoreTxn};
