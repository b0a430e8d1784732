//! Integration tests against a real Postgres instance, provisioned and
//! migrated per-test by `sqlx::test`. Run with `DATABASE_URL` pointing at a
//! throwaway Postgres server (`cargo test -p indexer-store`).

use alloy_primitives::{address, B256};
use chrono::Utc;

use crate::models::{Collection, NewInscription, NewTransfer, TransferType};
use crate::postgres::{PostgresStore, Store};
use crate::{collections, inscriptions, tokens};

fn sample_inscription(id: &str, content_hash: &str, owner: alloy_primitives::Address) -> NewInscription {
    NewInscription {
        id: id.to_string(),
        content_hash: content_hash.to_string(),
        content_type: "text/plain".to_string(),
        creator: owner,
        initial_owner: owner,
        creation_tx: B256::ZERO,
        creation_block: 100,
        creation_timestamp: Utc::now(),
        esip6: false,
        esip6_sequence: None,
        created_by_contract: false,
        creator_contract: None,
    }
}

fn esip6_inscription(id: &str, content_hash: &str, owner: alloy_primitives::Address) -> NewInscription {
    NewInscription {
        esip6: true,
        esip6_sequence: Some(id.rsplit('-').next().and_then(|n| n.parse().ok()).unwrap_or(1)),
        ..sample_inscription(id, content_hash, owner)
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_then_transfer_updates_owner_and_appends_record(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);
    let a = address!("000000000000000000000000000000000000aa");
    let b = address!("000000000000000000000000000000000000bb");

    let mut txn = store.begin().await.unwrap();
    let inserted = inscriptions::insert_inscription(&mut txn, &sample_inscription("0xabc", "0xabc", a))
        .await
        .unwrap();
    assert!(inserted);
    txn.commit().await.unwrap();

    let mut txn = store.begin().await.unwrap();
    let owner = inscriptions::get_owner(&mut txn, "0xabc").await.unwrap();
    assert_eq!(owner, Some(a));

    let ok = inscriptions::update_owner_cas(&mut txn, "0xabc", a, b).await.unwrap();
    assert!(ok);
    inscriptions::insert_transfer(
        &mut txn,
        &NewTransfer {
            inscription_id: "0xabc".to_string(),
            from: a,
            to: b,
            tx_hash: B256::ZERO,
            block_number: 101,
            timestamp: Utc::now(),
            log_index: None,
            contract_address: None,
            transfer_type: TransferType::Eoa,
        },
    )
    .await
    .unwrap();
    txn.commit().await.unwrap();

    let mut txn = store.begin().await.unwrap();
    let owner = inscriptions::get_owner(&mut txn, "0xabc").await.unwrap();
    assert_eq!(owner, Some(b));
}

#[sqlx::test(migrations = "./migrations")]
async fn transfer_with_wrong_expected_owner_is_rejected(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);
    let a = address!("000000000000000000000000000000000000aa");
    let b = address!("000000000000000000000000000000000000bb");
    let c = address!("000000000000000000000000000000000000cc");

    let mut txn = store.begin().await.unwrap();
    inscriptions::insert_inscription(&mut txn, &sample_inscription("0xdef", "0xdef", a))
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let mut txn = store.begin().await.unwrap();
    // c is not the current owner (a is), so this CAS must fail.
    let ok = inscriptions::update_owner_cas(&mut txn, "0xdef", c, b).await.unwrap();
    assert!(!ok);
    txn.commit().await.unwrap();

    let mut txn = store.begin().await.unwrap();
    let owner = inscriptions::get_owner(&mut txn, "0xdef").await.unwrap();
    assert_eq!(owner, Some(a));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_create_is_absorbed_without_error(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);
    let a = address!("000000000000000000000000000000000000aa");

    let mut txn = store.begin().await.unwrap();
    let first = inscriptions::insert_inscription(&mut txn, &sample_inscription("0x111", "0x111", a))
        .await
        .unwrap();
    let second = inscriptions::insert_inscription(&mut txn, &sample_inscription("0x111", "0x111", a))
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert!(first);
    assert!(!second);
}

#[sqlx::test(migrations = "./migrations")]
async fn esip6_sequencing_excludes_the_unsuffixed_base_row(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);
    let a = address!("000000000000000000000000000000000000aa");

    let mut txn = store.begin().await.unwrap();
    inscriptions::insert_inscription(&mut txn, &sample_inscription("0x222", "0x222", a))
        .await
        .unwrap();
    // A plain, non-ESIP-6 Create for this content hash must not count toward
    // the ESIP-6 sequence.
    let count = inscriptions::count_esip6_siblings(&mut txn, "0x222").await.unwrap();
    assert_eq!(count, 0);

    inscriptions::insert_inscription(&mut txn, &esip6_inscription("0x222-1", "0x222", a))
        .await
        .unwrap();
    let count = inscriptions::count_esip6_siblings(&mut txn, "0x222").await.unwrap();
    assert_eq!(count, 1);

    inscriptions::insert_inscription(&mut txn, &esip6_inscription("0x222-2", "0x222", a))
        .await
        .unwrap();
    let count = inscriptions::count_esip6_siblings(&mut txn, "0x222").await.unwrap();
    assert_eq!(count, 2);
    txn.commit().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn fixed_token_mint_increments_and_enforces_supply_bound(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);

    let mut txn = store.begin().await.unwrap();
    tokens::insert_fixed_token(&mut txn, "bsct", 1000, 100).await.unwrap();
    for _ in 0..10 {
        let ok = tokens::increment_fixed_minted(&mut txn, "bsct", 100).await.unwrap();
        assert!(ok);
    }
    let rejected = tokens::increment_fixed_minted(&mut txn, "bsct", 100).await.unwrap();
    assert!(!rejected);

    let token = tokens::get_fixed_token(&mut txn, "bsct").await.unwrap().unwrap();
    assert_eq!(token.minted, 1000);
    txn.commit().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn collection_item_index_is_dense_and_bounded(pool: sqlx::PgPool) {
    let store = PostgresStore::from_pool(pool);
    let owner = address!("000000000000000000000000000000000000aa");

    let mut txn = store.begin().await.unwrap();
    inscriptions::insert_inscription(&mut txn, &sample_inscription("0xc01", "0xc01", owner))
        .await
        .unwrap();
    collections::insert_collection(
        &mut txn,
        &Collection {
            id: "0xc01".to_string(),
            name: Some("Foo".to_string()),
            symbol: None,
            description: None,
            max_supply: 2,
            owner,
            locked: false,
        },
    )
    .await
    .unwrap();

    let idx1 = collections::next_item_index(&mut txn, "0xc01").await.unwrap();
    assert_eq!(idx1, 1);
    collections::insert_collection_item(&mut txn, "0xc01", idx1, "0xc01", None)
        .await
        .unwrap();

    let idx2 = collections::next_item_index(&mut txn, "0xc01").await.unwrap();
    assert_eq!(idx2, 2);

    collections::lock_collection(&mut txn, "0xc01").await.unwrap();
    let collection = collections::get_collection(&mut txn, "0xc01").await.unwrap().unwrap();
    assert!(collection.locked);
    txn.commit().await.unwrap();
}
