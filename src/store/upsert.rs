//! Domain snapshot upsert/lookup workers (§4.5): one pooled connection and
//! one parameterized statement per call, each spawned onto a blocking task
//! so the async runtime never blocks on the synchronous Diesel driver.
//!
//! Mirrors `UpsertJettonWallet`/`GetJettonWallet`/... in
//! `InsertManagerPostgres.cpp`: `INSERT ... ON CONFLICT (address) DO UPDATE
//! SET ... WHERE stored.last_transaction_lt < EXCLUDED.last_transaction_lt`
//! for writes, `SELECT ... WHERE address = $1` for reads, with row-count
//! discrimination between `NOT_FOUND` and `DB_ERROR`.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::schema::{jetton_masters, jetton_wallets, nft_collections, nft_items};
use crate::db::{JettonMasterRow, JettonMasterSnapshot, JettonWalletRow, NftCollectionRow, NftCollectionSnapshot, NftItemRow, NftItemSnapshot};
use crate::error::StoreError;
use crate::schema::{JettonMasterData, JettonWalletData, NFTCollectionData, NFTItemData};

use super::PgPool;

async fn with_conn<T, F>(pool: PgPool, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| StoreError::db(format!("upsert task panicked: {e}")))?
}

fn one_row<T>(mut rows: Vec<T>, context: &str) -> Result<T, StoreError> {
    match rows.len() {
        0 => Err(StoreError::NotFound),
        1 => Ok(rows.pop().expect("len checked")),
        n => Err(StoreError::db(format!("{context}: expected one row, found {n}"))),
    }
}

pub async fn upsert_jetton_wallet(pool: PgPool, w: JettonWalletData) -> Result<(), StoreError> {
    let row = JettonWalletRow::from(&w);
    with_conn(pool, move |conn| {
        diesel::insert_into(jetton_wallets::table)
            .values(&row)
            .on_conflict(jetton_wallets::address)
            .do_update()
            .set((
                jetton_wallets::balance.eq(excluded(jetton_wallets::balance)),
                jetton_wallets::owner.eq(excluded(jetton_wallets::owner)),
                jetton_wallets::jetton.eq(excluded(jetton_wallets::jetton)),
                jetton_wallets::last_transaction_lt.eq(excluded(jetton_wallets::last_transaction_lt)),
                jetton_wallets::code_hash.eq(excluded(jetton_wallets::code_hash)),
                jetton_wallets::data_hash.eq(excluded(jetton_wallets::data_hash)),
            ))
            .filter(jetton_wallets::last_transaction_lt.lt(excluded(jetton_wallets::last_transaction_lt)))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn get_jetton_wallet(pool: PgPool, address: String) -> Result<JettonWalletData, StoreError> {
    with_conn(pool, move |conn| {
        let rows: Vec<JettonWalletRow> = jetton_wallets::table
            .filter(jetton_wallets::address.eq(&address))
            .load(conn)?;
        one_row(rows, "jetton wallet")?
            .into_data()
            .map_err(StoreError::db)
    })
    .await
}

pub async fn upsert_jetton_master(pool: PgPool, m: JettonMasterData) -> Result<(), StoreError> {
    let row = JettonMasterRow::from(&m);
    with_conn(pool, move |conn| {
        diesel::insert_into(jetton_masters::table)
            .values(&row)
            .on_conflict(jetton_masters::address)
            .do_update()
            .set((
                jetton_masters::total_supply.eq(excluded(jetton_masters::total_supply)),
                jetton_masters::mintable.eq(excluded(jetton_masters::mintable)),
                jetton_masters::admin_address.eq(excluded(jetton_masters::admin_address)),
                jetton_masters::jetton_content.eq(excluded(jetton_masters::jetton_content)),
                jetton_masters::jetton_wallet_code_hash.eq(excluded(jetton_masters::jetton_wallet_code_hash)),
                jetton_masters::data_hash.eq(excluded(jetton_masters::data_hash)),
                jetton_masters::code_hash.eq(excluded(jetton_masters::code_hash)),
                jetton_masters::last_transaction_lt.eq(excluded(jetton_masters::last_transaction_lt)),
                jetton_masters::code_boc.eq(excluded(jetton_masters::code_boc)),
                jetton_masters::data_boc.eq(excluded(jetton_masters::data_boc)),
            ))
            .filter(jetton_masters::last_transaction_lt.lt(excluded(jetton_masters::last_transaction_lt)))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn get_jetton_master(pool: PgPool, address: String) -> Result<JettonMasterSnapshot, StoreError> {
    with_conn(pool, move |conn| {
        let rows: Vec<JettonMasterRow> = jetton_masters::table
            .filter(jetton_masters::address.eq(&address))
            .load(conn)?;
        one_row(rows, "jetton master")?
            .into_snapshot()
            .map_err(StoreError::db)
    })
    .await
}

pub async fn upsert_nft_collection(pool: PgPool, c: NFTCollectionData) -> Result<(), StoreError> {
    let row = NftCollectionRow::from(&c);
    with_conn(pool, move |conn| {
        diesel::insert_into(nft_collections::table)
            .values(&row)
            .on_conflict(nft_collections::address)
            .do_update()
            .set((
                nft_collections::next_item_index.eq(excluded(nft_collections::next_item_index)),
                nft_collections::owner_address.eq(excluded(nft_collections::owner_address)),
                nft_collections::collection_content.eq(excluded(nft_collections::collection_content)),
                nft_collections::data_hash.eq(excluded(nft_collections::data_hash)),
                nft_collections::code_hash.eq(excluded(nft_collections::code_hash)),
                nft_collections::last_transaction_lt.eq(excluded(nft_collections::last_transaction_lt)),
                nft_collections::code_boc.eq(excluded(nft_collections::code_boc)),
                nft_collections::data_boc.eq(excluded(nft_collections::data_boc)),
            ))
            .filter(nft_collections::last_transaction_lt.lt(excluded(nft_collections::last_transaction_lt)))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn get_nft_collection(pool: PgPool, address: String) -> Result<NftCollectionSnapshot, StoreError> {
    with_conn(pool, move |conn| {
        let rows: Vec<NftCollectionRow> = nft_collections::table
            .filter(nft_collections::address.eq(&address))
            .load(conn)?;
        one_row(rows, "nft collection")?
            .into_snapshot()
            .map_err(StoreError::db)
    })
    .await
}

/// `UpsertNftItem` in `InsertManagerPostgres.cpp` updates unconditionally,
/// with no `last_transaction_lt` guard. spec.md's invariant 7 and its §6
/// table surface state the guard applies to every domain snapshot table
/// uniformly, `nft_items` included, so this crate adds it here rather than
/// reproducing the original's gap (see DESIGN.md).
pub async fn upsert_nft_item(pool: PgPool, i: NFTItemData) -> Result<(), StoreError> {
    let row = NftItemRow::from(&i);
    with_conn(pool, move |conn| {
        diesel::insert_into(nft_items::table)
            .values(&row)
            .on_conflict(nft_items::address)
            .do_update()
            .set((
                nft_items::init.eq(excluded(nft_items::init)),
                nft_items::index.eq(excluded(nft_items::index)),
                nft_items::collection_address.eq(excluded(nft_items::collection_address)),
                nft_items::owner_address.eq(excluded(nft_items::owner_address)),
                nft_items::content.eq(excluded(nft_items::content)),
                nft_items::last_transaction_lt.eq(excluded(nft_items::last_transaction_lt)),
                nft_items::code_hash.eq(excluded(nft_items::code_hash)),
                nft_items::data_hash.eq(excluded(nft_items::data_hash)),
            ))
            .filter(nft_items::last_transaction_lt.lt(excluded(nft_items::last_transaction_lt)))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn get_nft_item(pool: PgPool, address: String) -> Result<NftItemSnapshot, StoreError> {
    with_conn(pool, move |conn| {
        let rows: Vec<NftItemRow> = nft_items::table
            .filter(nft_items::address.eq(&address))
            .load(conn)?;
        one_row(rows, "nft item")?.into_snapshot().map_err(StoreError::db)
    })
    .await
}
