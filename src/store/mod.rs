//! The persistence layer: an Insert Batcher queueing parsed bundles for
//! transactional multi-table writes, and a set of per-row domain upsert/
//! lookup workers with last-writer-wins semantics.

mod batcher;
mod insert;
mod stats;
mod upsert;

use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::error::StoreError;
use crate::parser::ParsedBundle;
use crate::schema::{JettonBurn, JettonMasterData, JettonTransfer, JettonWalletData, NFTCollectionData, NFTItemData, NFTTransfer};

pub use stats::Stats;

pub use crate::db::{JettonMasterSnapshot, NftCollectionSnapshot, NftItemSnapshot};

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// One unit handed to `Store::insert`: the parser's output for a masterchain
/// block plus its shard blocks, paired with the domain events the jetton/NFT
/// detector produced for the same blocks. The detector itself is an external
/// collaborator this crate doesn't implement — it hands these vectors to the
/// caller, who folds them into the bundle before enqueuing it.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub parsed: ParsedBundle,
    pub jetton_transfers: Vec<JettonTransfer>,
    pub jetton_burns: Vec<JettonBurn>,
    pub nft_transfers: Vec<NFTTransfer>,
}

impl From<ParsedBundle> for Bundle {
    fn from(parsed: ParsedBundle) -> Self {
        Bundle {
            parsed,
            jetton_transfers: Vec::new(),
            jetton_burns: Vec::new(),
            nft_transfers: Vec::new(),
        }
    }
}

type InsertJob = (Bundle, oneshot::Sender<Result<(), StoreError>>);

/// The store's external interface (spec §6): `insert` for batched bundle
/// persistence, and upsert/lookup pairs for the four domain snapshot tables.
pub struct Store {
    pool: PgPool,
    insert_tx: mpsc::UnboundedSender<InsertJob>,
}

impl Store {
    /// Opens a connection pool and starts the Insert Batcher task.
    pub fn connect(config: &Config) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(config.connection_string());
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .build(manager)
            .map_err(|e| StoreError::db(e.to_string()))?;

        let (insert_tx, insert_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(Stats::new());
        batcher::spawn(pool.clone(), insert_rx, config.batch_size, stats);

        Ok(Store { pool, insert_tx })
    }

    /// Enqueues a parsed bundle and awaits the batch it lands in. The whole
    /// batch commits or fails together (§4.4); `bundle` is dropped either way
    /// once this resolves.
    pub async fn insert(&self, bundle: impl Into<Bundle>) -> Result<(), StoreError> {
        let (tx, rx) = oneshot::channel();
        self.insert_tx
            .send((bundle.into(), tx))
            .map_err(|_| StoreError::db("insert batcher task is gone"))?;
        rx.await.map_err(|_| StoreError::db("insert batcher dropped the completion handle"))?
    }

    pub async fn upsert_jetton_wallet(&self, w: JettonWalletData) -> Result<(), StoreError> {
        upsert::upsert_jetton_wallet(self.pool.clone(), w).await
    }

    pub async fn get_jetton_wallet(&self, address: &str) -> Result<JettonWalletData, StoreError> {
        upsert::get_jetton_wallet(self.pool.clone(), address.to_string()).await
    }

    pub async fn upsert_jetton_master(&self, m: JettonMasterData) -> Result<(), StoreError> {
        upsert::upsert_jetton_master(self.pool.clone(), m).await
    }

    pub async fn get_jetton_master(&self, address: &str) -> Result<JettonMasterSnapshot, StoreError> {
        upsert::get_jetton_master(self.pool.clone(), address.to_string()).await
    }

    pub async fn upsert_nft_collection(&self, c: NFTCollectionData) -> Result<(), StoreError> {
        upsert::upsert_nft_collection(self.pool.clone(), c).await
    }

    pub async fn get_nft_collection(&self, address: &str) -> Result<NftCollectionSnapshot, StoreError> {
        upsert::get_nft_collection(self.pool.clone(), address.to_string()).await
    }

    pub async fn upsert_nft_item(&self, i: NFTItemData) -> Result<(), StoreError> {
        upsert::upsert_nft_item(self.pool.clone(), i).await
    }

    pub async fn get_nft_item(&self, address: &str) -> Result<NftItemSnapshot, StoreError> {
        upsert::get_nft_item(self.pool.clone(), address.to_string()).await
    }
}
