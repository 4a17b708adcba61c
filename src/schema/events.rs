use std::collections::BTreeMap;

use num_bigint::BigUint;

use super::Hash256;

/// Jetton transfer event, as already produced by the jetton/NFT detector
/// this crate consumes but does not implement.
#[derive(Debug, Clone)]
pub struct JettonTransfer {
    pub transaction_hash: String,
    pub query_id: i64,
    pub amount: Option<BigUint>,
    pub destination: String,
    pub response_destination: String,
    pub custom_payload_boc: Option<Vec<u8>>,
    pub forward_ton_amount: Option<BigUint>,
    pub forward_payload_boc: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct JettonBurn {
    pub transaction_hash: String,
    pub query_id: i64,
    pub amount: Option<BigUint>,
    pub response_destination: String,
    pub custom_payload_boc: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct NFTTransfer {
    pub transaction_hash: String,
    pub query_id: i64,
    pub nft_item: String,
    pub old_owner: String,
    pub new_owner: String,
    pub response_destination: String,
    pub custom_payload_boc: Option<Vec<u8>>,
    pub forward_amount: Option<BigUint>,
    pub forward_payload_boc: Option<Vec<u8>>,
}

/// Jetton wallet snapshot, last-writer-wins on `last_transaction_lt`.
#[derive(Debug, Clone)]
pub struct JettonWalletData {
    pub balance: BigUint,
    pub address: String,
    pub owner: String,
    pub jetton: String,
    pub last_transaction_lt: u64,
    pub code_hash: Hash256,
    pub data_hash: Hash256,
}

#[derive(Debug, Clone)]
pub struct JettonMasterData {
    pub address: String,
    pub total_supply: BigUint,
    pub mintable: bool,
    pub admin_address: Option<String>,
    pub jetton_content: Option<BTreeMap<String, String>>,
    pub jetton_wallet_code_hash: Hash256,
    pub data_hash: Hash256,
    pub code_hash: Hash256,
    pub last_transaction_lt: u64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NFTCollectionData {
    pub address: String,
    pub next_item_index: BigUint,
    pub owner_address: Option<String>,
    pub collection_content: Option<BTreeMap<String, String>>,
    pub data_hash: Hash256,
    pub code_hash: Hash256,
    pub last_transaction_lt: u64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NFTItemData {
    pub address: String,
    pub init: bool,
    pub index: BigUint,
    pub collection_address: Option<String>,
    pub owner_address: String,
    pub content: Option<BTreeMap<String, String>>,
    pub last_transaction_lt: u64,
    pub code_hash: Hash256,
    pub data_hash: Hash256,
}

pub fn content_to_json(content: &BTreeMap<String, String>) -> serde_json::Value {
    serde_json::to_value(content).expect("BTreeMap<String, String> always serializes")
}
