//! `Insertable` rows, one per table in `schema.rs`, built from the
//! canonical records in `crate::schema` right before a batch is written.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use num_bigint::BigUint;
use std::str::FromStr;

use super::schema::*;
use crate::schema as rec;
use crate::schema::{hash_to_base64, Hash256};

fn big_to_numeric(v: &BigUint) -> BigDecimal {
    BigDecimal::from_str(&v.to_str_radix(10)).expect("decimal string always parses")
}

fn numeric_to_big(v: &BigDecimal) -> Result<BigUint, String> {
    BigUint::from_str(&v.to_string()).map_err(|e| format!("balance not a non-negative integer: {e}"))
}

fn base64_to_hash(s: &str) -> Result<Hash256, String> {
    let bytes = base64::decode(s).map_err(|e| format!("invalid base64 hash {s:?}: {e}"))?;
    if bytes.len() != 32 {
        return Err(format!("hash {s:?} decodes to {} bytes, expected 32", bytes.len()));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(Hash256::from(arr))
}

/// Split-merge addresses are the one hash field the original encodes as
/// plain hex rather than base64 (`to_hex()` in `InsertManagerPostgres.cpp`).
fn hash_hex(h: &Hash256) -> String {
    hex::encode(h.as_array())
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = blocks)]
pub struct BlockRow {
    pub workchain: i32,
    pub shard: i64,
    pub seqno: i32,
    pub root_hash: String,
    pub file_hash: String,
    pub mc_block_workchain: Option<i32>,
    pub mc_block_shard: Option<i64>,
    pub mc_block_seqno: Option<i32>,
    pub global_id: i32,
    pub version: i32,
    pub after_merge: bool,
    pub before_split: bool,
    pub after_split: bool,
    pub want_split: bool,
    pub key_block: bool,
    pub vert_seqno_incr: bool,
    pub flags: i32,
    pub gen_utime: i32,
    pub start_lt: i64,
    pub end_lt: i64,
    pub validator_list_hash_short: i32,
    pub gen_catchain_seqno: i32,
    pub min_ref_mc_seqno: i32,
    pub prev_key_block_seqno: i32,
    pub vert_seqno: i32,
    pub master_ref_seqno: Option<i32>,
    pub rand_seed: String,
    pub created_by: String,
}

impl From<&rec::Block> for BlockRow {
    fn from(b: &rec::Block) -> Self {
        BlockRow {
            workchain: b.workchain,
            shard: b.shard,
            seqno: b.seqno,
            root_hash: b.root_hash.clone(),
            file_hash: b.file_hash.clone(),
            mc_block_workchain: b.mc_block_workchain,
            mc_block_shard: b.mc_block_shard,
            mc_block_seqno: b.mc_block_seqno,
            global_id: b.global_id,
            version: b.version,
            after_merge: b.after_merge,
            before_split: b.before_split,
            after_split: b.after_split,
            want_split: b.want_split,
            key_block: b.key_block,
            vert_seqno_incr: b.vert_seqno_incr,
            flags: b.flags,
            gen_utime: b.gen_utime,
            start_lt: b.start_lt,
            end_lt: b.end_lt,
            validator_list_hash_short: b.validator_list_hash_short,
            gen_catchain_seqno: b.gen_catchain_seqno,
            min_ref_mc_seqno: b.min_ref_mc_seqno,
            prev_key_block_seqno: b.prev_key_block_seqno,
            vert_seqno: b.vert_seqno,
            master_ref_seqno: b.master_ref_seqno,
            rand_seed: b.rand_seed.clone(),
            created_by: b.created_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionRow {
    pub block_workchain: i32,
    pub block_shard: i64,
    pub block_seqno: i32,
    pub account: String,
    pub hash: String,
    pub lt: i64,
    pub now: i32,
    pub orig_status: String,
    pub end_status: String,
    pub total_fees: i64,
    pub account_state_hash_before: String,
    pub account_state_hash_after: String,
    pub description: serde_json::Value,
}

impl TransactionRow {
    pub fn new(t: &rec::Transaction, block: &rec::Block) -> Self {
        TransactionRow {
            block_workchain: block.workchain,
            block_shard: block.shard,
            block_seqno: block.seqno,
            account: t.account.clone(),
            hash: hash_to_base64(&t.hash),
            lt: t.lt as i64,
            now: t.now as i32,
            orig_status: t.orig_status.as_str().to_string(),
            end_status: t.end_status.as_str().to_string(),
            total_fees: t.total_fees as i64,
            account_state_hash_before: hash_to_base64(&t.account_state_hash_before),
            account_state_hash_after: hash_to_base64(&t.account_state_hash_after),
            description: descr_to_json(&t.description),
        }
    }
}

/// `u64`s can exceed the 53 bits a JSON number survives intact through a
/// float-backed consumer; stringify them the way the original's
/// `std::to_string` calls do in `jsonify(...)`.
fn u64_str(v: u64) -> serde_json::Value {
    serde_json::Value::String(v.to_string())
}

fn opt_u64_str(v: Option<u64>) -> serde_json::Value {
    match v {
        Some(v) => u64_str(v),
        None => serde_json::Value::Null,
    }
}

fn descr_to_json(descr: &rec::TransactionDescr) -> serde_json::Value {
    use rec::TransactionDescr::*;
    match descr {
        Ord(d) => serde_json::json!({
            "type": "ord",
            "credit_first": d.credit_first,
            "storage_ph": d.storage_ph.as_ref().map(storage_phase_json),
            "credit_ph": d.credit_ph.as_ref().map(credit_phase_json),
            "compute_ph": compute_phase_json(&d.compute_ph),
            "action": d.action.as_ref().map(action_phase_json),
            "aborted": d.aborted,
            "bounce": d.bounce.as_ref().map(bounce_phase_json),
            "destroyed": d.destroyed,
        }),
        Storage { storage_ph } => serde_json::json!({
            "type": "storage",
            "storage_ph": storage_phase_json(storage_ph),
        }),
        TickTock(d) => serde_json::json!({
            "type": "tick_tock",
            "is_tock": d.is_tock,
            "storage_ph": storage_phase_json(&d.storage_ph),
            "compute_ph": compute_phase_json(&d.compute_ph),
            "action": d.action.as_ref().map(action_phase_json),
            "aborted": d.aborted,
            "destroyed": d.destroyed,
        }),
        SplitPrepare(d) => serde_json::json!({
            "type": "split_prepare",
            "split_info": split_info_json(&d.split_info),
            "storage_ph": d.storage_ph.as_ref().map(storage_phase_json),
            "compute_ph": compute_phase_json(&d.compute_ph),
            "action": d.action.as_ref().map(action_phase_json),
            "aborted": d.aborted,
            "destroyed": d.destroyed,
        }),
        SplitInstall(d) => serde_json::json!({
            "type": "split_install",
            "split_info": split_info_json(&d.split_info),
            "installed": d.installed,
        }),
        MergePrepare(d) => serde_json::json!({
            "type": "merge_prepare",
            "split_info": split_info_json(&d.split_info),
            "storage_ph": storage_phase_json(&d.storage_ph),
            "aborted": d.aborted,
        }),
        MergeInstall(d) => serde_json::json!({
            "type": "merge_install",
            "split_info": split_info_json(&d.split_info),
            "storage_ph": d.storage_ph.as_ref().map(storage_phase_json),
            "credit_ph": d.credit_ph.as_ref().map(credit_phase_json),
            "compute_ph": compute_phase_json(&d.compute_ph),
            "action": d.action.as_ref().map(action_phase_json),
            "aborted": d.aborted,
            "destroyed": d.destroyed,
        }),
    }
}

fn storage_phase_json(p: &rec::TrStoragePhase) -> serde_json::Value {
    serde_json::json!({
        "storage_fees_collected": u64_str(p.storage_fees_collected),
        "storage_fees_due": opt_u64_str(p.storage_fees_due),
        "status_change": p.status_change.as_str(),
    })
}

fn credit_phase_json(p: &rec::TrCreditPhase) -> serde_json::Value {
    serde_json::json!({
        "due_fees_collected": opt_u64_str(p.due_fees_collected),
        "credit": u64_str(p.credit),
    })
}

fn compute_phase_json(p: &rec::TrComputePhase) -> serde_json::Value {
    match p {
        rec::TrComputePhase::Skipped { reason } => serde_json::json!({
            "type": "skipped",
            "skip_reason": reason.as_str(),
        }),
        rec::TrComputePhase::Vm(vm) => serde_json::json!({
            "type": "vm",
            "success": vm.success,
            "msg_state_used": vm.msg_state_used,
            "account_activated": vm.account_activated,
            "gas_fees": u64_str(vm.gas_fees),
            "gas_used": u64_str(vm.gas_used),
            "gas_limit": u64_str(vm.gas_limit),
            "gas_credit": opt_u64_str(vm.gas_credit),
            "mode": vm.mode,
            "exit_code": vm.exit_code,
            "exit_arg": vm.exit_arg,
            "vm_steps": vm.vm_steps,
            "vm_init_state_hash": hash_to_base64(&vm.vm_init_state_hash),
            "vm_final_state_hash": hash_to_base64(&vm.vm_final_state_hash),
        }),
    }
}

fn action_phase_json(p: &rec::TrActionPhase) -> serde_json::Value {
    serde_json::json!({
        "success": p.success,
        "valid": p.valid,
        "no_funds": p.no_funds,
        "status_change": p.status_change.as_str(),
        "total_fwd_fees": opt_u64_str(p.total_fwd_fees),
        "total_action_fees": opt_u64_str(p.total_action_fees),
        "result_code": p.result_code,
        "result_arg": p.result_arg,
        "tot_actions": p.tot_actions,
        "spec_actions": p.spec_actions,
        "skipped_actions": p.skipped_actions,
        "msgs_created": p.msgs_created,
        "action_list_hash": hash_to_base64(&p.action_list_hash),
        "tot_msg_size": { "cells": u64_str(p.tot_msg_size.cells), "bits": u64_str(p.tot_msg_size.bits) },
    })
}

fn bounce_phase_json(p: &rec::TrBouncePhase) -> serde_json::Value {
    match p {
        rec::TrBouncePhase::Negfunds => serde_json::json!({ "type": "negfunds" }),
        rec::TrBouncePhase::Nofunds { msg_size, req_fwd_fees } => serde_json::json!({
            "type": "nofunds",
            "msg_size": { "cells": u64_str(msg_size.cells), "bits": u64_str(msg_size.bits) },
            "req_fwd_fees": u64_str(*req_fwd_fees),
        }),
        rec::TrBouncePhase::Ok { msg_size, msg_fees, fwd_fees } => serde_json::json!({
            "type": "ok",
            "msg_size": { "cells": u64_str(msg_size.cells), "bits": u64_str(msg_size.bits) },
            "msg_fees": u64_str(*msg_fees),
            "fwd_fees": u64_str(*fwd_fees),
        }),
    }
}

/// `this_addr`/`sibling_addr` stay plain hex — the one exception to
/// base64-everywhere, matching `to_hex()` in `InsertManagerPostgres.cpp`.
fn split_info_json(s: &rec::SplitMergeInfo) -> serde_json::Value {
    serde_json::json!({
        "cur_shard_pfx_len": s.cur_shard_pfx_len,
        "acc_split_depth": s.acc_split_depth,
        "this_addr": hash_hex(&s.this_addr),
        "sibling_addr": hash_hex(&s.sibling_addr),
    })
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = messages)]
pub struct MessageRow {
    pub hash: String,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub value: Option<BigDecimal>,
    pub fwd_fee: Option<BigDecimal>,
    pub ihr_fee: Option<BigDecimal>,
    pub created_lt: Option<i64>,
    pub created_at: Option<i32>,
    pub opcode: Option<i32>,
    pub ihr_disabled: Option<bool>,
    pub bounce: Option<bool>,
    pub bounced: Option<bool>,
    pub import_fee: Option<BigDecimal>,
    pub body_hash: String,
    pub init_state_hash: Option<String>,
}

impl From<&rec::Message> for MessageRow {
    fn from(m: &rec::Message) -> Self {
        MessageRow {
            hash: hash_to_base64(&m.hash),
            source: m.source.clone(),
            destination: m.destination.clone(),
            value: m.value.as_ref().map(big_to_numeric),
            fwd_fee: m.fwd_fee.as_ref().map(big_to_numeric),
            ihr_fee: m.ihr_fee.as_ref().map(big_to_numeric),
            created_lt: m.created_lt.map(|v| v as i64),
            created_at: m.created_at.map(|v| v as i32),
            opcode: m.opcode,
            ihr_disabled: m.ihr_disabled,
            bounce: m.bounce,
            bounced: m.bounced,
            import_fee: m.import_fee.as_ref().map(big_to_numeric),
            body_hash: hash_to_base64(&m.body_hash()),
            init_state_hash: m.init_state_hash().map(|h| hash_to_base64(&h)),
        }
    }
}

/// `message_contents(hash, body)`: one row per distinct cell BOC a message
/// references — the body, and, when present, the init-state — keyed by that
/// cell's own hash rather than the message's.
#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = message_contents)]
pub struct MessageContentRow {
    pub hash: String,
    pub body: Vec<u8>,
}

/// Emits the body content row and, when present, the init-state content
/// row for one message.
pub fn message_content_rows(m: &rec::Message) -> Vec<MessageContentRow> {
    let mut rows = vec![MessageContentRow {
        hash: hash_to_base64(&m.body_hash()),
        body: m.body_boc.clone(),
    }];
    if let (Some(hash), Some(boc)) = (m.init_state_hash(), m.init_state_boc.as_ref()) {
        rows.push(MessageContentRow {
            hash: hash_to_base64(&hash),
            body: boc.clone(),
        });
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    In,
    Out,
}

impl MessageDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageDirection::In => "in",
            MessageDirection::Out => "out",
        }
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = transaction_messages)]
pub struct TransactionMessageRow {
    pub transaction_hash: String,
    pub message_hash: String,
    pub direction: String,
}

impl TransactionMessageRow {
    pub fn new(transaction_hash: &Hash256, message_hash: &Hash256, direction: MessageDirection) -> Self {
        TransactionMessageRow {
            transaction_hash: hash_to_base64(transaction_hash),
            message_hash: hash_to_base64(message_hash),
            direction: direction.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = account_states)]
pub struct AccountStateRow {
    pub hash: String,
    pub account: String,
    pub balance: BigDecimal,
    pub account_status: String,
    pub frozen_hash: Option<String>,
    pub code_hash: Option<String>,
    pub data_hash: Option<String>,
}

impl From<&rec::AccountState> for AccountStateRow {
    fn from(a: &rec::AccountState) -> Self {
        AccountStateRow {
            hash: hash_to_base64(&a.hash),
            account: a.account.clone(),
            balance: big_to_numeric(&a.balance),
            account_status: a.account_status.as_str().to_string(),
            frozen_hash: a.frozen_hash.clone(),
            code_hash: a.code_hash.clone(),
            data_hash: a.data_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, Queryable)]
#[diesel(table_name = jetton_wallets)]
pub struct JettonWalletRow {
    pub address: String,
    pub balance: BigDecimal,
    pub owner: String,
    pub jetton: String,
    pub last_transaction_lt: i64,
    pub code_hash: String,
    pub data_hash: String,
}

impl From<&rec::JettonWalletData> for JettonWalletRow {
    fn from(j: &rec::JettonWalletData) -> Self {
        JettonWalletRow {
            address: j.address.clone(),
            balance: big_to_numeric(&j.balance),
            owner: j.owner.clone(),
            jetton: j.jetton.clone(),
            last_transaction_lt: j.last_transaction_lt as i64,
            code_hash: hash_to_base64(&j.code_hash),
            data_hash: hash_to_base64(&j.data_hash),
        }
    }
}

impl JettonWalletRow {
    pub fn into_data(self) -> Result<rec::JettonWalletData, String> {
        Ok(rec::JettonWalletData {
            balance: numeric_to_big(&self.balance)?,
            address: self.address,
            owner: self.owner,
            jetton: self.jetton,
            last_transaction_lt: self.last_transaction_lt as u64,
            code_hash: base64_to_hash(&self.code_hash)?,
            data_hash: base64_to_hash(&self.data_hash)?,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, Queryable)]
#[diesel(table_name = jetton_masters)]
pub struct JettonMasterRow {
    pub address: String,
    pub total_supply: BigDecimal,
    pub mintable: bool,
    pub admin_address: Option<String>,
    pub jetton_content: Option<serde_json::Value>,
    pub jetton_wallet_code_hash: String,
    pub data_hash: String,
    pub code_hash: String,
    pub last_transaction_lt: i64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

impl From<&rec::JettonMasterData> for JettonMasterRow {
    fn from(j: &rec::JettonMasterData) -> Self {
        JettonMasterRow {
            address: j.address.clone(),
            total_supply: big_to_numeric(&j.total_supply),
            mintable: j.mintable,
            admin_address: j.admin_address.clone(),
            jetton_content: j.jetton_content.as_ref().map(rec::content_to_json),
            jetton_wallet_code_hash: hash_to_base64(&j.jetton_wallet_code_hash),
            data_hash: hash_to_base64(&j.data_hash),
            code_hash: hash_to_base64(&j.code_hash),
            last_transaction_lt: j.last_transaction_lt as i64,
            code_boc: j.code_boc.clone(),
            data_boc: j.data_boc.clone(),
        }
    }
}

/// `get_jetton_master`'s return shape: same fields as `JettonMasterData`,
/// but `jetton_content` comes back as whatever JSON was stored rather than
/// a rehydrated `BTreeMap` — the write side can't guarantee it wrote the
/// JSON itself.
#[derive(Debug, Clone)]
pub struct JettonMasterSnapshot {
    pub address: String,
    pub total_supply: BigUint,
    pub mintable: bool,
    pub admin_address: Option<String>,
    pub jetton_content: Option<serde_json::Value>,
    pub jetton_wallet_code_hash: Hash256,
    pub data_hash: Hash256,
    pub code_hash: Hash256,
    pub last_transaction_lt: u64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

impl JettonMasterRow {
    pub fn into_snapshot(self) -> Result<JettonMasterSnapshot, String> {
        Ok(JettonMasterSnapshot {
            address: self.address,
            total_supply: numeric_to_big(&self.total_supply)?,
            mintable: self.mintable,
            admin_address: self.admin_address,
            jetton_content: self.jetton_content,
            jetton_wallet_code_hash: base64_to_hash(&self.jetton_wallet_code_hash)?,
            data_hash: base64_to_hash(&self.data_hash)?,
            code_hash: base64_to_hash(&self.code_hash)?,
            last_transaction_lt: self.last_transaction_lt as u64,
            code_boc: self.code_boc,
            data_boc: self.data_boc,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, Queryable)]
#[diesel(table_name = nft_collections)]
pub struct NftCollectionRow {
    pub address: String,
    pub next_item_index: BigDecimal,
    pub owner_address: Option<String>,
    pub collection_content: Option<serde_json::Value>,
    pub data_hash: String,
    pub code_hash: String,
    pub last_transaction_lt: i64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

impl From<&rec::NFTCollectionData> for NftCollectionRow {
    fn from(n: &rec::NFTCollectionData) -> Self {
        NftCollectionRow {
            address: n.address.clone(),
            next_item_index: big_to_numeric(&n.next_item_index),
            owner_address: n.owner_address.clone(),
            collection_content: n.collection_content.as_ref().map(rec::content_to_json),
            data_hash: hash_to_base64(&n.data_hash),
            code_hash: hash_to_base64(&n.code_hash),
            last_transaction_lt: n.last_transaction_lt as i64,
            code_boc: n.code_boc.clone(),
            data_boc: n.data_boc.clone(),
        }
    }
}

/// `get_nft_collection`'s return shape — see `JettonMasterSnapshot`.
#[derive(Debug, Clone)]
pub struct NftCollectionSnapshot {
    pub address: String,
    pub next_item_index: BigUint,
    pub owner_address: Option<String>,
    pub collection_content: Option<serde_json::Value>,
    pub data_hash: Hash256,
    pub code_hash: Hash256,
    pub last_transaction_lt: u64,
    pub code_boc: Vec<u8>,
    pub data_boc: Vec<u8>,
}

impl NftCollectionRow {
    pub fn into_snapshot(self) -> Result<NftCollectionSnapshot, String> {
        Ok(NftCollectionSnapshot {
            address: self.address,
            next_item_index: numeric_to_big(&self.next_item_index)?,
            owner_address: self.owner_address,
            collection_content: self.collection_content,
            data_hash: base64_to_hash(&self.data_hash)?,
            code_hash: base64_to_hash(&self.code_hash)?,
            last_transaction_lt: self.last_transaction_lt as u64,
            code_boc: self.code_boc,
            data_boc: self.data_boc,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, Queryable)]
#[diesel(table_name = nft_items)]
pub struct NftItemRow {
    pub address: String,
    pub init: bool,
    pub index: BigDecimal,
    pub collection_address: Option<String>,
    pub owner_address: String,
    pub content: Option<serde_json::Value>,
    pub last_transaction_lt: i64,
    pub code_hash: String,
    pub data_hash: String,
}

impl From<&rec::NFTItemData> for NftItemRow {
    fn from(n: &rec::NFTItemData) -> Self {
        NftItemRow {
            address: n.address.clone(),
            init: n.init,
            index: big_to_numeric(&n.index),
            collection_address: n.collection_address.clone(),
            owner_address: n.owner_address.clone(),
            content: n.content.as_ref().map(rec::content_to_json),
            last_transaction_lt: n.last_transaction_lt as i64,
            code_hash: hash_to_base64(&n.code_hash),
            data_hash: hash_to_base64(&n.data_hash),
        }
    }
}

/// `get_nft_item`'s return shape — see `JettonMasterSnapshot`.
#[derive(Debug, Clone)]
pub struct NftItemSnapshot {
    pub address: String,
    pub init: bool,
    pub index: BigUint,
    pub collection_address: Option<String>,
    pub owner_address: String,
    pub content: Option<serde_json::Value>,
    pub last_transaction_lt: u64,
    pub code_hash: Hash256,
    pub data_hash: Hash256,
}

impl NftItemRow {
    pub fn into_snapshot(self) -> Result<NftItemSnapshot, String> {
        Ok(NftItemSnapshot {
            address: self.address,
            init: self.init,
            index: numeric_to_big(&self.index)?,
            collection_address: self.collection_address,
            owner_address: self.owner_address,
            content: self.content,
            last_transaction_lt: self.last_transaction_lt as u64,
            code_hash: base64_to_hash(&self.code_hash)?,
            data_hash: base64_to_hash(&self.data_hash)?,
        })
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = jetton_transfers)]
pub struct JettonTransferRow {
    pub transaction_hash: String,
    pub query_id: i64,
    pub amount: Option<BigDecimal>,
    pub destination: String,
    pub response_destination: String,
    pub custom_payload: Option<Vec<u8>>,
    pub forward_ton_amount: Option<BigDecimal>,
    pub forward_payload: Option<Vec<u8>>,
}

impl From<&rec::JettonTransfer> for JettonTransferRow {
    fn from(e: &rec::JettonTransfer) -> Self {
        JettonTransferRow {
            transaction_hash: e.transaction_hash.clone(),
            query_id: e.query_id,
            amount: e.amount.as_ref().map(big_to_numeric),
            destination: e.destination.clone(),
            response_destination: e.response_destination.clone(),
            custom_payload: e.custom_payload_boc.clone(),
            forward_ton_amount: e.forward_ton_amount.as_ref().map(big_to_numeric),
            forward_payload: e.forward_payload_boc.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = jetton_burns)]
pub struct JettonBurnRow {
    pub transaction_hash: String,
    pub query_id: i64,
    pub amount: Option<BigDecimal>,
    pub response_destination: String,
    pub custom_payload: Option<Vec<u8>>,
}

impl From<&rec::JettonBurn> for JettonBurnRow {
    fn from(e: &rec::JettonBurn) -> Self {
        JettonBurnRow {
            transaction_hash: e.transaction_hash.clone(),
            query_id: e.query_id,
            amount: e.amount.as_ref().map(big_to_numeric),
            response_destination: e.response_destination.clone(),
            custom_payload: e.custom_payload_boc.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable, Queryable)]
#[diesel(table_name = nft_transfers)]
pub struct NftTransferRow {
    pub transaction_hash: String,
    pub query_id: i64,
    pub nft_item: String,
    pub old_owner: String,
    pub new_owner: String,
    pub response_destination: String,
    pub custom_payload: Option<Vec<u8>>,
    pub forward_amount: Option<BigDecimal>,
    pub forward_payload: Option<Vec<u8>>,
}

impl From<&rec::NFTTransfer> for NftTransferRow {
    fn from(e: &rec::NFTTransfer) -> Self {
        NftTransferRow {
            transaction_hash: e.transaction_hash.clone(),
            query_id: e.query_id,
            nft_item: e.nft_item.clone(),
            old_owner: e.old_owner.clone(),
            new_owner: e.new_owner.clone(),
            response_destination: e.response_destination.clone(),
            custom_payload: e.custom_payload_boc.clone(),
            forward_amount: e.forward_amount.as_ref().map(big_to_numeric),
            forward_payload: e.forward_payload_boc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn dummy_message(hash_seed: u8) -> rec::Message {
        let mut bytes = [0u8; 32];
        bytes[0] = hash_seed;
        let body = everscale_types::cell::CellBuilder::new().build().unwrap();
        rec::Message {
            hash: rec::Hash256::from(bytes),
            source: Some("0:aa".into()),
            destination: Some("0:bb".into()),
            value: None,
            fwd_fee: None,
            ihr_fee: None,
            created_lt: None,
            created_at: None,
            opcode: None,
            ihr_disabled: None,
            bounce: None,
            bounced: None,
            import_fee: None,
            body_boc: vec![1, 2, 3],
            init_state: None,
            init_state_boc: None,
            body,
        }
    }

    /// Scenario 7 ("dead-duplicate batch"): the same message hash appears as
    /// inbound for two different transactions in the same batch. The
    /// `messages`/`message_contents` rows dedup to one; `transaction_messages`
    /// keeps both links.
    #[test]
    fn message_dedup_keeps_one_row_per_hash_but_both_links() {
        let shared = dummy_message(7);
        let tx_a = rec::Hash256::from([1u8; 32]);
        let tx_b = rec::Hash256::from([2u8; 32]);

        let mut seen_hashes = BTreeSet::new();
        let mut message_rows = Vec::new();
        let mut link_rows = Vec::new();
        for (tx, msg) in [(tx_a, &shared), (tx_b, &shared)] {
            if seen_hashes.insert(msg.hash) {
                message_rows.push(MessageRow::from(msg));
            }
            link_rows.push(TransactionMessageRow::new(&tx, &msg.hash, MessageDirection::In));
        }

        assert_eq!(message_rows.len(), 1);
        assert_eq!(link_rows.len(), 2);
        assert_ne!(link_rows[0].transaction_hash, link_rows[1].transaction_hash);
        assert_eq!(link_rows[0].message_hash, link_rows[1].message_hash);
    }

    #[test]
    fn u64_fields_in_descr_json_are_stringified() {
        let descr = rec::TransactionDescr::Storage {
            storage_ph: rec::TrStoragePhase {
                storage_fees_collected: u64::MAX,
                storage_fees_due: Some(1),
                status_change: rec::AccStatusChange::Unchanged,
            },
        };
        let json = descr_to_json(&descr);
        assert_eq!(
            json["storage_ph"]["storage_fees_collected"],
            serde_json::Value::String(u64::MAX.to_string())
        );
    }
}
