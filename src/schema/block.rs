use super::{Hash256, Transaction};

/// One masterchain or shard block, identified by `(workchain, shard, seqno)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
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

    pub transactions: Vec<Transaction>,
}

impl Block {
    /// True if this is the masterchain anchor of its own bundle (its
    /// masterchain back-reference points at itself).
    pub fn is_masterchain_anchor(&self) -> bool {
        self.mc_block_workchain == Some(self.workchain)
            && self.mc_block_shard == Some(self.shard)
            && self.mc_block_seqno == Some(self.seqno)
    }
}

pub fn hash_is_valid_base64_32(s: &str) -> bool {
    s.len() == 44
        && base64::decode(s)
            .map(|bytes| bytes.len() == 32)
            .unwrap_or(false)
}

pub type BlockHash = Hash256;
