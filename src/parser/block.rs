//! Top-level `Block` and `ShardStateUnsplit` decoding.
//!
//! Block bodies and account-state snapshots are ingested as separate BOC
//! streams (matching how a lite client actually fetches them: one RPC for
//! a block, a different one for an account's current state), so this
//! module exposes two independent entry points rather than one that tries
//! to Merkle-diff a block's `state_update` into account rows. Decoding the
//! `MERKLE_UPDATE` proof format itself is out of scope; see `DESIGN.md`.

use everscale_types::boc::Boc;
use everscale_types::cell::Cell;
use sha2::{Digest, Sha256};

use super::account::parse_account_state;
use super::cellio::{
    load_bit, load_hash, load_int, load_reference, load_uint, read_currency_collection, slice_of,
};
use super::dict;
use super::transaction::parse_account_blocks;
use crate::error::ParseError;
use crate::schema::{hash_to_base64, AccountState, Block};

const BLOCK_TAG: u64 = 0x11ef55aa;
const BLOCK_INFO_TAG: u64 = 0x9bc7a987;
const BLOCK_EXTRA_TAG: u64 = 0x4a33f6fd;
const SHARD_STATE_TAG: u64 = 0x9023afe2;

/// The `(workchain, shard, seqno)` identity of the masterchain block anchoring
/// a bundle, threaded into `parse_block` for every block after the first.
pub type McIdentity = (i32, i64, i32);

/// Decodes one block. `mc_identity` is `None` only for the first block parsed
/// in a bundle (always the masterchain block); it then refers to itself.
/// Every later (shard) block in the bundle is passed that first block's
/// identity, copied verbatim rather than re-derived from its own
/// `master_ref` — see spec.md §4.1 "Ordering".
pub fn parse_block(block_boc: &[u8], mc_identity: Option<McIdentity>) -> Result<Block, ParseError> {
    let cell = Boc::decode(block_boc)?;
    let root_hash = hash_to_base64(cell.repr_hash());
    let file_hash = hash_to_base64(&sha256(block_boc));

    let mut cs = slice_of(&cell)?;
    let tag = load_uint(&mut cs, 32)?;
    if tag != BLOCK_TAG {
        return Err(ParseError::block(format!("unexpected block tag {tag:#010x}")));
    }
    let global_id = load_int(&mut cs, 32)? as i32;
    let info_cell = load_reference(&mut cs)?;
    let _value_flow = load_reference(&mut cs)?;
    let _state_update = load_reference(&mut cs)?;
    let extra_cell = load_reference(&mut cs)?;

    let info = parse_block_info(&info_cell)?;
    let extra = parse_block_extra(&extra_cell)?;

    let account_blocks_root = match &extra.account_blocks_cell {
        Some(cell) => {
            let mut ab_cs = slice_of(cell)?;
            dict::load_root(&mut ab_cs)?
        }
        None => None,
    };
    let transactions = parse_account_blocks(account_blocks_root.as_ref(), info.workchain)?;

    let (mc_workchain, mc_shard, mc_seqno) =
        mc_identity.unwrap_or((info.workchain, info.shard, info.seqno));

    Ok(Block {
        workchain: info.workchain,
        shard: info.shard,
        seqno: info.seqno,
        root_hash,
        file_hash,
        mc_block_workchain: Some(mc_workchain),
        mc_block_shard: Some(mc_shard),
        mc_block_seqno: Some(mc_seqno),
        global_id,
        version: info.version,
        after_merge: info.after_merge,
        before_split: info.before_split,
        after_split: info.after_split,
        want_split: info.want_split,
        key_block: info.key_block,
        vert_seqno_incr: info.vert_seqno_incr,
        flags: info.flags,
        gen_utime: info.gen_utime,
        start_lt: info.start_lt,
        end_lt: info.end_lt,
        validator_list_hash_short: info.gen_validator_list_hash_short,
        gen_catchain_seqno: info.gen_catchain_seqno,
        min_ref_mc_seqno: info.min_ref_mc_seqno,
        prev_key_block_seqno: info.prev_key_block_seqno,
        vert_seqno: info.vert_seqno,
        master_ref_seqno: info.mc_block_seqno,
        rand_seed: hash_to_base64(&extra.rand_seed),
        created_by: extra.created_by,
        transactions,
    })
}

/// Decodes a standalone `ShardStateUnsplit` BOC into its account snapshots,
/// keeping only the addresses in `touched` (spec.md §4.1 step 4 / §4.3 step
/// 1: "for the set of addresses touched in the block"). A shard state can
/// carry thousands of untouched accounts; the block whose bundle this state
/// belongs to only ever needs the ones its own transactions moved.
pub fn parse_account_states(
    shard_state_boc: &[u8],
    touched: &std::collections::HashSet<String>,
) -> Result<Vec<AccountState>, ParseError> {
    let cell = Boc::decode(shard_state_boc)?;
    let mut cs = slice_of(&cell)?;

    let tag = load_uint(&mut cs, 32)?;
    if tag != SHARD_STATE_TAG {
        return Err(ParseError::account(format!(
            "unexpected shard_state tag {tag:#010x}"
        )));
    }
    let _global_id = load_int(&mut cs, 32)?;

    let shard_tag = load_uint(&mut cs, 2)?;
    if shard_tag != 0 {
        return Err(ParseError::account("unexpected shard_ident tag"));
    }
    let _shard_pfx_bits = load_uint(&mut cs, 6)?;
    let _workchain = load_int(&mut cs, 32)?;
    let _shard_prefix = load_uint(&mut cs, 64)?;

    let _seq_no = load_uint(&mut cs, 32)?;
    let _vert_seq_no = load_uint(&mut cs, 32)?;
    let _gen_utime = load_uint(&mut cs, 32)?;
    let _gen_lt = load_uint(&mut cs, 64)?;
    let _min_ref_mc_seqno = load_uint(&mut cs, 32)?;
    let _out_msg_queue_info = load_reference(&mut cs)?;
    let _before_split = load_bit(&mut cs)?;
    let accounts_cell = load_reference(&mut cs)?;

    let mut accounts_cs = slice_of(&accounts_cell)?;
    let root = dict::load_root(&mut accounts_cs)?;

    let leaves = dict::collect_leaves(root.as_ref(), 256, &mut |mut leaf| {
        // DepthBalanceInfo extra: depth:(#<=30) balance:CurrencyCollection
        let _depth = load_uint(&mut leaf, 5)?;
        let _balance = read_currency_collection(&mut leaf)?;

        let account_cell = load_reference(&mut leaf)?;
        let _last_trans_hash = load_hash(&mut leaf)?;
        let last_trans_lt = load_uint(&mut leaf, 64)?;
        parse_account_state(&account_cell, last_trans_lt)
    })?;

    Ok(leaves
        .into_iter()
        .filter_map(|(_, state)| state)
        .filter(|state| touched.contains(&state.account))
        .collect())
}

struct BlockInfoDecoded {
    version: i32,
    after_merge: bool,
    before_split: bool,
    after_split: bool,
    want_split: bool,
    key_block: bool,
    vert_seqno_incr: bool,
    flags: i32,
    seqno: i32,
    workchain: i32,
    shard: i64,
    gen_utime: i32,
    start_lt: i64,
    end_lt: i64,
    gen_validator_list_hash_short: i32,
    gen_catchain_seqno: i32,
    min_ref_mc_seqno: i32,
    prev_key_block_seqno: i32,
    vert_seqno: i32,
    mc_block_seqno: Option<i32>,
}

fn parse_block_info(cell: &Cell) -> Result<BlockInfoDecoded, ParseError> {
    let mut cs = slice_of(cell)?;
    let tag = load_uint(&mut cs, 32)?;
    if tag != BLOCK_INFO_TAG {
        return Err(ParseError::block(format!("unexpected block_info tag {tag:#010x}")));
    }
    let version = load_uint(&mut cs, 32)? as i32;
    let not_master = load_bit(&mut cs)?;
    let after_merge = load_bit(&mut cs)?;
    let before_split = load_bit(&mut cs)?;
    let after_split = load_bit(&mut cs)?;
    let want_split = load_bit(&mut cs)?;
    let _want_merge = load_bit(&mut cs)?;
    let key_block = load_bit(&mut cs)?;
    let vert_seqno_incr = load_bit(&mut cs)?;
    let flags = load_uint(&mut cs, 8)? as i32;
    let seqno = load_uint(&mut cs, 32)? as i32;
    let vert_seqno = load_uint(&mut cs, 32)? as i32;

    let shard_tag = load_uint(&mut cs, 2)?;
    if shard_tag != 0 {
        return Err(ParseError::block("unexpected shard_ident tag"));
    }
    let _shard_pfx_bits = load_uint(&mut cs, 6)?;
    let workchain = load_int(&mut cs, 32)? as i32;
    let shard = load_uint(&mut cs, 64)? as i64;

    let gen_utime = load_uint(&mut cs, 32)? as i32;
    let start_lt = load_uint(&mut cs, 64)? as i64;
    let end_lt = load_uint(&mut cs, 64)? as i64;
    let gen_validator_list_hash_short = load_uint(&mut cs, 32)? as i32;
    let gen_catchain_seqno = load_uint(&mut cs, 32)? as i32;
    let min_ref_mc_seqno = load_uint(&mut cs, 32)? as i32;
    let prev_key_block_seqno = load_uint(&mut cs, 32)? as i32;

    if flags & 1 != 0 {
        let _gensw_tag = load_uint(&mut cs, 8)?;
        let _gensw_version = load_uint(&mut cs, 32)?;
        let _gensw_capabilities = load_uint(&mut cs, 64)?;
    }

    // `!info.not_master || tlb::unpack_cell(info.master_ref, mcref)`: for the
    // masterchain block itself (`not_master = false`) this short-circuits
    // true without touching `master_ref`, and `mcref` is a default-constructed
    // `ExtBlkRef::Record` — so `master_ref_seqno` is `0`, not absent.
    let mc_block_seqno = if not_master {
        let master_ref_cell = load_reference(&mut cs)?;
        let mut mref_cs = slice_of(&master_ref_cell)?;
        let _end_lt = load_uint(&mut mref_cs, 64)?;
        let seq_no = load_uint(&mut mref_cs, 32)? as i32;
        Some(seq_no)
    } else {
        Some(0)
    };

    let _prev_ref = load_reference(&mut cs)?;
    if vert_seqno_incr {
        let _prev_vert_ref = load_reference(&mut cs)?;
    }

    Ok(BlockInfoDecoded {
        version,
        after_merge,
        before_split,
        after_split,
        want_split,
        key_block,
        vert_seqno_incr,
        flags,
        seqno,
        workchain,
        shard,
        gen_utime,
        start_lt,
        end_lt,
        gen_validator_list_hash_short,
        gen_catchain_seqno,
        min_ref_mc_seqno,
        prev_key_block_seqno,
        vert_seqno,
        mc_block_seqno,
    })
}

struct BlockExtraDecoded {
    account_blocks_cell: Option<Cell>,
    rand_seed: crate::schema::Hash256,
    created_by: String,
}

fn parse_block_extra(cell: &Cell) -> Result<BlockExtraDecoded, ParseError> {
    let mut cs = slice_of(cell)?;
    let tag = load_uint(&mut cs, 32)?;
    if tag != BLOCK_EXTRA_TAG {
        return Err(ParseError::block(format!("unexpected block_extra tag {tag:#010x}")));
    }
    let _in_msg_descr = load_reference(&mut cs)?;
    let _out_msg_descr = load_reference(&mut cs)?;
    let account_blocks_cell = load_reference(&mut cs)?;
    let rand_seed = load_hash(&mut cs)?;
    let created_by_hash = load_hash(&mut cs)?;
    if load_bit(&mut cs)? {
        let _custom = load_reference(&mut cs)?;
    }

    Ok(BlockExtraDecoded {
        account_blocks_cell: Some(account_blocks_cell),
        rand_seed,
        created_by: hash_to_base64(&created_by_hash),
    })
}

fn sha256(bytes: &[u8]) -> crate::schema::Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&digest);
    crate::schema::Hash256::from(arr)
}
