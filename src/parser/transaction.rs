//! `Transaction` decoding and the `ShardAccountBlocks` / `AccountTransactions`
//! dictionary walk that enumerates every transaction in a block.

use everscale_types::cell::{Cell, CellSlice};

use super::cellio::{
    biguint_to_u64, load_bit, load_hash, load_reference, load_uint, read_currency_collection,
    slice_of,
};
use super::descr::parse_transaction_descr;
use super::dict;
use super::message::parse_message;
use crate::error::ParseError;
use crate::schema::{AccountStatus, Transaction};

const HASH_UPDATE_TAG: u64 = 0x72;
const TRANSACTION_TAG: u64 = 0b0111;

/// Decodes every transaction present in a block's `account_blocks`
/// dictionary (`HashmapAugE 256 AccountBlock CurrencyCollection`).
pub fn parse_account_blocks(
    account_blocks_root: Option<&Cell>,
    workchain: i32,
) -> Result<Vec<Transaction>, ParseError> {
    // `collect_leaves` walks the trie in ascending key order, so `blocks` is
    // already ordered by ascending account address, and `decode_account_block`
    // walks each account's own transactions dictionary in ascending lt order
    // (spec.md §4.1's "canonical dictionary order" — outer by account, inner
    // by lt). Appending preserves both without re-sorting.
    let blocks = dict::collect_leaves(account_blocks_root, 256, &mut |mut cs| {
        decode_account_block(&mut cs, workchain)
    })?;
    let mut out = Vec::new();
    for (_account_key, mut txs) in blocks {
        out.append(&mut txs);
    }
    Ok(out)
}

/// `AccountBlock`'s aug leaf: `extra:CurrencyCollection value:AccountBlock`.
fn decode_account_block(cs: &mut CellSlice, workchain: i32) -> Result<Vec<Transaction>, ParseError> {
    let _extra = read_currency_collection(cs)?;

    let tag = load_uint(cs, 4)?;
    if tag != 0b0101 {
        return Err(ParseError::transaction(format!(
            "unexpected account_block tag {tag:#06b}"
        )));
    }
    let _account_addr = load_hash(cs)?;

    let leaves = dict::walk_inline(cs, 64, &mut |mut leaf| decode_transactions_leaf(&mut leaf, workchain))?;
    let _state_update = load_reference(cs)?;

    Ok(leaves.into_iter().map(|(_, tx)| tx).collect())
}

/// `AccountTransactions`'s aug leaf: `extra:CurrencyCollection value:^Transaction`.
fn decode_transactions_leaf(cs: &mut CellSlice, workchain: i32) -> Result<Transaction, ParseError> {
    let _extra = read_currency_collection(cs)?;
    let tx_cell = load_reference(cs)?;
    parse_transaction(&tx_cell, workchain)
}

pub fn parse_transaction(cell: &Cell, workchain: i32) -> Result<Transaction, ParseError> {
    let mut cs = slice_of(cell)?;

    let tag = load_uint(&mut cs, 4)?;
    if tag != TRANSACTION_TAG {
        return Err(ParseError::transaction(format!(
            "unexpected transaction tag {tag:#06b}"
        )));
    }

    let account_addr = load_hash(&mut cs)?;
    let lt = load_uint(&mut cs, 64)?;
    let prev_trans_hash = load_hash(&mut cs)?;
    let prev_trans_lt = load_uint(&mut cs, 64)?;
    let now = load_uint(&mut cs, 32)? as u32;
    let outmsg_cnt = load_uint(&mut cs, 15)?;
    let orig_status = parse_account_status(&mut cs)?;
    let end_status = parse_account_status(&mut cs)?;

    let msgs_cell = load_reference(&mut cs)?;
    let mut msgs_cs = slice_of(&msgs_cell)?;

    let in_msg = if load_bit(&mut msgs_cs)? {
        let in_cell = load_reference(&mut msgs_cs)?;
        let hash = *in_cell.repr_hash();
        let mut in_cs = slice_of(&in_cell)?;
        Some(parse_message(&mut in_cs, hash)?)
    } else {
        None
    };

    let out_root = dict::load_root(&mut msgs_cs)?;
    let mut out_msgs = Vec::with_capacity(outmsg_cnt as usize);
    for i in 0..outmsg_cnt {
        let msg_cell = dict::lookup_exact(out_root.as_ref(), 15, i)?.ok_or_else(|| {
            ParseError::transaction(format!("out message {i} missing from out_msgs dictionary"))
        })?;
        let hash = *msg_cell.repr_hash();
        let mut out_cs = slice_of(&msg_cell)?;
        out_msgs.push(parse_message(&mut out_cs, hash)?);
    }

    let total_fees = biguint_to_u64(&read_currency_collection(&mut cs)?)?;

    let state_update_cell = load_reference(&mut cs)?;
    let mut su_cs = slice_of(&state_update_cell)?;
    let su_tag = load_uint(&mut su_cs, 8)?;
    if su_tag != HASH_UPDATE_TAG {
        return Err(ParseError::transaction(format!(
            "unexpected HASH_UPDATE tag {su_tag:#04x}"
        )));
    }
    let account_state_hash_before = load_hash(&mut su_cs)?;
    let account_state_hash_after = load_hash(&mut su_cs)?;

    let descr_cell = load_reference(&mut cs)?;
    let mut descr_cs = slice_of(&descr_cell)?;
    let description = parse_transaction_descr(&mut descr_cs)?;

    Ok(Transaction {
        account: format!("{workchain}:{}", hex::encode(account_addr.as_array())),
        hash: *cell.repr_hash(),
        lt,
        prev_trans_hash,
        prev_trans_lt,
        now,
        orig_status,
        end_status,
        in_msg,
        out_msgs,
        total_fees,
        account_state_hash_before,
        account_state_hash_after,
        description,
    })
}

fn parse_account_status(cs: &mut CellSlice) -> Result<AccountStatus, ParseError> {
    let tag = load_uint(cs, 2)? as u8;
    AccountStatus::from_tag(tag)
        .ok_or_else(|| ParseError::transaction(format!("unknown account status tag {tag}")))
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;
    use crate::schema::TransactionDescr;

    /// Builds the minimal valid `Transaction` cell: no `in_msg`, zero
    /// `out_msgs`, account already active on both sides, and an `Ord`
    /// description whose phases are all absent except a skipped compute
    /// phase (testable property 2: `len(t.out_msgs) == outmsg_cnt`).
    #[test]
    fn ordinary_transaction_with_no_messages_round_trips_its_fields() {
        let msgs_cell = {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap(); // no in_msg
            b.store_bit(false).unwrap(); // out_msgs: empty HashmapE
            b.build().unwrap()
        };
        let state_update_cell = {
            let mut b = CellBuilder::new();
            b.store_uint(8, 0x72).unwrap(); // HASH_UPDATE tag
            b.store_raw(&[0x11; 32], 256).unwrap();
            b.store_raw(&[0x22; 32], 256).unwrap();
            b.build().unwrap()
        };
        let descr_cell = {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap(); // b0
            b.store_bit(false).unwrap(); // b1
            b.store_bit(false).unwrap(); // b2: not tick_tock
            b.store_bit(false).unwrap(); // is_storage: ord
            b.store_bit(true).unwrap(); // credit_first
            b.store_bit(false).unwrap(); // storage_ph: None
            b.store_bit(false).unwrap(); // credit_ph: None
            b.store_bit(false).unwrap(); // compute_ph: skipped
            b.store_uint(2, 0).unwrap(); // cskip_no_state
            b.store_bit(false).unwrap(); // action: None
            b.store_bit(false).unwrap(); // aborted
            b.store_bit(false).unwrap(); // bounce: None
            b.store_bit(false).unwrap(); // destroyed
            b.build().unwrap()
        };

        let mut b = CellBuilder::new();
        b.store_uint(4, 0b0111).unwrap(); // transaction$0111
        b.store_raw(&[0xAB; 32], 256).unwrap(); // account_addr
        b.store_uint(64, 42).unwrap(); // lt
        b.store_raw(&[0x00; 32], 256).unwrap(); // prev_trans_hash
        b.store_uint(64, 41).unwrap(); // prev_trans_lt
        b.store_uint(32, 1_700_000_000).unwrap(); // now
        b.store_uint(15, 0).unwrap(); // outmsg_cnt
        b.store_uint(2, 2).unwrap(); // orig_status: active
        b.store_uint(2, 2).unwrap(); // end_status: active
        b.store_reference(msgs_cell).unwrap();
        b.store_uint(4, 0).unwrap(); // total_fees: grams varuint len 0
        b.store_bit(false).unwrap(); // total_fees: no extra currency
        b.store_reference(state_update_cell).unwrap();
        b.store_reference(descr_cell).unwrap();

        let cell = b.build().unwrap();
        let tx = parse_transaction(&cell, 0).unwrap();

        assert_eq!(tx.account, format!("0:{}", hex::encode([0xAB; 32])));
        assert_eq!(tx.lt, 42);
        assert_eq!(tx.prev_trans_lt, 41);
        assert!(tx.in_msg.is_none());
        assert!(tx.out_msgs.is_empty());
        assert_eq!(tx.orig_status, AccountStatus::Active);
        assert_eq!(tx.end_status, AccountStatus::Active);
        assert!(matches!(tx.description, TransactionDescr::Ord(_)));
    }
}
