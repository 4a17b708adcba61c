//! `ShardAccount`/`Account`/`AccountState` decoding.
//!
//! Each block carries a dictionary of post-transaction account snapshots
//! (`ShardAccounts`, augmented by `DepthBalanceInfo`, which we don't surface).
//! Every entry we extract here becomes one row upserted by the store,
//! keeping only the latest snapshot per address.

use everscale_types::cell::Cell;

use super::address::load_msg_address;
use super::cellio::{
    load_bit, load_hash, load_reference, load_uint, read_currency_collection, read_var_uint_u64,
    slice_of,
};
use crate::error::ParseError;
use crate::schema::{hash_to_base64, AccountState, AccountStateStatus};

/// `account_cell` is the `^Account` referenced by a `ShardAccount` entry;
/// `last_trans_lt` is read from the enclosing `ShardAccount`, not from
/// inside `Account` itself.
///
/// Returns `None` for `account_none$0` (spec.md §4.3 step 3: "anything else
/// -> skip" applies to the already-destroyed placeholder some shard states
/// retain for a dictionary key) rather than a placeholder row — there is no
/// address to key it by, so a row here would have no stable identity.
pub fn parse_account_state(account_cell: &Cell, last_trans_lt: u64) -> Result<Option<AccountState>, ParseError> {
    let hash = *account_cell.repr_hash();
    let mut cs = slice_of(account_cell)?;

    if !load_bit(&mut cs)? {
        // account_none$0
        return Ok(None);
    }

    let account = load_msg_address(&mut cs)?
        .ok_or_else(|| ParseError::account("active account cell missing address"))?;

    skip_storage_info(&mut cs)?;
    let _account_storage_last_trans_lt = load_uint(&mut cs, 64)?;
    let balance = read_currency_collection(&mut cs)?;

    let (account_status, frozen_hash, code, data) = parse_account_state_body(&mut cs)?;
    let code_hash = code.as_ref().map(|c| hash_to_base64(c.repr_hash()));
    let data_hash = data.as_ref().map(|c| hash_to_base64(c.repr_hash()));

    Ok(Some(AccountState {
        hash,
        account,
        balance,
        account_status,
        frozen_hash,
        code,
        code_hash,
        data,
        data_hash,
        last_trans_lt,
    }))
}

/// `StorageInfo ::= used:StorageUsed last_paid:uint32 due_payment:(Maybe Grams)`,
/// `StorageUsed ::= cells:(VarUInteger 7) bits:(VarUInteger 7) public_cells:(VarUInteger 7)`.
fn skip_storage_info(cs: &mut everscale_types::cell::CellSlice) -> Result<(), ParseError> {
    let _cells = read_var_uint_u64(cs, 7)?;
    let _bits = read_var_uint_u64(cs, 7)?;
    let _public_cells = read_var_uint_u64(cs, 7)?;
    let _last_paid = load_uint(cs, 32)?;
    if load_bit(cs)? {
        let _due_payment = read_var_uint_u64(cs, 16)?;
    }
    Ok(())
}

type AccountStateBody = (AccountStateStatus, Option<String>, Option<Cell>, Option<Cell>);

fn parse_account_state_body(cs: &mut everscale_types::cell::CellSlice) -> Result<AccountStateBody, ParseError> {
    if !load_bit(cs)? {
        if load_bit(cs)? {
            // account_frozen$01
            let state_hash = load_hash(cs)?;
            return Ok((
                AccountStateStatus::Frozen,
                Some(hash_to_base64(&state_hash)),
                None,
                None,
            ));
        }
        // account_uninit$00
        return Ok((AccountStateStatus::Uninit, None, None, None));
    }

    // account_active$1 _:StateInit
    if load_bit(cs)? {
        // split_depth present
        let _split_depth = load_uint(cs, 5)?;
    }
    if load_bit(cs)? {
        // special (TickTock) present
        let _tick = load_bit(cs)?;
        let _tock = load_bit(cs)?;
    }
    let code = if load_bit(cs)? {
        Some(load_reference(cs)?)
    } else {
        None
    };
    let data = if load_bit(cs)? {
        Some(load_reference(cs)?)
    } else {
        None
    };
    if load_bit(cs)? {
        let _library = load_reference(cs)?;
    }
    Ok((AccountStateStatus::Active, None, code, data))
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;

    #[test]
    fn account_none_yields_no_row() {
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // account_none$0
        let cell = b.build().unwrap();
        assert!(parse_account_state(&cell, 0).unwrap().is_none());
    }

    fn storage_info(b: &mut CellBuilder) {
        b.store_uint(3, 0).unwrap(); // used.cells varuint(7) len=0
        b.store_uint(3, 0).unwrap(); // used.bits varuint(7) len=0
        b.store_uint(3, 0).unwrap(); // used.public_cells varuint(7) len=0
        b.store_uint(32, 0).unwrap(); // last_paid
        b.store_bit(false).unwrap(); // no due_payment
    }

    #[test]
    fn account_uninit_has_no_code_or_data() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap(); // account present
        b.store_uint(2, 0b10).unwrap(); // addr_std
        b.store_bit(false).unwrap(); // no anycast
        b.store_uint(8, 0).unwrap(); // workchain 0
        b.store_raw(&[0x01; 32], 256).unwrap();
        storage_info(&mut b);
        b.store_uint(64, 0).unwrap(); // account_storage.last_trans_lt
        b.store_uint(4, 0).unwrap(); // balance.grams varuint len=0
        b.store_bit(false).unwrap(); // no extra currency
        b.store_bit(false).unwrap(); // account_uninit$00 (first of the two tag bits)
        b.store_bit(false).unwrap();

        let cell = b.build().unwrap();
        let state = parse_account_state(&cell, 7).unwrap().unwrap();
        assert_eq!(state.account, format!("0:{}", hex::encode([0x01; 32])));
        assert!(state.code.is_none());
        assert!(state.data.is_none());
        assert_eq!(state.last_trans_lt, 7);
    }
}
