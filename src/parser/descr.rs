//! `TransactionDescr` and its phase sub-records: the part of a transaction
//! cell that explains what the VM and the surrounding accounting actually
//! did, as opposed to `Transaction` itself, which is mostly addressing and
//! linkage.

use everscale_types::cell::CellSlice;

use super::cellio::{
    biguint_to_u64, load_bit, load_hash, load_int, load_reference, load_uint,
    read_currency_collection, read_var_uint_u64, slice_of,
};
use crate::error::ParseError;
use crate::schema::{
    AccStatusChange, ComputeSkipReason, SplitMergeInfo, StorageUsedShort, TrActionPhase,
    TrBouncePhase, TrComputePhase, TrComputePhaseVm, TrCreditPhase, TrStoragePhase,
    TransactionDescr, TransactionDescrMergeInstall, TransactionDescrMergePrepare,
    TransactionDescrOrd, TransactionDescrSplitInstall, TransactionDescrSplitPrepare,
    TransactionDescrTickTock,
};

pub fn parse_transaction_descr(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let b0 = load_bit(cs)?;
    if b0 {
        return Err(ParseError::descr("unknown transaction description tag"));
    }
    let b1 = load_bit(cs)?;
    if !b1 {
        let b2 = load_bit(cs)?;
        if b2 {
            return parse_tick_tock(cs);
        }
        let is_storage = load_bit(cs)?;
        if is_storage {
            parse_storage(cs)
        } else {
            parse_ord(cs)
        }
    } else {
        let b2 = load_bit(cs)?;
        let b3 = load_bit(cs)?;
        match (b2, b3) {
            (false, false) => parse_split_prepare(cs),
            (false, true) => parse_split_install(cs),
            (true, false) => parse_merge_prepare(cs),
            (true, true) => parse_merge_install(cs),
        }
    }
}

fn parse_ord(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let credit_first = load_bit(cs)?;
    let storage_ph = maybe(cs, parse_tr_storage_phase)?;
    let credit_ph = maybe(cs, parse_tr_credit_phase)?;
    let compute_ph = parse_tr_compute_phase(cs)?;
    let action = maybe_ref(cs, parse_tr_action_phase)?;
    let aborted = load_bit(cs)?;
    let bounce = maybe(cs, parse_tr_bounce_phase)?;
    let destroyed = load_bit(cs)?;
    Ok(TransactionDescr::Ord(TransactionDescrOrd {
        credit_first,
        storage_ph,
        credit_ph,
        compute_ph,
        action,
        aborted,
        bounce,
        destroyed,
    }))
}

fn parse_storage(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    Ok(TransactionDescr::Storage {
        storage_ph: parse_tr_storage_phase(cs)?,
    })
}

fn parse_tick_tock(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let is_tock = load_bit(cs)?;
    let storage_ph = parse_tr_storage_phase(cs)?;
    let compute_ph = parse_tr_compute_phase(cs)?;
    let action = maybe_ref(cs, parse_tr_action_phase)?;
    let aborted = load_bit(cs)?;
    let destroyed = load_bit(cs)?;
    Ok(TransactionDescr::TickTock(TransactionDescrTickTock {
        is_tock,
        storage_ph,
        compute_ph,
        action,
        aborted,
        destroyed,
    }))
}

fn parse_split_prepare(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let split_info = parse_split_merge_info(cs)?;
    let storage_ph = maybe(cs, parse_tr_storage_phase)?;
    let compute_ph = parse_tr_compute_phase(cs)?;
    let action = maybe_ref(cs, parse_tr_action_phase)?;
    let aborted = load_bit(cs)?;
    let destroyed = load_bit(cs)?;
    Ok(TransactionDescr::SplitPrepare(TransactionDescrSplitPrepare {
        split_info,
        storage_ph,
        compute_ph,
        action,
        aborted,
        destroyed,
    }))
}

fn parse_split_install(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let split_info = parse_split_merge_info(cs)?;
    let _prepare_transaction = load_reference(cs)?;
    let installed = load_bit(cs)?;
    Ok(TransactionDescr::SplitInstall(TransactionDescrSplitInstall {
        split_info,
        installed,
    }))
}

fn parse_merge_prepare(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let split_info = parse_split_merge_info(cs)?;
    let storage_ph = parse_tr_storage_phase(cs)?;
    let aborted = load_bit(cs)?;
    Ok(TransactionDescr::MergePrepare(TransactionDescrMergePrepare {
        split_info,
        storage_ph,
        aborted,
    }))
}

fn parse_merge_install(cs: &mut CellSlice) -> Result<TransactionDescr, ParseError> {
    let split_info = parse_split_merge_info(cs)?;
    let _prepare_transaction = load_reference(cs)?;
    let storage_ph = maybe(cs, parse_tr_storage_phase)?;
    let credit_ph = maybe(cs, parse_tr_credit_phase)?;
    let compute_ph = parse_tr_compute_phase(cs)?;
    let action = maybe_ref(cs, parse_tr_action_phase)?;
    let aborted = load_bit(cs)?;
    let destroyed = load_bit(cs)?;
    Ok(TransactionDescr::MergeInstall(TransactionDescrMergeInstall {
        split_info,
        storage_ph,
        credit_ph,
        compute_ph,
        action,
        aborted,
        destroyed,
    }))
}

pub fn parse_split_merge_info(cs: &mut CellSlice) -> Result<SplitMergeInfo, ParseError> {
    let cur_shard_pfx_len = load_uint(cs, 6)? as u8;
    let acc_split_depth = load_uint(cs, 6)? as u8;
    let this_addr = load_hash(cs)?;
    let sibling_addr = load_hash(cs)?;
    Ok(SplitMergeInfo {
        cur_shard_pfx_len,
        acc_split_depth,
        this_addr,
        sibling_addr,
    })
}

pub fn parse_tr_storage_phase(cs: &mut CellSlice) -> Result<TrStoragePhase, ParseError> {
    let storage_fees_collected = read_var_uint_u64(cs, 16)?;
    let storage_fees_due = maybe(cs, |cs| read_var_uint_u64(cs, 16))?;
    let status_change = parse_acc_status_change(cs)?;
    Ok(TrStoragePhase {
        storage_fees_collected,
        storage_fees_due,
        status_change,
    })
}

pub fn parse_acc_status_change(cs: &mut CellSlice) -> Result<AccStatusChange, ParseError> {
    if !load_bit(cs)? {
        return Ok(AccStatusChange::Unchanged);
    }
    if load_bit(cs)? {
        Ok(AccStatusChange::Deleted)
    } else {
        Ok(AccStatusChange::Frozen)
    }
}

pub fn parse_tr_credit_phase(cs: &mut CellSlice) -> Result<TrCreditPhase, ParseError> {
    let due_fees_collected = maybe(cs, |cs| read_var_uint_u64(cs, 16))?;
    let credit = biguint_to_u64(&read_currency_collection(cs)?)?;
    Ok(TrCreditPhase {
        due_fees_collected,
        credit,
    })
}

pub fn parse_tr_compute_phase(cs: &mut CellSlice) -> Result<TrComputePhase, ParseError> {
    if !load_bit(cs)? {
        let reason = parse_compute_skip_reason(cs)?;
        return Ok(TrComputePhase::Skipped { reason });
    }
    let success = load_bit(cs)?;
    let msg_state_used = load_bit(cs)?;
    let account_activated = load_bit(cs)?;
    let gas_fees = read_var_uint_u64(cs, 16)?;

    // `gas_used` onward lives in its own referenced cell (the `^[...]` group
    // in `tr_phase_compute_vm`), same shape as the `msgs_cell` dereference in
    // `parse_transaction`.
    let r1_cell = load_reference(cs)?;
    let mut r1 = slice_of(&r1_cell)?;
    let gas_used = read_var_uint_u64(&mut r1, 7)?;
    let gas_limit = read_var_uint_u64(&mut r1, 7)?;
    let gas_credit = maybe(&mut r1, |cs| read_var_uint_u64(cs, 3))?;
    let mode = load_int(&mut r1, 8)? as i8;
    let exit_code = load_int(&mut r1, 32)? as i32;
    let exit_arg = maybe(&mut r1, |cs| Ok(load_int(cs, 32)? as i32))?;
    let vm_steps = load_uint(&mut r1, 32)? as u32;
    let vm_init_state_hash = load_hash(&mut r1)?;
    let vm_final_state_hash = load_hash(&mut r1)?;
    Ok(TrComputePhase::Vm(TrComputePhaseVm {
        success,
        msg_state_used,
        account_activated,
        gas_fees,
        gas_used,
        gas_limit,
        gas_credit,
        mode,
        exit_code,
        exit_arg,
        vm_steps,
        vm_init_state_hash,
        vm_final_state_hash,
    }))
}

fn parse_compute_skip_reason(cs: &mut CellSlice) -> Result<ComputeSkipReason, ParseError> {
    let tag = load_uint(cs, 2)? as u8;
    ComputeSkipReason::from_tag(tag)
        .ok_or_else(|| ParseError::phase(format!("unknown compute skip reason tag {tag}")))
}

pub fn parse_storage_used_short(cs: &mut CellSlice) -> Result<StorageUsedShort, ParseError> {
    Ok(StorageUsedShort {
        cells: read_var_uint_u64(cs, 7)?,
        bits: read_var_uint_u64(cs, 7)?,
    })
}

pub fn parse_tr_action_phase(cs: &mut CellSlice) -> Result<TrActionPhase, ParseError> {
    let success = load_bit(cs)?;
    let valid = load_bit(cs)?;
    let no_funds = load_bit(cs)?;
    let status_change = parse_acc_status_change(cs)?;
    let total_fwd_fees = maybe(cs, |cs| read_var_uint_u64(cs, 16))?;
    let total_action_fees = maybe(cs, |cs| read_var_uint_u64(cs, 16))?;
    let result_code = load_int(cs, 32)? as i32;
    let result_arg = maybe(cs, |cs| Ok(load_int(cs, 32)? as i32))?;
    let tot_actions = load_uint(cs, 16)? as u16;
    let spec_actions = load_uint(cs, 16)? as u16;
    let skipped_actions = load_uint(cs, 16)? as u16;
    let msgs_created = load_uint(cs, 16)? as u16;
    let action_list_hash = load_hash(cs)?;
    let tot_msg_size = parse_storage_used_short(cs)?;
    Ok(TrActionPhase {
        success,
        valid,
        no_funds,
        status_change,
        total_fwd_fees,
        total_action_fees,
        result_code,
        result_arg,
        tot_actions,
        spec_actions,
        skipped_actions,
        msgs_created,
        action_list_hash,
        tot_msg_size,
    })
}

pub fn parse_tr_bounce_phase(cs: &mut CellSlice) -> Result<TrBouncePhase, ParseError> {
    if load_bit(cs)? {
        let msg_size = parse_storage_used_short(cs)?;
        let msg_fees = read_var_uint_u64(cs, 16)?;
        let fwd_fees = read_var_uint_u64(cs, 16)?;
        return Ok(TrBouncePhase::Ok {
            msg_size,
            msg_fees,
            fwd_fees,
        });
    }
    if load_bit(cs)? {
        let msg_size = parse_storage_used_short(cs)?;
        let req_fwd_fees = read_var_uint_u64(cs, 16)?;
        Ok(TrBouncePhase::Nofunds {
            msg_size,
            req_fwd_fees,
        })
    } else {
        Ok(TrBouncePhase::Negfunds)
    }
}

fn maybe<T>(
    cs: &mut CellSlice,
    f: impl FnOnce(&mut CellSlice) -> Result<T, ParseError>,
) -> Result<Option<T>, ParseError> {
    if load_bit(cs)? {
        Ok(Some(f(cs)?))
    } else {
        Ok(None)
    }
}

/// Like `maybe`, but for fields stored as `Maybe ^X`: the value, when
/// present, lives in its own referenced cell.
fn maybe_ref<T>(
    cs: &mut CellSlice,
    f: impl FnOnce(&mut CellSlice) -> Result<T, ParseError>,
) -> Result<Option<T>, ParseError> {
    if !load_bit(cs)? {
        return Ok(None);
    }
    let cell = load_reference(cs)?;
    let mut inner = slice_of(&cell)?;
    Ok(Some(f(&mut inner)?))
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;

    fn bits(b: &[bool]) -> CellSlice<'static> {
        let mut builder = CellBuilder::new();
        for &bit in b {
            builder.store_bit(bit).unwrap();
        }
        let cell = builder.build().unwrap();
        // leaked so the slice can outlive this helper; test-only.
        let cell: &'static everscale_types::cell::Cell = Box::leak(Box::new(cell));
        slice_of(cell).unwrap()
    }

    #[test]
    fn acc_status_change_unchanged_is_the_default_tag() {
        let mut cs = bits(&[false]);
        assert_eq!(parse_acc_status_change(&mut cs).unwrap(), AccStatusChange::Unchanged);
    }

    #[test]
    fn acc_status_change_frozen_and_deleted_tags() {
        let mut frozen = bits(&[true, false]);
        assert_eq!(parse_acc_status_change(&mut frozen).unwrap(), AccStatusChange::Frozen);

        let mut deleted = bits(&[true, true]);
        assert_eq!(parse_acc_status_change(&mut deleted).unwrap(), AccStatusChange::Deleted);
    }

    #[test]
    fn bounce_phase_negfunds_nofunds_ok_tags() {
        // tr_phase_bounce_negfunds$00
        let mut negfunds = bits(&[false, false]);
        assert!(matches!(parse_tr_bounce_phase(&mut negfunds).unwrap(), TrBouncePhase::Negfunds));

        // tr_phase_bounce_nofunds$01
        let mut nofunds_builder = CellBuilder::new();
        nofunds_builder.store_bit(false).unwrap();
        nofunds_builder.store_bit(true).unwrap();
        nofunds_builder.store_uint(3, 1).unwrap(); // StorageUsedShort.cells varuint len (n=7 -> 3-bit prefix)
        nofunds_builder.store_uint(8, 3).unwrap();
        nofunds_builder.store_uint(3, 1).unwrap(); // .bits
        nofunds_builder.store_uint(8, 5).unwrap();
        nofunds_builder.store_uint(4, 1).unwrap(); // req_fwd_fees varuint len
        nofunds_builder.store_uint(8, 9).unwrap();
        let cell = nofunds_builder.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        match parse_tr_bounce_phase(&mut cs).unwrap() {
            TrBouncePhase::Nofunds { msg_size, req_fwd_fees } => {
                assert_eq!(msg_size.cells, 3);
                assert_eq!(msg_size.bits, 5);
                assert_eq!(req_fwd_fees, 9);
            }
            other => panic!("expected Nofunds, got {other:?}"),
        }
    }

    #[test]
    fn compute_phase_skipped_carries_the_skip_reason() {
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // tr_phase_compute_skipped$0
        b.store_uint(2, 0).unwrap(); // cskip_no_state
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        match parse_tr_compute_phase(&mut cs).unwrap() {
            TrComputePhase::Skipped { reason } => assert_eq!(reason, ComputeSkipReason::NoState),
            other => panic!("expected Skipped, got {other:?}"),
        }
    }
}
