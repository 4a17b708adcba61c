//! `Message X` decoding: `CommonMsgInfo` (3-way tag), the optional
//! `StateInit`, and the `body` (inline or by reference).

use everscale_types::cell::CellSlice;

use super::address::{load_msg_address, skip_msg_address_ext};
use super::cellio::{
    encode_boc, load_bit, load_reference, load_uint, peek_opcode, read_currency_collection,
    read_var_uint, rest_to_cell, slice_of,
};
use crate::error::ParseError;
use crate::schema::Message;

pub fn parse_message(cs: &mut CellSlice, cell_hash: crate::schema::Hash256) -> Result<Message, ParseError> {
    let info = load_common_msg_info(cs)?;

    let init_state = if load_bit(cs)? {
        Some(if load_bit(cs)? {
            load_reference(cs)?
        } else {
            rest_to_cell(cs)?
        })
    } else {
        None
    };

    let body = if load_bit(cs)? {
        load_reference(cs)?
    } else {
        rest_to_cell(cs)?
    };

    let opcode = peek_opcode(&body)?;
    let body_boc = encode_boc(&body);
    let init_state_boc = init_state.as_ref().map(encode_boc);

    Ok(Message {
        hash: cell_hash,
        source: info.source,
        destination: info.destination,
        value: info.value,
        fwd_fee: info.fwd_fee,
        ihr_fee: info.ihr_fee,
        created_lt: info.created_lt,
        created_at: info.created_at,
        opcode,
        ihr_disabled: info.ihr_disabled,
        bounce: info.bounce,
        bounced: info.bounced,
        import_fee: info.import_fee,
        body,
        body_boc,
        init_state,
        init_state_boc,
    })
}

struct CommonMsgInfo {
    source: Option<String>,
    destination: Option<String>,
    value: Option<num_bigint::BigUint>,
    fwd_fee: Option<num_bigint::BigUint>,
    ihr_fee: Option<num_bigint::BigUint>,
    import_fee: Option<num_bigint::BigUint>,
    created_lt: Option<u64>,
    created_at: Option<u32>,
    ihr_disabled: Option<bool>,
    bounce: Option<bool>,
    bounced: Option<bool>,
}

fn load_common_msg_info(cs: &mut CellSlice) -> Result<CommonMsgInfo, ParseError> {
    if !load_bit(cs)? {
        // int_msg_info$0
        let ihr_disabled = load_bit(cs)?;
        let bounce = load_bit(cs)?;
        let bounced = load_bit(cs)?;
        let source = load_msg_address(cs)?;
        let destination = load_msg_address(cs)?;
        let value = read_currency_collection(cs)?;
        let ihr_fee = read_var_uint(cs, 16)?;
        let fwd_fee = read_var_uint(cs, 16)?;
        let created_lt = load_uint(cs, 64)?;
        let created_at = load_uint(cs, 32)? as u32;
        Ok(CommonMsgInfo {
            source,
            destination,
            value: Some(value),
            fwd_fee: Some(fwd_fee),
            ihr_fee: Some(ihr_fee),
            import_fee: None,
            created_lt: Some(created_lt),
            created_at: Some(created_at),
            ihr_disabled: Some(ihr_disabled),
            bounce: Some(bounce),
            bounced: Some(bounced),
        })
    } else if !load_bit(cs)? {
        // ext_in_msg_info$10 src:MsgAddressExt dest:MsgAddressInt
        // `src` is documented-absent (spec.md: "source absent"); its slot is
        // typed `MsgAddressExt`, so it's skipped rather than decoded.
        skip_msg_address_ext(cs)?;
        let destination = load_msg_address(cs)?;
        let import_fee = read_var_uint(cs, 16)?;
        Ok(CommonMsgInfo {
            source: None,
            destination,
            value: None,
            fwd_fee: None,
            ihr_fee: None,
            import_fee: Some(import_fee),
            created_lt: None,
            created_at: None,
            ihr_disabled: None,
            bounce: None,
            bounced: None,
        })
    } else {
        // ext_out_msg_info$11 src:MsgAddressInt dest:MsgAddressExt
        // `dest` is documented-absent (spec.md: "destination absent"); its
        // slot is typed `MsgAddressExt`, so it's skipped rather than decoded.
        let source = load_msg_address(cs)?;
        skip_msg_address_ext(cs)?;
        let created_lt = load_uint(cs, 64)?;
        let created_at = load_uint(cs, 32)? as u32;
        Ok(CommonMsgInfo {
            source,
            destination: None,
            value: None,
            fwd_fee: None,
            ihr_fee: None,
            import_fee: None,
            created_lt: Some(created_lt),
            created_at: Some(created_at),
            ihr_disabled: None,
            bounce: None,
            bounced: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;

    fn addr_std(b: &mut CellBuilder, workchain: u8, addr: [u8; 32]) {
        b.store_uint(2, 0b10).unwrap();
        b.store_bit(false).unwrap(); // no anycast
        b.store_uint(8, workchain as u64).unwrap();
        b.store_raw(&addr, 256).unwrap();
    }

    /// `VarUInteger(16)`: 4-bit byte-length prefix, then that many bytes.
    fn var_uint16(b: &mut CellBuilder, bytes: &[u8]) {
        b.store_uint(4, bytes.len() as u64).unwrap();
        if !bytes.is_empty() {
            b.store_raw(bytes, bytes.len() as u16 * 8).unwrap();
        }
    }

    /// Scenario 2 (spec.md §8): one inbound int_msg with
    /// value=1_000_000_000, bounce=true, bounced=false.
    #[test]
    fn internal_message_sets_source_destination_value_and_flags() {
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // int_msg_info$0
        b.store_bit(true).unwrap(); // ihr_disabled
        b.store_bit(true).unwrap(); // bounce
        b.store_bit(false).unwrap(); // bounced
        addr_std(&mut b, 0, [0xAA; 32]);
        addr_std(&mut b, 0, [0xBB; 32]);
        var_uint16(&mut b, &1_000_000_000u32.to_be_bytes());
        b.store_bit(false).unwrap(); // no extra currency
        var_uint16(&mut b, &[]); // ihr_fee
        var_uint16(&mut b, &[]); // fwd_fee
        b.store_uint(64, 12_345).unwrap(); // created_lt
        b.store_uint(32, 999).unwrap(); // created_at
        b.store_bit(false).unwrap(); // no init_state
        b.store_bit(false).unwrap(); // body inline
        b.store_uint(32, 0xABCD_0001).unwrap(); // opcode-sized body payload

        let cell = b.build().unwrap();
        let hash = *cell.repr_hash();
        let mut cs = slice_of(&cell).unwrap();
        let msg = parse_message(&mut cs, hash).unwrap();

        assert!(msg.source.is_some());
        assert!(msg.destination.is_some());
        assert_eq!(msg.value.unwrap(), num_bigint::BigUint::from(1_000_000_000u32));
        assert_eq!(msg.bounce, Some(true));
        assert_eq!(msg.bounced, Some(false));
        assert_eq!(msg.ihr_disabled, Some(true));
        assert_eq!(msg.opcode, Some(0xABCD_0001u32 as i32));
    }

    /// Scenario 3 (spec.md §8): ext_in_msg_info — destination only,
    /// import_fee=100; testable property 3 ("source absent, destination
    /// present").
    #[test]
    fn ext_in_message_has_no_source_and_carries_import_fee() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap();
        b.store_bit(false).unwrap(); // ext_in_msg_info$10
        b.store_uint(2, 0b00).unwrap(); // src:MsgAddressExt = addr_none$00
        addr_std(&mut b, 0, [0xCC; 32]); // dest
        var_uint16(&mut b, &[100]); // import_fee = 100
        b.store_bit(false).unwrap(); // no init_state
        b.store_bit(false).unwrap(); // body inline
        b.store_uint(8, 0).unwrap(); // < 32 bits: opcode stays absent

        let cell = b.build().unwrap();
        let hash = *cell.repr_hash();
        let mut cs = slice_of(&cell).unwrap();
        let msg = parse_message(&mut cs, hash).unwrap();

        assert!(msg.source.is_none());
        assert!(msg.destination.is_some());
        assert_eq!(msg.import_fee.unwrap(), num_bigint::BigUint::from(100u32));
        assert!(msg.opcode.is_none());
    }

    /// Scenario 3 (spec.md §8): ext_out_msg_info — source only; testable
    /// property 4 ("destination absent, source present").
    #[test]
    fn ext_out_message_has_no_destination() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap();
        b.store_bit(true).unwrap(); // ext_out_msg_info$11
        addr_std(&mut b, 0, [0xDD; 32]); // src
        b.store_uint(2, 0b00).unwrap(); // dest:MsgAddressExt = addr_none$00
        b.store_uint(64, 777).unwrap(); // created_lt
        b.store_uint(32, 888).unwrap(); // created_at
        b.store_bit(false).unwrap(); // no init_state
        b.store_bit(false).unwrap(); // body inline

        let cell = b.build().unwrap();
        let hash = *cell.repr_hash();
        let mut cs = slice_of(&cell).unwrap();
        let msg = parse_message(&mut cs, hash).unwrap();

        assert!(msg.source.is_some());
        assert!(msg.destination.is_none());
        assert_eq!(msg.created_lt, Some(777));
    }
}
