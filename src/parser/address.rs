//! `MsgAddress` decoding: `addr_none`, `addr_std`, `addr_var`, `addr_extern`.
//!
//! Only `addr_none` and `addr_std` are produced by real traffic on TON-family
//! networks today; `addr_var`/`addr_extern` are decoded just far enough to
//! report a clear error rather than desyncing the bit cursor for whatever
//! follows.

use everscale_types::cell::CellSlice;

use super::cellio::{bits_to_bytes, load_bit, load_int, load_uint};
use crate::error::ParseError;

/// Returns `None` for `addr_none`, `Some(raw)` for `addr_std`/`addr_var`
/// where `raw` is `"{workchain}:{64 lowercase hex chars}"`.
pub fn load_msg_address(cs: &mut CellSlice) -> Result<Option<String>, ParseError> {
    let tag = load_uint(cs, 2)?;
    match tag {
        0b00 => Ok(None),
        0b01 => {
            let len = load_uint(cs, 9)?;
            let _ = bits_to_bytes(cs, len as u16)?;
            Err(ParseError::message("addr_extern is not a routable account"))
        }
        0b10 => {
            skip_anycast(cs)?;
            let workchain = load_int(cs, 8)? as i32;
            let bytes = bits_to_bytes(cs, 256)?;
            Ok(Some(format!("{workchain}:{}", hex::encode(bytes))))
        }
        0b11 => {
            skip_anycast(cs)?;
            let addr_len = load_uint(cs, 9)?;
            let workchain = load_int(cs, 32)? as i32;
            let bytes = bits_to_bytes(cs, addr_len as u16)?;
            Ok(Some(format!("{workchain}:{}", hex::encode(bytes))))
        }
        _ => unreachable!("2-bit tag"),
    }
}

/// Skips a `MsgAddressExt` (`addr_none$00` or `addr_extern$01 len:(## 9)
/// external_address:(bits len)`) without attempting to convert it to a raw
/// address. Used for the side of `CommonMsgInfo` that spec.md documents as
/// unconditionally absent (`ext_in_msg_info.src`, `ext_out_msg_info.dest`):
/// that slot is typed `MsgAddressExt`, not `MsgAddressInt`, so `addr_extern`
/// is a legitimate encoding there, not a shape violation — it must be
/// bit-consumed and discarded, not routed through `load_msg_address`
/// (which rejects `addr_extern` as an error, correctly, for the
/// `MsgAddressInt`-typed slots that function is actually used for).
pub fn skip_msg_address_ext(cs: &mut CellSlice) -> Result<(), ParseError> {
    let tag = load_uint(cs, 2)?;
    match tag {
        0b00 => Ok(()),
        0b01 => {
            let len = load_uint(cs, 9)?;
            let _ = bits_to_bytes(cs, len as u16)?;
            Ok(())
        }
        _ => Err(ParseError::message(format!("unexpected MsgAddressExt tag {tag:#04b}"))),
    }
}

fn skip_anycast(cs: &mut CellSlice) -> Result<(), ParseError> {
    if load_bit(cs)? {
        let depth = load_uint(cs, 5)?;
        let _ = bits_to_bytes(cs, depth as u16)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;

    #[test]
    fn addr_none_decodes_to_none() {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b00).unwrap();
        let cell = b.build().unwrap();
        let mut cs = CellSlice::new(cell.as_ref()).unwrap();
        assert_eq!(load_msg_address(&mut cs).unwrap(), None);
    }

    #[test]
    fn addr_std_decodes_workchain_and_address() {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b10).unwrap();
        b.store_bit(false).unwrap(); // no anycast
        b.store_uint(8, 0).unwrap(); // workchain 0
        let mut addr = [0u8; 32];
        addr[31] = 0x2a;
        b.store_raw(&addr, 256).unwrap();
        let cell = b.build().unwrap();
        let mut cs = CellSlice::new(cell.as_ref()).unwrap();
        let got = load_msg_address(&mut cs).unwrap().unwrap();
        assert_eq!(
            got,
            "0:000000000000000000000000000000000000000000000000000000000000002a"
        );
    }

    #[test]
    fn addr_std_decodes_negative_workchain() {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b10).unwrap();
        b.store_bit(false).unwrap();
        b.store_uint(8, 0xFF).unwrap(); // workchain -1 (masterchain)
        b.store_raw(&[0u8; 32], 256).unwrap();
        let cell = b.build().unwrap();
        let mut cs = CellSlice::new(cell.as_ref()).unwrap();
        let got = load_msg_address(&mut cs).unwrap().unwrap();
        assert!(got.starts_with("-1:"));
    }

    #[test]
    fn addr_extern_is_rejected() {
        let mut b = CellBuilder::new();
        b.store_uint(2, 0b01).unwrap();
        b.store_uint(9, 8).unwrap();
        b.store_raw(&[0xAB], 8).unwrap();
        let cell = b.build().unwrap();
        let mut cs = CellSlice::new(cell.as_ref()).unwrap();
        assert!(load_msg_address(&mut cs).is_err());
    }
}
