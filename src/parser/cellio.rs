//! Thin wrappers around `everscale_types` cell/slice primitives used by the
//! decoders in this module. Keeping these in one place means a decoder only
//! ever talks about bits, references, and varuints — never about the
//! underlying cell library's exact method names.

use everscale_types::boc::Boc;
use everscale_types::cell::{Cell, CellBuilder, CellSlice};
use num_bigint::BigUint;

use crate::error::ParseError;
use crate::schema::Hash256;

pub fn load_bit(cs: &mut CellSlice) -> Result<bool, ParseError> {
    cs.load_bit().map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn load_uint(cs: &mut CellSlice, bits: u16) -> Result<u64, ParseError> {
    cs.load_uint(bits)
        .map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn load_int(cs: &mut CellSlice, bits: u16) -> Result<i64, ParseError> {
    let raw = load_uint(cs, bits)?;
    let shift = 64 - bits as u32;
    Ok(((raw << shift) as i64) >> shift)
}

pub fn load_reference(cs: &mut CellSlice) -> Result<Cell, ParseError> {
    cs.load_reference_cloned()
        .map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn load_reference_as_slice<'a>(cs: &mut CellSlice<'a>) -> Result<CellSlice<'a>, ParseError> {
    cs.load_reference_as_slice()
        .map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn slice_of(cell: &Cell) -> Result<CellSlice<'_>, ParseError> {
    CellSlice::new(cell.as_ref()).map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn bits_to_bytes(cs: &mut CellSlice, n_bits: u16) -> Result<Vec<u8>, ParseError> {
    let mut out = Vec::with_capacity(n_bits as usize / 8 + 1);
    let mut remaining = n_bits;
    while remaining >= 8 {
        out.push(load_uint(cs, 8)? as u8);
        remaining -= 8;
    }
    if remaining > 0 {
        out.push((load_uint(cs, remaining)? << (8 - remaining)) as u8);
    }
    Ok(out)
}

pub fn load_hash(cs: &mut CellSlice) -> Result<Hash256, ParseError> {
    let bytes = bits_to_bytes(cs, 256)?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(Hash256::from(arr))
}

/// `VarUInteger(n)`: a `ceil(log2(n))`-bit length prefix followed by that
/// many bytes, big-endian.
pub fn read_var_uint(cs: &mut CellSlice, n: u32) -> Result<BigUint, ParseError> {
    let prefix_bits = len_prefix_bits(n);
    let len = load_uint(cs, prefix_bits)? as u16;
    if len == 0 {
        return Ok(BigUint::from(0u32));
    }
    let bytes = bits_to_bytes(cs, len * 8)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

pub fn read_var_uint_u64(cs: &mut CellSlice, n: u32) -> Result<u64, ParseError> {
    biguint_to_u64(&read_var_uint(cs, n)?)
}

pub fn biguint_to_u64(v: &BigUint) -> Result<u64, ParseError> {
    let digits = v.to_bytes_be();
    if digits.len() > 8 {
        return Err(ParseError::Cell("integer overflowed u64".to_string()));
    }
    let mut arr = [0u8; 8];
    arr[8 - digits.len()..].copy_from_slice(&digits);
    Ok(u64::from_be_bytes(arr))
}

fn len_prefix_bits(n: u32) -> u16 {
    (32 - (n.saturating_sub(1)).leading_zeros()) as u16
}

/// `CurrencyCollection ::= grams:Grams other:ExtraCurrencyCollection`.
/// Only `grams` is surfaced; the extra-currency dictionary is skipped.
pub fn read_currency_collection(cs: &mut CellSlice) -> Result<BigUint, ParseError> {
    let grams = read_var_uint(cs, 16)?;
    let has_extra = load_bit(cs)?;
    if has_extra {
        let _ = load_reference(cs)?;
    }
    Ok(grams)
}

pub fn remaining_bits(cs: &CellSlice) -> u16 {
    cs.size_bits()
}

pub fn remaining_refs(cs: &CellSlice) -> u8 {
    cs.size_refs()
}

/// Rebuilds whatever bits and references are left in `cs` into a standalone
/// cell. Used when a `Message`'s `body`/`init` is stored inline (the
/// `Either` tag is unset) rather than behind its own reference.
pub fn rest_to_cell(cs: &mut CellSlice) -> Result<Cell, ParseError> {
    let bits = remaining_bits(cs);
    let refs = remaining_refs(cs);
    let bytes = bits_to_bytes(cs, bits)?;

    let mut builder = CellBuilder::new();
    builder
        .store_raw(&bytes, bits)
        .map_err(|e| ParseError::Cell(e.to_string()))?;
    for _ in 0..refs {
        let r = load_reference(cs)?;
        builder
            .store_reference(r)
            .map_err(|e| ParseError::Cell(e.to_string()))?;
    }
    builder.build().map_err(|e| ParseError::Cell(e.to_string()))
}

pub fn encode_boc(cell: &Cell) -> Vec<u8> {
    Boc::encode(cell.as_ref())
}

/// Peeks the leading 32-bit opcode of a message body, if present.
pub fn peek_opcode(cell: &Cell) -> Result<Option<i32>, ParseError> {
    let cs = slice_of(cell)?;
    if remaining_bits(&cs) < 32 {
        return Ok(None);
    }
    let mut cs = cs;
    Ok(Some(load_uint(&mut cs, 32)? as u32 as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_uint_decodes_length_prefixed_value() {
        // VarUInteger 16: a 4-bit byte-length prefix, here "1", then one byte.
        let mut b = CellBuilder::new();
        b.store_uint(4, 1).unwrap();
        b.store_uint(8, 100).unwrap();
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        assert_eq!(read_var_uint(&mut cs, 16).unwrap(), BigUint::from(100u32));
    }

    #[test]
    fn var_uint_zero_length_is_zero() {
        let mut b = CellBuilder::new();
        b.store_uint(4, 0).unwrap();
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        assert_eq!(read_var_uint(&mut cs, 16).unwrap(), BigUint::from(0u32));
    }

    #[test]
    fn currency_collection_without_extra_reads_grams_only() {
        let mut b = CellBuilder::new();
        b.store_uint(4, 2).unwrap(); // 2-byte length
        b.store_uint(16, 5_000).unwrap();
        b.store_bit(false).unwrap(); // no extra-currency dict
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        assert_eq!(read_currency_collection(&mut cs).unwrap(), BigUint::from(5_000u32));
    }

    #[test]
    fn currency_collection_skips_extra_dict_reference() {
        let extra = CellBuilder::new().build().unwrap();
        let mut b = CellBuilder::new();
        b.store_uint(4, 1).unwrap();
        b.store_uint(8, 7).unwrap();
        b.store_bit(true).unwrap(); // extra-currency dict present
        b.store_reference(extra).unwrap();
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        assert_eq!(read_currency_collection(&mut cs).unwrap(), BigUint::from(7u32));
        assert_eq!(remaining_refs(&cs), 0, "the extra-currency reference must be consumed");
    }

    #[test]
    fn load_int_sign_extends_negative_values() {
        let mut b = CellBuilder::new();
        b.store_uint(8, 0xFFu64).unwrap(); // -1 as an 8-bit two's complement value
        let cell = b.build().unwrap();
        let mut cs = slice_of(&cell).unwrap();
        assert_eq!(load_int(&mut cs, 8).unwrap(), -1);
    }

    #[test]
    fn biguint_to_u64_rejects_overflow() {
        let huge = BigUint::from(u64::MAX) + BigUint::from(1u32);
        assert!(biguint_to_u64(&huge).is_err());
    }
}
