//! `Hashmap`/`HashmapE`/`HashmapAugE` traversal.
//!
//! Upstream TL-B encodes dictionaries as binary patricia tries: each cell is
//! an "edge" carrying a `HmLabel` (a run of key bits shared by every entry
//! below it) followed by either a leaf value or two child references. We only
//! ever need two access patterns against these:
//!
//! - an exact lookup by a small fixed-width key (`OutMsgDescr`, keyed 0..n),
//! - an ascending walk of every entry (`ShardAccountBlocks`, keyed by
//!   256-bit account id; `AccountTransactions`, keyed by 64-bit lt).
//!
//! The walk collects entries into memory rather than exposing a cursor. A
//! block's own dictionaries are small enough that this costs nothing, and it
//! sidesteps re-implementing the original daemon's streaming cursor, which
//! earned its complexity by running over entire shard states rather than one
//! block at a time.

use everscale_types::cell::{Cell, CellSlice};

use super::cellio::{load_bit, load_reference, load_uint, slice_of};
use crate::error::ParseError;

fn bits_for_range(m: u16) -> u16 {
    if m == 0 {
        0
    } else {
        32 - (m as u32).leading_zeros() as u16
    }
}

fn read_label(cs: &mut CellSlice, m: u16) -> Result<Vec<bool>, ParseError> {
    if !load_bit(cs)? {
        let mut n = 0u16;
        while load_bit(cs)? {
            n += 1;
        }
        (0..n).map(|_| load_bit(cs)).collect()
    } else if !load_bit(cs)? {
        let len_bits = bits_for_range(m);
        let n = if len_bits == 0 {
            0
        } else {
            load_uint(cs, len_bits)? as u16
        };
        (0..n).map(|_| load_bit(cs)).collect()
    } else {
        let v = load_bit(cs)?;
        let len_bits = bits_for_range(m);
        let n = if len_bits == 0 {
            0
        } else {
            load_uint(cs, len_bits)? as u16
        };
        Ok(vec![v; n as usize])
    }
}

fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, &b) in bits.iter().enumerate() {
        if b {
            out[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    out
}

/// Reads the `HashmapE`/`HashmapAugE` top-level wrapper: an empty bit, or a
/// set bit followed by a reference to the root edge cell (and, for the
/// augmented form, a trailing aggregate value we have no use for).
pub fn load_root(cs: &mut CellSlice) -> Result<Option<Cell>, ParseError> {
    if load_bit(cs)? {
        Ok(Some(load_reference(cs)?))
    } else {
        Ok(None)
    }
}

/// Walks every entry of a dictionary rooted at `root` in ascending key
/// order, decoding each leaf with `decode_leaf`. For augmented dictionaries
/// `decode_leaf` is responsible for skipping the per-entry `extra:Y` field
/// before reading the real value.
pub fn collect_leaves<T>(
    root: Option<&Cell>,
    key_bits: u16,
    decode_leaf: &mut impl FnMut(CellSlice) -> Result<T, ParseError>,
) -> Result<Vec<(Vec<u8>, T)>, ParseError> {
    let Some(root) = root else {
        return Ok(Vec::new());
    };
    let mut cs = slice_of(root)?;
    walk_inline(&mut cs, key_bits, decode_leaf)
}

/// Like `collect_leaves`, but for a `Hashmap`/`HashmapAug` (no `E` suffix)
/// field that is known to be non-empty and whose root edge is encoded
/// inline in `cs` rather than behind a separate wrapper bit and reference —
/// e.g. `AccountBlock.transactions`.
pub fn walk_inline<T>(
    cs: &mut CellSlice,
    key_bits: u16,
    decode_leaf: &mut impl FnMut(CellSlice) -> Result<T, ParseError>,
) -> Result<Vec<(Vec<u8>, T)>, ParseError> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    walk_edge(cs, key_bits, &mut prefix, &mut out, &mut |_bits, cs| {
        decode_leaf(cs)
    })?;
    Ok(out
        .into_iter()
        .map(|(bits, v)| (pack_bits(&bits), v))
        .collect())
}

fn walk_edge<T>(
    cs: &mut CellSlice,
    m: u16,
    prefix: &mut Vec<bool>,
    out: &mut Vec<(Vec<bool>, T)>,
    decode_leaf: &mut impl FnMut(&[bool], CellSlice) -> Result<T, ParseError>,
) -> Result<(), ParseError> {
    let label = read_label(cs, m)?;
    let label_len = label.len() as u16;
    prefix.extend_from_slice(&label);

    if label_len == m {
        let value = decode_leaf(prefix, cs.clone())?;
        out.push((prefix.clone(), value));
    } else {
        let remaining = m - label_len;
        let left = load_reference(cs)?;
        let right = load_reference(cs)?;
        prefix.push(false);
        walk(&left, remaining - 1, prefix, out, decode_leaf)?;
        prefix.pop();
        prefix.push(true);
        walk(&right, remaining - 1, prefix, out, decode_leaf)?;
        prefix.pop();
    }

    prefix.truncate(prefix.len() - label_len as usize);
    Ok(())
}

fn walk<T>(
    cell: &Cell,
    m: u16,
    prefix: &mut Vec<bool>,
    out: &mut Vec<(Vec<bool>, T)>,
    decode_leaf: &mut impl FnMut(&[bool], CellSlice) -> Result<T, ParseError>,
) -> Result<(), ParseError> {
    let mut cs = slice_of(cell)?;
    walk_edge(&mut cs, m, prefix, out, decode_leaf)
}

/// Exact-key lookup, used for the fixed-width, non-augmented `OutMsgDescr`
/// dictionary where the caller already knows the index to fetch.
pub fn lookup_exact(root: Option<&Cell>, key_bits: u16, key: u64) -> Result<Option<Cell>, ParseError> {
    let Some(root) = root else {
        return Ok(None);
    };
    let mut cell = root.clone();
    let mut remaining = key_bits;
    let mut pos = 0u16;
    loop {
        let mut cs = slice_of(&cell)?;
        let label = read_label(&mut cs, remaining)?;
        for (i, &b) in label.iter().enumerate() {
            let shift = key_bits - pos - i as u16 - 1;
            let key_bit = ((key >> shift) & 1) == 1;
            if key_bit != b {
                return Ok(None);
            }
        }
        pos += label.len() as u16;
        remaining -= label.len() as u16;
        if remaining == 0 {
            return Ok(Some(load_reference(&mut cs)?));
        }
        let shift = key_bits - pos - 1;
        let next_bit = ((key >> shift) & 1) == 1;
        let left = load_reference(&mut cs)?;
        let right = load_reference(&mut cs)?;
        cell = if next_bit { right } else { left };
        remaining -= 1;
        pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use everscale_types::cell::CellBuilder;

    use super::*;

    /// A single-key `Hashmap 4 X`: one `hml_short` edge whose label covers
    /// the whole 4-bit key space, followed by a reference to the value cell
    /// (the shape `lookup_exact`'s callers use, e.g. `OutMsgDescr`).
    fn single_leaf_dict(key: u8, key_bits: u16, payload: u8) -> Cell {
        let value = {
            let mut b = CellBuilder::new();
            b.store_uint(8, payload as u64).unwrap();
            b.build().unwrap()
        };
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // hml_short tag
        for _ in 0..key_bits {
            b.store_bit(true).unwrap(); // unary length = key_bits
        }
        b.store_bit(false).unwrap(); // unary terminator
        for i in 0..key_bits {
            let bit = (key >> (key_bits - 1 - i)) & 1 == 1;
            b.store_bit(bit).unwrap();
        }
        b.store_reference(value).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn lookup_exact_finds_matching_key() {
        let root = single_leaf_dict(0b0101, 4, 0xAA);
        let found = lookup_exact(Some(&root), 4, 5).unwrap().unwrap();
        let mut cs = slice_of(&found).unwrap();
        assert_eq!(load_uint(&mut cs, 8).unwrap(), 0xAA);
    }

    #[test]
    fn lookup_exact_misses_different_key() {
        let root = single_leaf_dict(0b0101, 4, 0xAA);
        assert!(lookup_exact(Some(&root), 4, 6).unwrap().is_none());
    }

    #[test]
    fn lookup_exact_on_empty_dict_is_none() {
        assert!(lookup_exact(None, 4, 0).unwrap().is_none());
    }

    #[test]
    fn collect_leaves_on_empty_root_is_empty() {
        let out = collect_leaves(None, 8, &mut |_cs| Ok(())).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn collect_leaves_walks_two_key_trie_in_ascending_order() {
        // key_bits = 2, leaves at key 0b00 and key 0b11: the root forks
        // immediately (empty label), each child carries the one remaining
        // label bit plus a one-byte inline payload (no reference indirection,
        // matching how `ShardAccountBlocks`/`AccountTransactions` leaves work).
        let left = {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap(); // hml_short tag
            b.store_bit(true).unwrap(); // unary length = 1
            b.store_bit(false).unwrap(); // unary terminator
            b.store_bit(false).unwrap(); // label bit: 0
            b.store_uint(8, 0xAA).unwrap();
            b.build().unwrap()
        };
        let right = {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap();
            b.store_bit(true).unwrap();
            b.store_bit(false).unwrap();
            b.store_bit(true).unwrap(); // label bit: 1
            b.store_uint(8, 0xBB).unwrap();
            b.build().unwrap()
        };
        let root = {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap(); // hml_short tag
            b.store_bit(false).unwrap(); // unary length = 0 (empty label)
            b.store_reference(left).unwrap();
            b.store_reference(right).unwrap();
            b.build().unwrap()
        };

        let out = collect_leaves(Some(&root), 2, &mut |mut cs| load_uint(&mut cs, 8)).unwrap();
        let keys: Vec<Vec<u8>> = out.iter().map(|(k, _)| k.clone()).collect();
        let values: Vec<u64> = out.iter().map(|(_, v)| *v).collect();
        assert_eq!(keys, vec![vec![0b00000000], vec![0b11000000]]);
        assert_eq!(values, vec![0xAA, 0xBB], "ascending key order must put 0b00 before 0b11");
    }
}
