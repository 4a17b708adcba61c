//! Canonical schema records produced by the parser and consumed by the
//! store. These types own their primitive fields and cell references; they
//! are dropped once the enclosing batch commits or fails.

mod account;
mod block;
mod events;
mod message;
mod transaction;

pub use account::*;
pub use block::*;
pub use events::*;
pub use message::*;
pub use transaction::*;

use num_bigint::BigUint;

/// A 256-bit cell/account/message hash.
pub type Hash256 = everscale_types::cell::HashBytes;

pub fn hash_to_base64(hash: &Hash256) -> String {
    base64::encode(hash.as_array())
}

pub fn big_to_decimal_string(v: &BigUint) -> String {
    v.to_str_radix(10)
}
