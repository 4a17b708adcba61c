use everscale_types::cell::Cell;
use num_bigint::BigUint;

use super::Hash256;

/// A message cell, identified by its own hash. `source` is absent iff the
/// message is external-in; `destination` is absent iff the message is
/// external-out.
#[derive(Debug, Clone)]
pub struct Message {
    pub hash: Hash256,

    pub source: Option<String>,
    pub destination: Option<String>,

    pub value: Option<BigUint>,
    pub fwd_fee: Option<BigUint>,
    pub ihr_fee: Option<BigUint>,
    pub created_lt: Option<u64>,
    pub created_at: Option<u32>,
    pub opcode: Option<i32>,
    pub ihr_disabled: Option<bool>,
    pub bounce: Option<bool>,
    pub bounced: Option<bool>,
    pub import_fee: Option<BigUint>,

    pub body: Cell,
    pub body_boc: Vec<u8>,

    pub init_state: Option<Cell>,
    pub init_state_boc: Option<Vec<u8>>,
}

impl Message {
    pub fn body_hash(&self) -> Hash256 {
        *self.body.repr_hash()
    }

    pub fn init_state_hash(&self) -> Option<Hash256> {
        self.init_state.as_ref().map(|c| *c.repr_hash())
    }

    pub fn is_external_in(&self) -> bool {
        self.source.is_none()
    }

    pub fn is_external_out(&self) -> bool {
        self.destination.is_none()
    }
}
