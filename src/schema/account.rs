use everscale_types::cell::Cell;
use num_bigint::BigUint;

use super::Hash256;

/// Resolved post-state snapshot for one account touched by a block.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub hash: Hash256,
    pub account: String,
    pub balance: BigUint,
    pub account_status: AccountStateStatus,
    pub frozen_hash: Option<String>,
    pub code: Option<Cell>,
    pub code_hash: Option<String>,
    pub data: Option<Cell>,
    pub data_hash: Option<String>,
    pub last_trans_lt: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStateStatus {
    Uninit,
    Frozen,
    Active,
}

impl AccountStateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStateStatus::Uninit => "uninit",
            AccountStateStatus::Frozen => "frozen",
            AccountStateStatus::Active => "active",
        }
    }
}
