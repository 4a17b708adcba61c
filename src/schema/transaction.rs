use super::{Hash256, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Uninit,
    Frozen,
    Active,
    Nonexist,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Uninit => "uninit",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Active => "active",
            AccountStatus::Nonexist => "nonexist",
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AccountStatus::Uninit),
            1 => Some(AccountStatus::Frozen),
            2 => Some(AccountStatus::Active),
            3 => Some(AccountStatus::Nonexist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccStatusChange {
    Unchanged,
    Frozen,
    Deleted,
}

impl AccStatusChange {
    pub fn as_str(self) -> &'static str {
        match self {
            AccStatusChange::Unchanged => "unchanged",
            AccStatusChange::Frozen => "frozen",
            AccStatusChange::Deleted => "deleted",
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AccStatusChange::Unchanged),
            2 => Some(AccStatusChange::Frozen),
            3 => Some(AccStatusChange::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeSkipReason {
    NoState,
    BadState,
    NoGas,
}

impl ComputeSkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ComputeSkipReason::NoState => "no_state",
            ComputeSkipReason::BadState => "bad_state",
            ComputeSkipReason::NoGas => "no_gas",
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ComputeSkipReason::NoState),
            1 => Some(ComputeSkipReason::BadState),
            2 => Some(ComputeSkipReason::NoGas),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrStoragePhase {
    pub storage_fees_collected: u64,
    pub storage_fees_due: Option<u64>,
    pub status_change: AccStatusChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrCreditPhase {
    pub due_fees_collected: Option<u64>,
    pub credit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrComputePhaseVm {
    pub success: bool,
    pub msg_state_used: bool,
    pub account_activated: bool,
    pub gas_fees: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub gas_credit: Option<u64>,
    pub mode: i8,
    pub exit_code: i32,
    pub exit_arg: Option<i32>,
    pub vm_steps: u32,
    pub vm_init_state_hash: Hash256,
    pub vm_final_state_hash: Hash256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrComputePhase {
    Skipped { reason: ComputeSkipReason },
    Vm(TrComputePhaseVm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsedShort {
    pub cells: u64,
    pub bits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrActionPhase {
    pub success: bool,
    pub valid: bool,
    pub no_funds: bool,
    pub status_change: AccStatusChange,
    pub total_fwd_fees: Option<u64>,
    pub total_action_fees: Option<u64>,
    pub result_code: i32,
    pub result_arg: Option<i32>,
    pub tot_actions: u16,
    pub spec_actions: u16,
    pub skipped_actions: u16,
    pub msgs_created: u16,
    pub action_list_hash: Hash256,
    pub tot_msg_size: StorageUsedShort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrBouncePhase {
    Negfunds,
    Nofunds {
        msg_size: StorageUsedShort,
        req_fwd_fees: u64,
    },
    Ok {
        msg_size: StorageUsedShort,
        msg_fees: u64,
        fwd_fees: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMergeInfo {
    pub cur_shard_pfx_len: u8,
    pub acc_split_depth: u8,
    pub this_addr: Hash256,
    pub sibling_addr: Hash256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescrOrd {
    pub credit_first: bool,
    pub storage_ph: Option<TrStoragePhase>,
    pub credit_ph: Option<TrCreditPhase>,
    pub compute_ph: TrComputePhase,
    pub action: Option<TrActionPhase>,
    pub aborted: bool,
    pub bounce: Option<TrBouncePhase>,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescrTickTock {
    pub is_tock: bool,
    pub storage_ph: TrStoragePhase,
    pub compute_ph: TrComputePhase,
    pub action: Option<TrActionPhase>,
    pub aborted: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescrSplitPrepare {
    pub split_info: SplitMergeInfo,
    pub storage_ph: Option<TrStoragePhase>,
    pub compute_ph: TrComputePhase,
    pub action: Option<TrActionPhase>,
    pub aborted: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionDescrSplitInstall {
    pub split_info: SplitMergeInfo,
    pub installed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescrMergePrepare {
    pub split_info: SplitMergeInfo,
    pub storage_ph: TrStoragePhase,
    pub aborted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescrMergeInstall {
    pub split_info: SplitMergeInfo,
    pub storage_ph: Option<TrStoragePhase>,
    pub credit_ph: Option<TrCreditPhase>,
    pub compute_ph: TrComputePhase,
    pub action: Option<TrActionPhase>,
    pub aborted: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionDescr {
    Ord(TransactionDescrOrd),
    Storage { storage_ph: TrStoragePhase },
    TickTock(TransactionDescrTickTock),
    SplitPrepare(TransactionDescrSplitPrepare),
    SplitInstall(TransactionDescrSplitInstall),
    MergePrepare(TransactionDescrMergePrepare),
    MergeInstall(TransactionDescrMergeInstall),
}

/// One transaction, identified by `(block triple, account, hash, lt)`.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub account: String,
    pub hash: Hash256,
    pub lt: u64,
    pub prev_trans_hash: Hash256,
    pub prev_trans_lt: u64,
    pub now: u32,

    pub orig_status: AccountStatus,
    pub end_status: AccountStatus,

    pub in_msg: Option<Message>,
    pub out_msgs: Vec<Message>,

    pub total_fees: u64,

    pub account_state_hash_before: Hash256,
    pub account_state_hash_after: Hash256,

    pub description: TransactionDescr,
}
