//! TL-B decoding: turns raw block and account-state BOCs into the schema
//! records the store persists.

mod account;
mod address;
mod block;
mod cellio;
mod descr;
mod dict;
mod message;
mod transaction;

pub use block::{parse_account_states, parse_block, McIdentity};

use crate::error::ParseError;
use crate::schema::{AccountState, Block};

/// One masterchain block together with every shard block it references and
/// the account-state snapshots touched along the way. This is the unit the
/// store commits atomically.
#[derive(Debug, Clone, Default)]
pub struct ParsedBundle {
    pub blocks: Vec<Block>,
    pub account_states: Vec<AccountState>,
}

/// Decodes a bundle of `(block_data, block_state)` pairs — masterchain
/// block first, its referenced shard blocks after, each paired with the
/// post-state shard state BOC for the same block (spec.md §4.1 "Contract").
///
/// One failed cell aborts the whole bundle: a bundle is committed as a
/// single unit downstream, so a partially-decoded block would otherwise
/// leave the store holding transactions whose enclosing block row never
/// landed.
///
/// Blocks are parsed in order, not independently: the first block's
/// `(workchain, shard, seqno)` becomes every later block's masterchain
/// back-reference, and the first block refers to itself (spec.md §4.1).
/// Account-state snapshots are decoded only for the addresses each block's
/// own transactions touched (spec.md §4.1 step 4, §4.3 step 1).
pub fn parse_bundle(pairs: &[(Vec<u8>, Vec<u8>)]) -> Result<ParsedBundle, ParseError> {
    let mut blocks = Vec::with_capacity(pairs.len());
    let mut account_states = Vec::new();
    let mut mc_identity: Option<McIdentity> = None;

    for (block_boc, block_state_boc) in pairs {
        let block = parse_block(block_boc, mc_identity)?;
        if mc_identity.is_none() {
            mc_identity = Some((block.workchain, block.shard, block.seqno));
        }

        let touched: std::collections::HashSet<String> =
            block.transactions.iter().map(|tx| tx.account.clone()).collect();
        account_states.extend(parse_account_states(block_state_boc, &touched)?);

        blocks.push(block);
    }

    Ok(ParsedBundle {
        blocks,
        account_states,
    })
}
