//! Bulk multi-table insert for one drained batch of bundles.
//!
//! Mirrors `InsertBatchMcSeqnos`/`insert_{blocks,transactions,messsages,
//! account_states,jetton_transfers,...}` in `InsertManagerPostgres.cpp`:
//! one DB transaction, one parameterized bulk statement per table, every
//! statement ending in `ON CONFLICT DO NOTHING`.

use std::collections::HashSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::schema::{
    account_states, blocks, jetton_burns, jetton_transfers, message_contents, messages,
    nft_transfers, transaction_messages, transactions,
};
use crate::db::{
    AccountStateRow, BlockRow, JettonBurnRow, JettonTransferRow, MessageContentRow,
    MessageDirection, MessageRow, NftTransferRow, TransactionMessageRow, TransactionRow,
};
use crate::error::StoreError;
use crate::schema::hash_to_base64;

use super::Bundle;

/// Inserts every row contributed by `batch` in one transaction. Returns the
/// number of bundles committed (for the statistics counter) — always
/// `batch.len()` on success, since the whole batch commits or none of it
/// does.
pub fn insert_batch(conn: &mut PgConnection, batch: &[Bundle]) -> Result<usize, StoreError> {
    conn.transaction::<usize, StoreError, _>(|conn| {
        let mut block_rows = Vec::new();
        let mut tx_rows = Vec::new();
        let mut account_state_rows = Vec::new();
        let mut jetton_transfer_rows = Vec::new();
        let mut jetton_burn_rows = Vec::new();
        let mut nft_transfer_rows = Vec::new();

        let mut seen_message_hashes = HashSet::new();
        let mut message_rows = Vec::new();
        let mut content_rows = Vec::new();
        let mut link_rows = Vec::new();

        for bundle in batch {
            for block in &bundle.parsed.blocks {
                block_rows.push(BlockRow::from(block));

                for tx in &block.transactions {
                    tx_rows.push(TransactionRow::new(tx, block));

                    if let Some(in_msg) = &tx.in_msg {
                        push_message(
                            in_msg,
                            &tx.hash,
                            MessageDirection::In,
                            &mut seen_message_hashes,
                            &mut message_rows,
                            &mut content_rows,
                            &mut link_rows,
                        );
                    }
                    for out_msg in &tx.out_msgs {
                        push_message(
                            out_msg,
                            &tx.hash,
                            MessageDirection::Out,
                            &mut seen_message_hashes,
                            &mut message_rows,
                            &mut content_rows,
                            &mut link_rows,
                        );
                    }
                }
            }

            for state in &bundle.parsed.account_states {
                account_state_rows.push(AccountStateRow::from(state));
            }

            jetton_transfer_rows.extend(bundle.jetton_transfers.iter().map(JettonTransferRow::from));
            jetton_burn_rows.extend(bundle.jetton_burns.iter().map(JettonBurnRow::from));
            nft_transfer_rows.extend(bundle.nft_transfers.iter().map(NftTransferRow::from));
        }

        if !block_rows.is_empty() {
            diesel::insert_into(blocks::table)
                .values(&block_rows)
                .on_conflict((blocks::workchain, blocks::shard, blocks::seqno))
                .do_nothing()
                .execute(conn)?;
        }
        if !tx_rows.is_empty() {
            diesel::insert_into(transactions::table)
                .values(&tx_rows)
                .on_conflict(transactions::hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !message_rows.is_empty() {
            diesel::insert_into(messages::table)
                .values(&message_rows)
                .on_conflict(messages::hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !content_rows.is_empty() {
            diesel::insert_into(message_contents::table)
                .values(&content_rows)
                .on_conflict(message_contents::hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !link_rows.is_empty() {
            diesel::insert_into(transaction_messages::table)
                .values(&link_rows)
                .on_conflict((
                    transaction_messages::transaction_hash,
                    transaction_messages::message_hash,
                    transaction_messages::direction,
                ))
                .do_nothing()
                .execute(conn)?;
        }
        if !account_state_rows.is_empty() {
            diesel::insert_into(account_states::table)
                .values(&account_state_rows)
                .on_conflict(account_states::hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !jetton_transfer_rows.is_empty() {
            diesel::insert_into(jetton_transfers::table)
                .values(&jetton_transfer_rows)
                .on_conflict(jetton_transfers::transaction_hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !jetton_burn_rows.is_empty() {
            diesel::insert_into(jetton_burns::table)
                .values(&jetton_burn_rows)
                .on_conflict(jetton_burns::transaction_hash)
                .do_nothing()
                .execute(conn)?;
        }
        if !nft_transfer_rows.is_empty() {
            diesel::insert_into(nft_transfers::table)
                .values(&nft_transfer_rows)
                .on_conflict(nft_transfers::transaction_hash)
                .do_nothing()
                .execute(conn)?;
        }

        Ok(batch.len())
    })
}

/// Collects the body (and, when present, init-state) content row and the
/// transaction↔message link for one message, deduplicating the message and
/// its content rows by hash within the batch — a message can be outbound
/// for one transaction and inbound for another in the same batch.
fn push_message(
    msg: &crate::schema::Message,
    tx_hash: &crate::schema::Hash256,
    direction: MessageDirection,
    seen: &mut HashSet<String>,
    message_rows: &mut Vec<MessageRow>,
    content_rows: &mut Vec<MessageContentRow>,
    link_rows: &mut Vec<TransactionMessageRow>,
) {
    let msg_hash = hash_to_base64(&msg.hash);
    if seen.insert(msg_hash) {
        message_rows.push(MessageRow::from(msg));
        content_rows.extend(crate::db::message_content_rows(msg));
    }
    link_rows.push(TransactionMessageRow::new(tx_hash, &msg.hash, direction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AccountStatus, Message, Transaction, TransactionDescr, TrStoragePhase, AccStatusChange};

    fn dummy_cell() -> everscale_types::cell::Cell {
        everscale_types::cell::CellBuilder::new().build().unwrap()
    }

    fn dummy_message(seed: u8) -> Message {
        let mut bytes = [0u8; 32];
        bytes[0] = seed;
        Message {
            hash: crate::schema::Hash256::from(bytes),
            source: Some("0:aa".into()),
            destination: Some("0:bb".into()),
            value: None,
            fwd_fee: None,
            ihr_fee: None,
            created_lt: None,
            created_at: None,
            opcode: None,
            ihr_disabled: None,
            bounce: None,
            bounced: None,
            import_fee: None,
            body_boc: vec![9, 9],
            init_state: None,
            init_state_boc: None,
            body: dummy_cell(),
        }
    }

    fn dummy_transaction(hash_seed: u8, in_msg: Option<Message>) -> Transaction {
        let mut hash = [0u8; 32];
        hash[1] = hash_seed;
        Transaction {
            account: "0:cc".into(),
            hash: crate::schema::Hash256::from(hash),
            lt: 1,
            prev_trans_hash: crate::schema::Hash256::from([0u8; 32]),
            prev_trans_lt: 0,
            now: 100,
            orig_status: AccountStatus::Active,
            end_status: AccountStatus::Active,
            in_msg,
            out_msgs: vec![],
            total_fees: 0,
            account_state_hash_before: crate::schema::Hash256::from([0u8; 32]),
            account_state_hash_after: crate::schema::Hash256::from([0u8; 32]),
            description: TransactionDescr::Storage {
                storage_ph: TrStoragePhase {
                    storage_fees_collected: 0,
                    storage_fees_due: None,
                    status_change: AccStatusChange::Unchanged,
                },
            },
        }
    }

    /// Scenario 7: the same message hash inbound for two different
    /// transactions within one drained batch dedups to one `messages` row
    /// and one `message_contents` row, but keeps both links.
    #[test]
    fn dedup_matches_scenario_7() {
        let shared = dummy_message(42);
        let tx_a = dummy_transaction(1, Some(shared.clone()));
        let tx_b = dummy_transaction(2, Some(shared));

        let mut seen = HashSet::new();
        let mut message_rows = Vec::new();
        let mut content_rows = Vec::new();
        let mut link_rows = Vec::new();

        for tx in [&tx_a, &tx_b] {
            if let Some(in_msg) = &tx.in_msg {
                push_message(
                    in_msg,
                    &tx.hash,
                    MessageDirection::In,
                    &mut seen,
                    &mut message_rows,
                    &mut content_rows,
                    &mut link_rows,
                );
            }
        }

        assert_eq!(message_rows.len(), 1);
        assert_eq!(content_rows.len(), 1);
        assert_eq!(link_rows.len(), 2);
        assert!(link_rows.iter().all(|l| l.direction == "in"));
        assert_ne!(link_rows[0].transaction_hash, link_rows[1].transaction_hash);
    }
}
