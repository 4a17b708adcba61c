//! Diesel table definitions mirroring the records in `crate::schema`.
//!
//! These are hand-written rather than generated by `diesel print-schema`
//! since this crate's migrations are the source of truth and are checked in
//! alongside this file (see `migrations/`). Column names and primary keys
//! follow the table surface in spec §6 verbatim.

diesel::table! {
    blocks (workchain, shard, seqno) {
        workchain -> Integer,
        shard -> BigInt,
        seqno -> Integer,
        root_hash -> Text,
        file_hash -> Text,
        mc_block_workchain -> Nullable<Integer>,
        mc_block_shard -> Nullable<BigInt>,
        mc_block_seqno -> Nullable<Integer>,
        global_id -> Integer,
        version -> Integer,
        after_merge -> Bool,
        before_split -> Bool,
        after_split -> Bool,
        want_split -> Bool,
        key_block -> Bool,
        vert_seqno_incr -> Bool,
        flags -> Integer,
        gen_utime -> Integer,
        start_lt -> BigInt,
        end_lt -> BigInt,
        validator_list_hash_short -> Integer,
        gen_catchain_seqno -> Integer,
        min_ref_mc_seqno -> Integer,
        prev_key_block_seqno -> Integer,
        vert_seqno -> Integer,
        master_ref_seqno -> Nullable<Integer>,
        rand_seed -> Text,
        created_by -> Text,
    }
}

diesel::table! {
    transactions (hash) {
        block_workchain -> Integer,
        block_shard -> BigInt,
        block_seqno -> Integer,
        account -> Text,
        hash -> Text,
        lt -> BigInt,
        now -> Integer,
        orig_status -> Text,
        end_status -> Text,
        total_fees -> BigInt,
        account_state_hash_before -> Text,
        account_state_hash_after -> Text,
        description -> Jsonb,
    }
}

diesel::table! {
    messages (hash) {
        hash -> Text,
        source -> Nullable<Text>,
        destination -> Nullable<Text>,
        value -> Nullable<Numeric>,
        fwd_fee -> Nullable<Numeric>,
        ihr_fee -> Nullable<Numeric>,
        created_lt -> Nullable<BigInt>,
        created_at -> Nullable<Integer>,
        opcode -> Nullable<Integer>,
        ihr_disabled -> Nullable<Bool>,
        bounce -> Nullable<Bool>,
        bounced -> Nullable<Bool>,
        import_fee -> Nullable<Numeric>,
        body_hash -> Text,
        init_state_hash -> Nullable<Text>,
    }
}

diesel::table! {
    message_contents (hash) {
        hash -> Text,
        body -> Bytea,
    }
}

diesel::table! {
    transaction_messages (transaction_hash, message_hash, direction) {
        transaction_hash -> Text,
        message_hash -> Text,
        direction -> Text,
    }
}

diesel::table! {
    account_states (hash) {
        hash -> Text,
        account -> Text,
        balance -> Numeric,
        account_status -> Text,
        frozen_hash -> Nullable<Text>,
        code_hash -> Nullable<Text>,
        data_hash -> Nullable<Text>,
    }
}

diesel::table! {
    jetton_wallets (address) {
        balance -> Numeric,
        address -> Text,
        owner -> Text,
        jetton -> Text,
        last_transaction_lt -> BigInt,
        code_hash -> Text,
        data_hash -> Text,
    }
}

diesel::table! {
    jetton_masters (address) {
        address -> Text,
        total_supply -> Numeric,
        mintable -> Bool,
        admin_address -> Nullable<Text>,
        jetton_content -> Nullable<Jsonb>,
        jetton_wallet_code_hash -> Text,
        data_hash -> Text,
        code_hash -> Text,
        last_transaction_lt -> BigInt,
        code_boc -> Bytea,
        data_boc -> Bytea,
    }
}

diesel::table! {
    nft_collections (address) {
        address -> Text,
        next_item_index -> Numeric,
        owner_address -> Nullable<Text>,
        collection_content -> Nullable<Jsonb>,
        data_hash -> Text,
        code_hash -> Text,
        last_transaction_lt -> BigInt,
        code_boc -> Bytea,
        data_boc -> Bytea,
    }
}

diesel::table! {
    nft_items (address) {
        address -> Text,
        init -> Bool,
        index -> Numeric,
        collection_address -> Nullable<Text>,
        owner_address -> Text,
        content -> Nullable<Jsonb>,
        last_transaction_lt -> BigInt,
        code_hash -> Text,
        data_hash -> Text,
    }
}

diesel::table! {
    jetton_transfers (transaction_hash) {
        transaction_hash -> Text,
        query_id -> BigInt,
        amount -> Nullable<Numeric>,
        destination -> Text,
        response_destination -> Text,
        custom_payload -> Nullable<Bytea>,
        forward_ton_amount -> Nullable<Numeric>,
        forward_payload -> Nullable<Bytea>,
    }
}

diesel::table! {
    jetton_burns (transaction_hash) {
        transaction_hash -> Text,
        query_id -> BigInt,
        amount -> Nullable<Numeric>,
        response_destination -> Text,
        custom_payload -> Nullable<Bytea>,
    }
}

diesel::table! {
    nft_transfers (transaction_hash) {
        transaction_hash -> Text,
        query_id -> BigInt,
        nft_item -> Text,
        old_owner -> Text,
        new_owner -> Text,
        response_destination -> Text,
        custom_payload -> Nullable<Bytea>,
        forward_amount -> Nullable<Numeric>,
        forward_payload -> Nullable<Bytea>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    blocks,
    transactions,
    messages,
    message_contents,
    transaction_messages,
    account_states,
    jetton_wallets,
    jetton_masters,
    nft_collections,
    nft_items,
    jetton_transfers,
    jetton_burns,
    nft_transfers,
);
