//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate with `diesel print-schema` or update by
//! hand.

diesel::table! {
    /// Users mirrored from the identity service. Read-only here.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        avatar_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Live bearer sessions keyed by the hex SHA-256 of the token.
    sessions (token_hash) {
        #[max_length = 64]
        token_hash -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Prediction pools. `code` is unique (`pools_code_key`).
    pools (id) {
        id -> Uuid,
        title -> Varchar,
        #[max_length = 6]
        code -> Varchar,
        owner_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pool membership. `(pool_id, user_id)` is unique.
    participants (id) {
        id -> Uuid,
        pool_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(sessions -> users (user_id));
diesel::joinable!(pools -> users (owner_id));
diesel::joinable!(participants -> pools (pool_id));
diesel::joinable!(participants -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(participants, pools, sessions, users);
