//! Schema bootstrap for the Postgres store.
//!
//! Tables are created idempotently at startup. For anything beyond dev this
//! would move to real migrations; the DDL is kept here so the table shapes
//! live next to the queries that use them.

use sqlx::PgPool;

use super::traits::StoreError;

/// Tables owned by this backend, in dependency order.
pub const TABLES: &[&str] = &[
    "users",
    "accounts",
    "transactions",
    "cards",
    "account_holders",
    "error_logs",
];

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        subject     TEXT NOT NULL UNIQUE,
        email       TEXT,
        first_name  TEXT,
        last_name   TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id          BIGSERIAL PRIMARY KEY,
        user_id     BIGINT NOT NULL REFERENCES users(id),
        name        TEXT NOT NULL,
        currency    TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id)"#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id                 BIGSERIAL PRIMARY KEY,
        account_id         BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        amount             BIGINT NOT NULL CHECK (amount > 0),
        kind               TEXT NOT NULL CHECK (kind IN ('DEBIT', 'CREDIT')),
        description        TEXT,
        created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
        transfer_group_id  UUID
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(transfer_group_id)"#,
    r#"
    CREATE TABLE IF NOT EXISTS cards (
        id                 BIGSERIAL PRIMARY KEY,
        account_id         BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        card_number_last4  TEXT NOT NULL,
        card_type          TEXT NOT NULL,
        expiration_month   INT NOT NULL,
        expiration_year    INT NOT NULL,
        status             TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS account_holders (
        id           BIGSERIAL PRIMARY KEY,
        user_id      BIGINT NOT NULL REFERENCES users(id),
        account_id   BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        holder_type  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS error_logs (
        id          BIGSERIAL PRIMARY KEY,
        user_id     BIGINT,
        error_code  INT,
        message     TEXT NOT NULL,
        location    TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Create all tables and indexes if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for stmt in DDL {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Backend(format!("schema bootstrap failed: {e}")))?;
    }
    tracing::info!(tables = ?TABLES, "database schema ready");
    Ok(())
}
