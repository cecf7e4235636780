//! Postgres-backed stores.
//!
//! One pool, runtime queries, manual row structs. The two-leg transfer
//! insert runs inside a single database transaction so readers either see
//! both entries or neither; everything else is a plain indexed read/write.
//!
//! SQLx errors map to `StoreError` as follows: constraint violations
//! (23505 unique, 23503 foreign key, 23514 check) become `InvalidWrite`,
//! everything else (connectivity, pool closed) becomes `Backend`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use banksy_accounts::{
    Account, AccountHolder, Card, CardStatus, CardType, CurrencyCode, NewAccount, NewAccountHolder,
    NewCard, NewUser, User,
};
use banksy_core::{
    AccountHolderId, AccountId, CardId, ErrorLogId, TransactionId, TransferGroupId, UserId,
};
use banksy_ledger::{EntryKind, LedgerEntry, NewLedgerEntry, TransferPair};

use super::traits::{
    AccountDirectory, CardStore, ErrorLog, ErrorLogStore, HolderStore, LedgerStore, NewErrorLog,
    StoreError, UserStore,
};

/// Postgres implementation of every store trait.
///
/// `Clone` is cheap (shared pool); the pool handles connection management
/// and is safe to share across tasks.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") => StoreError::InvalidWrite(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn corrupt_row(operation: &str, detail: impl core::fmt::Display) -> StoreError {
    StoreError::Backend(format!("corrupt row in {operation}: {detail}"))
}

// Row types

#[derive(Debug)]
struct UserRow {
    id: i64,
    subject: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            subject: row.try_get("subject")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            subject: banksy_accounts::AuthSubject::new(row.subject),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct AccountRow {
    id: i64,
    user_id: i64,
    name: String,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for AccountRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(AccountRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            currency: row.try_get("currency")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl AccountRow {
    fn into_account(self, operation: &str) -> Result<Account, StoreError> {
        let currency =
            CurrencyCode::parse(&self.currency).map_err(|e| corrupt_row(operation, e))?;
        Ok(Account {
            id: AccountId::new(self.id),
            user_id: UserId::new(self.user_id),
            name: self.name,
            currency,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug)]
struct EntryRow {
    id: i64,
    account_id: i64,
    amount: i64,
    kind: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    transfer_group_id: Option<Uuid>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for EntryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(EntryRow {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            amount: row.try_get("amount")?,
            kind: row.try_get("kind")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            transfer_group_id: row.try_get("transfer_group_id")?,
        })
    }
}

impl EntryRow {
    fn into_entry(self, operation: &str) -> Result<LedgerEntry, StoreError> {
        let kind = match self.kind.as_str() {
            "DEBIT" => EntryKind::Debit,
            "CREDIT" => EntryKind::Credit,
            other => return Err(corrupt_row(operation, format!("unknown entry kind {other:?}"))),
        };
        Ok(LedgerEntry {
            id: TransactionId::new(self.id),
            account_id: AccountId::new(self.account_id),
            amount: self.amount,
            kind,
            description: self.description,
            created_at: self.created_at,
            transfer_group_id: self.transfer_group_id.map(TransferGroupId::from_uuid),
        })
    }
}

#[derive(Debug)]
struct CardRow {
    id: i64,
    account_id: i64,
    card_number_last4: String,
    card_type: String,
    expiration_month: i32,
    expiration_year: i32,
    status: String,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for CardRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CardRow {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            card_number_last4: row.try_get("card_number_last4")?,
            card_type: row.try_get("card_type")?,
            expiration_month: row.try_get("expiration_month")?,
            expiration_year: row.try_get("expiration_year")?,
            status: row.try_get("status")?,
        })
    }
}

impl CardRow {
    fn into_card(self, operation: &str) -> Result<Card, StoreError> {
        let card_type = CardType::parse(&self.card_type).map_err(|e| corrupt_row(operation, e))?;
        let status = CardStatus::parse(&self.status).map_err(|e| corrupt_row(operation, e))?;
        let expiration_month = u8::try_from(self.expiration_month)
            .map_err(|_| corrupt_row(operation, "expiration_month out of range"))?;
        let expiration_year = u16::try_from(self.expiration_year)
            .map_err(|_| corrupt_row(operation, "expiration_year out of range"))?;
        Ok(Card {
            id: CardId::new(self.id),
            account_id: AccountId::new(self.account_id),
            card_number_last4: self.card_number_last4,
            card_type,
            expiration_month,
            expiration_year,
            status,
        })
    }
}

#[derive(Debug)]
struct HolderRow {
    id: i64,
    user_id: i64,
    account_id: i64,
    holder_type: String,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for HolderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(HolderRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            account_id: row.try_get("account_id")?,
            holder_type: row.try_get("holder_type")?,
        })
    }
}

impl From<HolderRow> for AccountHolder {
    fn from(row: HolderRow) -> Self {
        AccountHolder {
            id: AccountHolderId::new(row.id),
            user_id: UserId::new(row.user_id),
            account_id: AccountId::new(row.account_id),
            holder_type: row.holder_type,
        }
    }
}

#[derive(Debug)]
struct ErrorLogRow {
    id: i64,
    user_id: Option<i64>,
    error_code: Option<i32>,
    message: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ErrorLogRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ErrorLogRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            error_code: row.try_get("error_code")?,
            message: row.try_get("message")?,
            location: row.try_get("location")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<ErrorLogRow> for ErrorLog {
    fn from(row: ErrorLogRow) -> Self {
        ErrorLog {
            id: ErrorLogId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            error_code: row.error_code,
            message: row.message,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

const ENTRY_COLUMNS: &str =
    "id, account_id, amount, kind, description, created_at, transfer_group_id";

async fn insert_entry_in<'e, E>(
    executor: E,
    entry: &NewLedgerEntry,
    operation: &str,
) -> Result<LedgerEntry, StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        r#"
        INSERT INTO transactions (account_id, amount, kind, description, transfer_group_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, account_id, amount, kind, description, created_at, transfer_group_id
        "#,
    )
    .bind(entry.account_id.as_i64())
    .bind(entry.amount)
    .bind(entry.kind.as_str())
    .bind(&entry.description)
    .bind(entry.transfer_group_id.map(|g| *g.as_uuid()))
    .fetch_one(executor)
    .await
    .map_err(|e| map_sqlx_error(operation, e))?;

    let row = EntryRow::from_row(&row).map_err(|e| corrupt_row(operation, e))?;
    row.into_entry(operation)
}

#[async_trait::async_trait]
impl AccountDirectory for PostgresStore {
    #[instrument(skip(self, new), fields(user_id = %new.user_id), err)]
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (user_id, name, currency)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, currency, created_at, updated_at
            "#,
        )
        .bind(new.user_id.as_i64())
        .bind(&new.name)
        .bind(new.currency.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_account", e))?;

        AccountRow::from_row(&row)
            .map_err(|e| corrupt_row("create_account", e))?
            .into_account("create_account")
    }

    #[instrument(skip(self), err)]
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            "SELECT id, user_id, name, currency, created_at, updated_at FROM accounts WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("account", e))?;

        row.map(|r| {
            AccountRow::from_row(&r)
                .map_err(|e| corrupt_row("account", e))?
                .into_account("account")
        })
        .transpose()
    }

    #[instrument(skip(self), err)]
    async fn account_owned_by(
        &self,
        id: AccountId,
        owner: UserId,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, currency, created_at, updated_at
            FROM accounts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("account_owned_by", e))?;

        row.map(|r| {
            AccountRow::from_row(&r)
                .map_err(|e| corrupt_row("account_owned_by", e))?
                .into_account("account_owned_by")
        })
        .transpose()
    }

    #[instrument(skip(self), err)]
    async fn accounts_for_user(&self, owner: UserId) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, currency, created_at, updated_at
            FROM accounts
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("accounts_for_user", e))?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            accounts.push(
                AccountRow::from_row(&row)
                    .map_err(|e| corrupt_row("accounts_for_user", e))?
                    .into_account("accounts_for_user")?,
            );
        }
        Ok(accounts)
    }
}

#[async_trait::async_trait]
impl LedgerStore for PostgresStore {
    #[instrument(
        skip(self, pair),
        fields(
            group_id = %pair.group_id,
            sender = %pair.debit.account_id,
            recipient = %pair.credit.account_id,
            amount = pair.debit.amount,
        ),
        err
    )]
    async fn insert_transfer(
        &self,
        pair: TransferPair,
    ) -> Result<(LedgerEntry, LedgerEntry), StoreError> {
        // One database transaction wraps both legs: a failure on either
        // insert rolls the whole unit of work back, and no reader can see a
        // lone leg.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_transfer.begin", e))?;

        let debit = insert_entry_in(&mut *tx, &pair.debit, "insert_transfer.debit").await?;
        let credit = insert_entry_in(&mut *tx, &pair.credit, "insert_transfer.credit").await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_transfer.commit", e))?;

        Ok((debit, credit))
    }

    #[instrument(skip(self, entry), fields(account_id = %entry.account_id), err)]
    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        insert_entry_in(&*self.pool, &entry, "insert_entry").await
    }

    #[instrument(skip(self), err)]
    async fn entries_for_transfer_owned(
        &self,
        group: TransferGroupId,
        owner: UserId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.account_id, t.amount, t.kind, t.description, t.created_at, t.transfer_group_id
            FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            WHERE t.transfer_group_id = $1 AND a.user_id = $2
            ORDER BY t.id ASC
            "#,
        )
        .bind(group.as_uuid())
        .bind(owner.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_for_transfer_owned", e))?;

        collect_entries(rows, "entries_for_transfer_owned")
    }

    #[instrument(skip(self), err)]
    async fn entries_for_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM transactions WHERE account_id = $1 ORDER BY id DESC"
        ))
        .bind(account.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_for_account", e))?;

        collect_entries(rows, "entries_for_account")
    }

    #[instrument(skip(self), err)]
    async fn entries_in_range(
        &self,
        account: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM transactions
            WHERE account_id = $1 AND created_at >= $2 AND created_at <= $3
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(account.as_i64())
        .bind(from)
        .bind(to)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_in_range", e))?;

        collect_entries(rows, "entries_in_range")
    }
}

fn collect_entries(
    rows: Vec<sqlx::postgres::PgRow>,
    operation: &str,
) -> Result<Vec<LedgerEntry>, StoreError> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(
            EntryRow::from_row(&row)
                .map_err(|e| corrupt_row(operation, e))?
                .into_entry(operation)?,
        );
    }
    Ok(entries)
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self, new), fields(subject = %new.subject), err)]
    async fn upsert_by_subject(&self, new: NewUser) -> Result<User, StoreError> {
        // COALESCE keeps stored values when a claim is absent; updated_at is
        // refreshed on conflict, which is harmless when nothing changed.
        let row = sqlx::query(
            r#"
            INSERT INTO users (subject, email, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, users.email),
                first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                updated_at = now()
            RETURNING id, subject, email, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(new.subject.as_str())
        .bind(&new.profile.email)
        .bind(&new.profile.first_name)
        .bind(&new.profile.last_name)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_by_subject", e))?;

        let row = UserRow::from_row(&row).map_err(|e| corrupt_row("upsert_by_subject", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, subject, email, first_name, last_name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("user", e))?;

        row.map(|r| {
            UserRow::from_row(&r)
                .map(User::from)
                .map_err(|e| corrupt_row("user", e))
        })
        .transpose()
    }

    #[instrument(skip(self), err)]
    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, subject, email, first_name, last_name, created_at, updated_at FROM users ORDER BY id ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("all_users", e))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(
                UserRow::from_row(&row)
                    .map(User::from)
                    .map_err(|e| corrupt_row("all_users", e))?,
            );
        }
        Ok(users)
    }
}

#[async_trait::async_trait]
impl CardStore for PostgresStore {
    #[instrument(skip(self, new), fields(account_id = %new.account_id), err)]
    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO cards (account_id, card_number_last4, card_type, expiration_month, expiration_year, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, card_number_last4, card_type, expiration_month, expiration_year, status
            "#,
        )
        .bind(new.account_id.as_i64())
        .bind(&new.card_number_last4)
        .bind(new.card_type.as_str())
        .bind(new.expiration_month as i32)
        .bind(new.expiration_year as i32)
        .bind(new.status.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_card", e))?;

        CardRow::from_row(&row)
            .map_err(|e| corrupt_row("insert_card", e))?
            .into_card("insert_card")
    }

    #[instrument(skip(self), err)]
    async fn cards_for_user(&self, owner: UserId) -> Result<Vec<Card>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.account_id, c.card_number_last4, c.card_type,
                   c.expiration_month, c.expiration_year, c.status
            FROM cards c
            JOIN accounts a ON a.id = c.account_id
            WHERE a.user_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(owner.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("cards_for_user", e))?;

        let mut cards = Vec::with_capacity(rows.len());
        for row in rows {
            cards.push(
                CardRow::from_row(&row)
                    .map_err(|e| corrupt_row("cards_for_user", e))?
                    .into_card("cards_for_user")?,
            );
        }
        Ok(cards)
    }
}

#[async_trait::async_trait]
impl HolderStore for PostgresStore {
    #[instrument(skip(self, new), fields(account_id = %new.account_id), err)]
    async fn insert_holder(&self, new: NewAccountHolder) -> Result<AccountHolder, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO account_holders (user_id, account_id, holder_type)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, account_id, holder_type
            "#,
        )
        .bind(new.user_id.as_i64())
        .bind(new.account_id.as_i64())
        .bind(&new.holder_type)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_holder", e))?;

        let row = HolderRow::from_row(&row).map_err(|e| corrupt_row("insert_holder", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn holders_for_user(&self, owner: UserId) -> Result<Vec<AccountHolder>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT h.id, h.user_id, h.account_id, h.holder_type
            FROM account_holders h
            JOIN accounts a ON a.id = h.account_id
            WHERE a.user_id = $1
            ORDER BY h.id ASC
            "#,
        )
        .bind(owner.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("holders_for_user", e))?;

        let mut holders = Vec::with_capacity(rows.len());
        for row in rows {
            let row = HolderRow::from_row(&row).map_err(|e| corrupt_row("holders_for_user", e))?;
            holders.push(row.into());
        }
        Ok(holders)
    }
}

#[async_trait::async_trait]
impl ErrorLogStore for PostgresStore {
    #[instrument(skip(self, new), err)]
    async fn insert_error(&self, new: NewErrorLog) -> Result<ErrorLog, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO error_logs (user_id, error_code, message, location)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, error_code, message, location, created_at
            "#,
        )
        .bind(new.user_id.map(|u| u.as_i64()))
        .bind(new.error_code)
        .bind(&new.message)
        .bind(&new.location)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_error", e))?;

        let row = ErrorLogRow::from_row(&row).map_err(|e| corrupt_row("insert_error", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn recent_errors(&self) -> Result<Vec<ErrorLog>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, error_code, message, location, created_at
            FROM error_logs
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("recent_errors", e))?;

        let mut errors = Vec::with_capacity(rows.len());
        for row in rows {
            let row = ErrorLogRow::from_row(&row).map_err(|e| corrupt_row("recent_errors", e))?;
            errors.push(row.into());
        }
        Ok(errors)
    }
}
