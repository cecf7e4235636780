use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use banksy_accounts::{Account, AccountHolder, Card, NewAccount, NewAccountHolder, NewCard, NewUser, User};
use banksy_core::{AccountId, ErrorLogId, TransferGroupId, UserId};
use banksy_ledger::{LedgerEntry, NewLedgerEntry, TransferPair};

/// Storage operation error.
///
/// Infrastructure failures only (connectivity, constraints, lock poisoning).
/// Domain-level "not found" is expressed through `Option`/empty results, not
/// through this enum; the caller decides what absence means.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the write (constraint violation, bad data).
    #[error("invalid write: {0}")]
    InvalidWrite(String),

    /// Transient backend failure; the unit of work was rolled back and the
    /// operation is safe to retry from the caller's side.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Account Directory: account records and ownership lookups.
///
/// The single source of truth for "who owns this account": ownership is
/// always fetched by id here, never traversed through some object graph.
#[async_trait::async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError>;

    /// Fetch an account regardless of owner (recipient resolution).
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Fetch an account only if `owner` owns it.
    ///
    /// Returns `None` both for nonexistent ids and for accounts owned by
    /// someone else, so callers cannot distinguish the two.
    async fn account_owned_by(&self, id: AccountId, owner: UserId) -> Result<Option<Account>, StoreError>;

    /// All accounts owned by a user, id ascending.
    async fn accounts_for_user(&self, owner: UserId) -> Result<Vec<Account>, StoreError>;
}

/// Ledger Store: append-only transactions with indexed lookups.
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist both legs of a transfer in one atomic unit of work.
    ///
    /// All-or-nothing: if either insert fails the store must leave no trace
    /// of the attempt, and a concurrent reader must never observe a single
    /// leg. Returns the stored (debit, credit) pair.
    async fn insert_transfer(&self, pair: TransferPair) -> Result<(LedgerEntry, LedgerEntry), StoreError>;

    /// Persist one unpaired entry (seed/dev path, not the Transfer Engine).
    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError>;

    /// Entries of a transfer group whose account is owned by `owner`,
    /// id ascending. Empty when the group is unknown or none of its legs
    /// belong to the user.
    async fn entries_for_transfer_owned(
        &self,
        group: TransferGroupId,
        owner: UserId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// All entries of one account, newest first.
    async fn entries_for_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Entries of one account with `created_at` in the inclusive range,
    /// ordered created_at ascending with id as tiebreak.
    async fn entries_in_range(
        &self,
        account: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// User records keyed by the identity provider's subject.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Find-or-create by subject; refreshes profile fields that arrived
    /// changed. A missing claim never clears a stored value.
    async fn upsert_by_subject(&self, new: NewUser) -> Result<User, StoreError>;

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// All users, id ascending (admin introspection).
    async fn all_users(&self) -> Result<Vec<User>, StoreError>;
}

/// Cards, reachable through the accounts a user owns.
#[async_trait::async_trait]
pub trait CardStore: Send + Sync {
    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError>;

    /// Cards of every account owned by `owner`.
    async fn cards_for_user(&self, owner: UserId) -> Result<Vec<Card>, StoreError>;
}

/// Account-holder links, reachable through the accounts a user owns.
#[async_trait::async_trait]
pub trait HolderStore: Send + Sync {
    async fn insert_holder(&self, new: NewAccountHolder) -> Result<AccountHolder, StoreError>;

    /// Holder links of every account owned by `owner`.
    async fn holders_for_user(&self, owner: UserId) -> Result<Vec<AccountHolder>, StoreError>;
}

/// Persisted error-log row (written by the api error-logging middleware).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLog {
    pub id: ErrorLogId,
    pub user_id: Option<UserId>,
    pub error_code: Option<i32>,
    pub message: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A to-be-persisted error-log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewErrorLog {
    pub user_id: Option<UserId>,
    pub error_code: Option<i32>,
    pub message: String,
    pub location: Option<String>,
}

#[async_trait::async_trait]
pub trait ErrorLogStore: Send + Sync {
    async fn insert_error(&self, new: NewErrorLog) -> Result<ErrorLog, StoreError>;

    /// Logged errors, newest first.
    async fn recent_errors(&self) -> Result<Vec<ErrorLog>, StoreError>;
}
