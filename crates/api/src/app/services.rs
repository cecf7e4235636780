//! Store wiring and the operations behind the HTTP handlers.
//!
//! `AppServices` owns one trait object per storage concern; both backends
//! (in-memory and Postgres) implement all of them, so wiring is a matter of
//! cloning one `Arc`. The transfer and statement orchestration lives here so
//! handlers stay thin: parse, call, map.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::instrument;

use banksy_accounts::{
    Account, AccountHolder, AuthSubject, Card, CardStatus, CardType, CurrencyCode, NewAccount,
    NewAccountHolder, NewCard, NewUser, User, UserProfile,
};
use banksy_auth::AuthClaims;
use banksy_core::{AccountId, DomainError, TransferGroupId, UserId};
use banksy_infra::{
    ensure_schema, AccountDirectory, CardStore, ErrorLog, ErrorLogStore, HolderStore,
    InMemoryStore, LedgerStore, NewErrorLog, PostgresStore, StoreError, UserStore, TABLES,
};
use banksy_ledger::{AccountStatement, LedgerEntry, TransferPair, statement_bounds};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidAmount(String),

    #[error("Sender account not found")]
    SenderNotFound,

    #[error("Recipient account not found")]
    RecipientNotFound,

    #[error("Transfer not found")]
    TransferNotFound,

    #[error("No accounts found for user")]
    NoAccountsFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<dyn AccountDirectory>,
    pub ledger: Arc<dyn LedgerStore>,
    pub users: Arc<dyn UserStore>,
    pub cards: Arc<dyn CardStore>,
    pub holders: Arc<dyn HolderStore>,
    pub errors: Arc<dyn ErrorLogStore>,
    backend: &'static str,
}

impl AppServices {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            accounts: store.clone(),
            ledger: store.clone(),
            users: store.clone(),
            cards: store.clone(),
            holders: store.clone(),
            errors: store,
            backend: "in-memory",
        }
    }

    pub async fn postgres(url: &str) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        ensure_schema(&pool).await?;

        let store = Arc::new(PostgresStore::new(pool));
        Ok(Self {
            accounts: store.clone(),
            ledger: store.clone(),
            users: store.clone(),
            cards: store.clone(),
            holders: store.clone(),
            errors: store,
            backend: "postgres",
        })
    }

    /// Storage backend label and table names (admin introspection).
    pub fn backend_info(&self) -> (&'static str, &'static [&'static str]) {
        (self.backend, TABLES)
    }

    /// Map verified claims to a user record (upsert-on-first-seen).
    pub async fn resolve_user(&self, claims: &AuthClaims) -> Result<User, ServiceError> {
        let new = NewUser {
            subject: AuthSubject::new(claims.sub.clone()),
            profile: UserProfile {
                email: claims.email.clone(),
                first_name: claims.first_name.clone(),
                last_name: claims.last_name.clone(),
            },
        };
        Ok(self.users.upsert_by_subject(new).await?)
    }

    // ── Accounts ────────────────────────────────────────────────────────

    pub async fn create_account(
        &self,
        owner: UserId,
        name: &str,
        currency: &str,
    ) -> Result<Account, ServiceError> {
        let currency = CurrencyCode::parse(currency)?;
        let new = NewAccount::new(owner, name, currency)?;
        Ok(self.accounts.create_account(new).await?)
    }

    pub async fn list_accounts(&self, owner: UserId) -> Result<Vec<Account>, ServiceError> {
        Ok(self.accounts.accounts_for_user(owner).await?)
    }

    /// Fetch an account only if `owner` owns it; nonexistent and other-owned
    /// both come back `AccountNotFound`.
    pub async fn owned_account(
        &self,
        id: AccountId,
        owner: UserId,
    ) -> Result<Account, ServiceError> {
        self.accounts
            .account_owned_by(id, owner)
            .await?
            .ok_or(ServiceError::AccountNotFound)
    }

    // ── Transfers ───────────────────────────────────────────────────────

    /// Execute a money transfer: validate, then commit both legs atomically.
    ///
    /// Validation order is fixed: amount, sender ownership, recipient
    /// existence. Nothing is written until all three pass.
    #[instrument(skip(self, description), fields(user = %user, sender = %sender, recipient = %recipient))]
    pub async fn execute_transfer(
        &self,
        user: UserId,
        sender: AccountId,
        recipient: AccountId,
        amount: i64,
        description: Option<String>,
    ) -> Result<TransferGroupId, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::InvalidAmount(format!(
                "transfer amount must be a positive integer, got {amount}"
            )));
        }

        self.accounts
            .account_owned_by(sender, user)
            .await?
            .ok_or(ServiceError::SenderNotFound)?;

        // Recipient may belong to anyone; it just has to exist.
        self.accounts
            .account(recipient)
            .await?
            .ok_or(ServiceError::RecipientNotFound)?;

        let pair = TransferPair::build(sender, recipient, amount, description)
            .map_err(|e| ServiceError::InvalidAmount(e.to_string()))?;
        let group = pair.group_id;

        self.ledger.insert_transfer(pair).await?;
        tracing::info!(group = %group, amount, "transfer committed");
        Ok(group)
    }

    /// Entries of a transfer group visible to `user`, id ascending.
    pub async fn transfer_entries(
        &self,
        user: UserId,
        group: TransferGroupId,
    ) -> Result<Vec<LedgerEntry>, ServiceError> {
        let entries = self.ledger.entries_for_transfer_owned(group, user).await?;
        if entries.is_empty() {
            // Covers never-existed and not-owned alike.
            return Err(ServiceError::TransferNotFound);
        }
        Ok(entries)
    }

    /// Transactions of one owned account, newest first.
    pub async fn account_transactions(
        &self,
        user: UserId,
        account: AccountId,
    ) -> Result<Vec<LedgerEntry>, ServiceError> {
        self.accounts
            .account_owned_by(account, user)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        Ok(self.ledger.entries_for_account(account).await?)
    }

    // ── Statements ──────────────────────────────────────────────────────

    /// One statement per owned account over the inclusive date range, even
    /// for accounts with no in-range entries.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn generate_statements(
        &self,
        user: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AccountStatement>, ServiceError> {
        let accounts = self.accounts.accounts_for_user(user).await?;
        if accounts.is_empty() {
            return Err(ServiceError::NoAccountsFound);
        }

        let (lo, hi) = statement_bounds(start, end);

        let mut statements = Vec::with_capacity(accounts.len());
        for account in accounts {
            let entries = self.ledger.entries_in_range(account.id, lo, hi).await?;
            statements.push(AccountStatement::from_entries(account.id, entries));
        }
        Ok(statements)
    }

    // ── Cards ───────────────────────────────────────────────────────────

    pub async fn create_card(&self, user: UserId, new: NewCard) -> Result<Card, ServiceError> {
        self.accounts
            .account_owned_by(new.account_id, user)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        Ok(self.cards.insert_card(new).await?)
    }

    /// Mint a dev card with a random last4 against an owned account.
    pub async fn ship_card(
        &self,
        user: UserId,
        account: AccountId,
    ) -> Result<Card, ServiceError> {
        self.accounts
            .account_owned_by(account, user)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;

        // v7 ids carry random low bits; enough entropy for a mock last4.
        let last4 = format!("{:04}", uuid::Uuid::now_v7().as_u128() % 10_000);
        let new = NewCard::new(account, last4, CardType::Credit, 12, 2030, CardStatus::Active)?;
        Ok(self.cards.insert_card(new).await?)
    }

    pub async fn list_cards(&self, user: UserId) -> Result<Vec<Card>, ServiceError> {
        Ok(self.cards.cards_for_user(user).await?)
    }

    // ── Account holders ─────────────────────────────────────────────────

    pub async fn create_holder(
        &self,
        user: UserId,
        new: NewAccountHolder,
    ) -> Result<AccountHolder, ServiceError> {
        self.accounts
            .account_owned_by(new.account_id, user)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        Ok(self.holders.insert_holder(new).await?)
    }

    pub async fn list_holders(&self, user: UserId) -> Result<Vec<AccountHolder>, ServiceError> {
        Ok(self.holders.holders_for_user(user).await?)
    }

    // ── Admin / errors ──────────────────────────────────────────────────

    pub async fn all_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.all_users().await?)
    }

    pub async fn recent_errors(&self) -> Result<Vec<ErrorLog>, ServiceError> {
        Ok(self.errors.recent_errors().await?)
    }

    pub async fn log_error(&self, new: NewErrorLog) -> Result<(), ServiceError> {
        self.errors.insert_error(new).await?;
        Ok(())
    }
}
