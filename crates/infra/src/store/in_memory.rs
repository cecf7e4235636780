use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use banksy_accounts::{Account, AccountHolder, Card, NewAccount, NewAccountHolder, NewCard, NewUser, User};
use banksy_core::{AccountHolderId, AccountId, CardId, ErrorLogId, TransactionId, TransferGroupId, UserId};
use banksy_ledger::{LedgerEntry, NewLedgerEntry, TransferPair};

use super::traits::{
    AccountDirectory, CardStore, ErrorLog, ErrorLogStore, HolderStore, LedgerStore, NewErrorLog,
    StoreError, UserStore,
};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    accounts: Vec<Account>,
    entries: Vec<LedgerEntry>,
    cards: Vec<Card>,
    holders: Vec<AccountHolder>,
    errors: Vec<ErrorLog>,

    next_user_id: i64,
    next_account_id: i64,
    next_entry_id: i64,
    next_card_id: i64,
    next_holder_id: i64,
    next_error_id: i64,
}

impl Inner {
    fn owned_account_ids(&self, owner: UserId) -> HashSet<AccountId> {
        self.accounts
            .iter()
            .filter(|a| a.user_id == owner)
            .map(|a| a.id)
            .collect()
    }
}

/// In-memory store backing all directories and the ledger.
///
/// Intended for tests/dev. One lock guards everything, which trivially makes
/// the two-leg transfer insert atomic: readers either see both entries or
/// neither.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

fn store_entry(inner: &mut Inner, new: NewLedgerEntry, created_at: DateTime<Utc>) -> LedgerEntry {
    inner.next_entry_id += 1;
    let entry = LedgerEntry {
        id: TransactionId::new(inner.next_entry_id),
        account_id: new.account_id,
        amount: new.amount,
        kind: new.kind,
        description: new.description,
        created_at,
        transfer_group_id: new.transfer_group_id,
    };
    inner.entries.push(entry.clone());
    entry
}

#[async_trait::async_trait]
impl AccountDirectory for InMemoryStore {
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.write()?;
        let now = Utc::now();
        inner.next_account_id += 1;
        let account = Account {
            id: AccountId::new(inner.next_account_id),
            user_id: new.user_id,
            name: new.name,
            currency: new.currency,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn account_owned_by(&self, id: AccountId, owner: UserId) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.id == id && a.user_id == owner)
            .cloned())
    }

    async fn accounts_for_user(&self, owner: UserId) -> Result<Vec<Account>, StoreError> {
        let inner = self.read()?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .iter()
            .filter(|a| a.user_id == owner)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryStore {
    async fn insert_transfer(&self, pair: TransferPair) -> Result<(LedgerEntry, LedgerEntry), StoreError> {
        // Both legs land under one write guard with one timestamp; no reader
        // can observe the gap between them.
        let mut inner = self.write()?;
        let now = Utc::now();
        let debit = store_entry(&mut inner, pair.debit, now);
        let credit = store_entry(&mut inner, pair.credit, now);
        Ok((debit, credit))
    }

    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        let mut inner = self.write()?;
        let now = Utc::now();
        Ok(store_entry(&mut inner, entry, now))
    }

    async fn entries_for_transfer_owned(
        &self,
        group: TransferGroupId,
        owner: UserId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self.read()?;
        let owned = inner.owned_account_ids(owner);
        let mut entries: Vec<LedgerEntry> = inner
            .entries
            .iter()
            .filter(|e| e.transfer_group_id == Some(group) && owned.contains(&e.account_id))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn entries_for_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self.read()?;
        let mut entries: Vec<LedgerEntry> = inner
            .entries
            .iter()
            .filter(|e| e.account_id == account)
            .cloned()
            .collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e.id));
        Ok(entries)
    }

    async fn entries_in_range(
        &self,
        account: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self.read()?;
        let mut entries: Vec<LedgerEntry> = inner
            .entries
            .iter()
            .filter(|e| e.account_id == account && e.created_at >= from && e.created_at <= to)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.created_at, e.id));
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryStore {
    async fn upsert_by_subject(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.write()?;
        let now = Utc::now();

        if let Some(user) = inner.users.iter_mut().find(|u| u.subject == new.subject) {
            if user.refresh_profile(&new.profile) {
                user.updated_at = now;
            }
            return Ok(user.clone());
        }

        inner.next_user_id += 1;
        let user = User {
            id: UserId::new(inner.next_user_id),
            subject: new.subject,
            email: new.profile.email,
            first_name: new.profile.first_name,
            last_name: new.profile.last_name,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let inner = self.read()?;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.read()?;
        let mut users = inner.users.clone();
        users.sort_by_key(|u| u.id.as_i64());
        Ok(users)
    }
}

#[async_trait::async_trait]
impl CardStore for InMemoryStore {
    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError> {
        let mut inner = self.write()?;
        inner.next_card_id += 1;
        let card = Card {
            id: CardId::new(inner.next_card_id),
            account_id: new.account_id,
            card_number_last4: new.card_number_last4,
            card_type: new.card_type,
            expiration_month: new.expiration_month,
            expiration_year: new.expiration_year,
            status: new.status,
        };
        inner.cards.push(card.clone());
        Ok(card)
    }

    async fn cards_for_user(&self, owner: UserId) -> Result<Vec<Card>, StoreError> {
        let inner = self.read()?;
        let owned = inner.owned_account_ids(owner);
        Ok(inner
            .cards
            .iter()
            .filter(|c| owned.contains(&c.account_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl HolderStore for InMemoryStore {
    async fn insert_holder(&self, new: NewAccountHolder) -> Result<AccountHolder, StoreError> {
        let mut inner = self.write()?;
        inner.next_holder_id += 1;
        let holder = AccountHolder {
            id: AccountHolderId::new(inner.next_holder_id),
            user_id: new.user_id,
            account_id: new.account_id,
            holder_type: new.holder_type,
        };
        inner.holders.push(holder.clone());
        Ok(holder)
    }

    async fn holders_for_user(&self, owner: UserId) -> Result<Vec<AccountHolder>, StoreError> {
        let inner = self.read()?;
        let owned = inner.owned_account_ids(owner);
        Ok(inner
            .holders
            .iter()
            .filter(|h| owned.contains(&h.account_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ErrorLogStore for InMemoryStore {
    async fn insert_error(&self, new: NewErrorLog) -> Result<ErrorLog, StoreError> {
        let mut inner = self.write()?;
        inner.next_error_id += 1;
        let log = ErrorLog {
            id: ErrorLogId::new(inner.next_error_id),
            user_id: new.user_id,
            error_code: new.error_code,
            message: new.message,
            location: new.location,
            created_at: Utc::now(),
        };
        inner.errors.push(log.clone());
        Ok(log)
    }

    async fn recent_errors(&self) -> Result<Vec<ErrorLog>, StoreError> {
        let inner = self.read()?;
        let mut errors = inner.errors.clone();
        errors.sort_by_key(|e| std::cmp::Reverse((e.created_at, e.id.as_i64())));
        Ok(errors)
    }
}
