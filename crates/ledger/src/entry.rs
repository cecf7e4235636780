use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use banksy_core::{AccountId, TransactionId, TransferGroupId};

/// Direction of a ledger entry.
///
/// The stored amount is always a positive magnitude; this kind is the only
/// carrier of sign. Serialized uppercase (`"DEBIT"` / `"CREDIT"`), the
/// canonical wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Debit,
    Credit,
}

impl EntryKind {
    /// Apply this kind's sign to a positive magnitude: credits count
    /// positive, debits negative.
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            EntryKind::Credit => amount,
            EntryKind::Debit => -amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Debit => "DEBIT",
            EntryKind::Credit => "CREDIT",
        }
    }
}

/// One immutable movement of value against one account.
///
/// Entries are append-only: no update or delete path exists anywhere in the
/// system. `transfer_group_id` is present iff the entry was created by the
/// Transfer Engine, and is then shared by exactly two entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: TransactionId,
    pub account_id: AccountId,
    /// Positive amount in minor currency units (cents).
    pub amount: i64,
    pub kind: EntryKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub transfer_group_id: Option<TransferGroupId>,
}

impl LedgerEntry {
    /// The entry's contribution to a running balance.
    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount)
    }
}

/// A to-be-persisted entry (id and timestamp assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub account_id: AccountId,
    pub amount: i64,
    pub kind: EntryKind,
    pub description: Option<String>,
    pub transfer_group_id: Option<TransferGroupId>,
}
