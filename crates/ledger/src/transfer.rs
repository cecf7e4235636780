use banksy_core::{AccountId, DomainError, TransferGroupId};

use crate::entry::{EntryKind, NewLedgerEntry};

/// The two legs of one money transfer, ready for a single atomic insert.
///
/// Both legs carry the same positive amount magnitude and the same freshly
/// minted group id: a DEBIT against the sender account and a CREDIT against
/// the recipient account. Sender/recipient ownership checks happen *before*
/// this is built; persistence atomicity is the store's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPair {
    pub group_id: TransferGroupId,
    pub debit: NewLedgerEntry,
    pub credit: NewLedgerEntry,
}

impl TransferPair {
    /// Build the debit/credit pair for a validated transfer.
    ///
    /// Fails when `amount` is not strictly positive. When the caller gave no
    /// description, each leg gets a direction-specific default naming the
    /// counterparty account.
    pub fn build(
        sender: AccountId,
        recipient: AccountId,
        amount: i64,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(format!(
                "transfer amount must be positive, got {amount}"
            )));
        }

        let group_id = TransferGroupId::new();

        let debit = NewLedgerEntry {
            account_id: sender,
            amount,
            kind: EntryKind::Debit,
            description: Some(
                description
                    .clone()
                    .unwrap_or_else(|| format!("Transfer to {recipient}")),
            ),
            transfer_group_id: Some(group_id),
        };

        let credit = NewLedgerEntry {
            account_id: recipient,
            amount,
            kind: EntryKind::Credit,
            description: Some(description.unwrap_or_else(|| format!("Transfer from {sender}"))),
            transfer_group_id: Some(group_id),
        };

        Ok(Self {
            group_id,
            debit,
            credit,
        })
    }
}
