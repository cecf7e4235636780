use serde::{Deserialize, Serialize};

use banksy_core::{AccountHolderId, AccountId, UserId};

/// Link between a user and an account with a role ("Primary", "Joint", ...).
///
/// Holder type is free text in the reference data; the backend treats it as
/// an opaque label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHolder {
    pub id: AccountHolderId,
    pub user_id: UserId,
    pub account_id: AccountId,
    pub holder_type: String,
}

/// A to-be-created holder link (id assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountHolder {
    pub user_id: UserId,
    pub account_id: AccountId,
    pub holder_type: String,
}
