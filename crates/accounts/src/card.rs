use serde::{Deserialize, Serialize};

use banksy_core::{AccountId, CardId, DomainError};

/// Card product kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Debit,
    Credit,
    Virtual,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Debit => "Debit",
            CardType::Credit => "Credit",
            CardType::Virtual => "Virtual",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Debit" => Ok(CardType::Debit),
            "Credit" => Ok(CardType::Credit),
            "Virtual" => Ok(CardType::Virtual),
            other => Err(DomainError::validation(format!(
                "card_type must be one of Debit, Credit, Virtual; got {other:?}"
            ))),
        }
    }
}

/// Card lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardStatus {
    Active,
    Blocked,
    Expired,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "Active",
            CardStatus::Blocked => "Blocked",
            CardStatus::Expired => "Expired",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Active" => Ok(CardStatus::Active),
            "Blocked" => Ok(CardStatus::Blocked),
            "Expired" => Ok(CardStatus::Expired),
            other => Err(DomainError::validation(format!(
                "card status must be one of Active, Blocked, Expired; got {other:?}"
            ))),
        }
    }
}

/// Card record. Only the last four PAN digits are ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub account_id: AccountId,
    pub card_number_last4: String,
    pub card_type: CardType,
    pub expiration_month: u8,
    pub expiration_year: u16,
    pub status: CardStatus,
}

/// A to-be-created card (id assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub account_id: AccountId,
    pub card_number_last4: String,
    pub card_type: CardType,
    pub expiration_month: u8,
    pub expiration_year: u16,
    pub status: CardStatus,
}

impl NewCard {
    pub fn new(
        account_id: AccountId,
        last4: impl Into<String>,
        card_type: CardType,
        expiration_month: u8,
        expiration_year: u16,
        status: CardStatus,
    ) -> Result<Self, DomainError> {
        let last4 = last4.into();
        if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "card_number_last4 must be 4 digits, got {last4:?}"
            )));
        }
        if !(1..=12).contains(&expiration_month) {
            return Err(DomainError::validation(format!(
                "expiration_month must be 1..=12, got {expiration_month}"
            )));
        }
        Ok(Self {
            account_id,
            card_number_last4: last4,
            card_type,
            expiration_month,
            expiration_year,
            status,
        })
    }
}
