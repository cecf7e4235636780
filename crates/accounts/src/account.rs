use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use banksy_core::{AccountId, DomainError, UserId};

/// ISO-4217-style currency code (three uppercase ASCII letters).
///
/// An account's currency is fixed at creation; there is no conversion
/// anywhere in the system, so the code is metadata rather than arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalize a currency code.
    ///
    /// Accepts lowercase input ("usd" becomes "USD"); rejects anything that
    /// is not exactly three ASCII letters.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.len() != 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "currency must be a 3-letter code, got {s:?}"
            )));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account record: exactly one owning user, currency fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub name: String,
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A to-be-created account (id and timestamps assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user_id: UserId,
    pub name: String,
    pub currency: CurrencyCode,
}

impl NewAccount {
    pub fn new(user_id: UserId, name: impl Into<String>, currency: CurrencyCode) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("account name must not be empty"));
        }
        Ok(Self {
            user_id,
            name,
            currency,
        })
    }
}
