use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use banksy_core::UserId;

/// External identity-provider subject (the `sub` claim).
///
/// Stable across sessions; the one key users are upserted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthSubject(String);

impl AuthSubject {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AuthSubject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile fields carried by verified token claims.
///
/// Used for upsert-on-first-seen: a missing field never clears a stored
/// value, a present-and-different one refreshes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub subject: AuthSubject,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Merge fresh profile claims into this record.
    ///
    /// Returns true when anything changed (callers persist only then).
    pub fn refresh_profile(&mut self, profile: &UserProfile) -> bool {
        let mut changed = false;
        if profile.email.is_some() && profile.email != self.email {
            self.email = profile.email.clone();
            changed = true;
        }
        if profile.first_name.is_some() && profile.first_name != self.first_name {
            self.first_name = profile.first_name.clone();
            changed = true;
        }
        if profile.last_name.is_some() && profile.last_name != self.last_name {
            self.last_name = profile.last_name.clone();
            changed = true;
        }
        changed
    }
}

/// A to-be-created user (id and timestamps assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub subject: AuthSubject,
    pub profile: UserProfile,
}
