//! `banksy-core`: shared identifiers and the domain error model.
//!
//! Everything here is IO-free and deterministic; storage and transport
//! concerns live in `banksy-infra` and `banksy-api`.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AccountHolderId, AccountId, CardId, ErrorLogId, TransactionId, TransferGroupId, UserId};
