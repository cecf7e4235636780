//! `banksy-ledger`: the double-entry transfer and statement core.
//!
//! Pure domain logic: ledger entry model, transfer pair construction, and
//! statement balance math. No IO here; the stores in `banksy-infra` persist
//! what this crate decides, and the api crate orchestrates the two.

pub mod entry;
pub mod statement;
pub mod transfer;

pub use entry::{EntryKind, LedgerEntry, NewLedgerEntry};
pub use statement::{net_balance, statement_bounds, AccountStatement};
pub use transfer::TransferPair;
