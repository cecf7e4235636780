//! `banksy-infra`: persistence for the ledger and the account directory.
//!
//! Two interchangeable backends behind the same traits: an in-memory store
//! for tests/dev and a Postgres store for production. The Transfer Engine's
//! atomicity guarantee lives here: `LedgerStore::insert_transfer` persists
//! both legs in one unit of work or not at all.

pub mod store;

pub use store::{
    in_memory::InMemoryStore,
    postgres::PostgresStore,
    schema::{ensure_schema, TABLES},
    traits::{
        AccountDirectory, CardStore, ErrorLog, ErrorLogStore, HolderStore, LedgerStore,
        NewErrorLog, StoreError, UserStore,
    },
};
