//! `banksy-accounts`: account, card, holder, and user record types.
//!
//! These are the Account Directory's data model and the glue records around
//! it. Pure types + validation; persistence lives in `banksy-infra`.

pub mod account;
pub mod card;
pub mod holder;
pub mod user;

pub use account::{Account, CurrencyCode, NewAccount};
pub use card::{Card, CardStatus, CardType, NewCard};
pub use holder::{AccountHolder, NewAccountHolder};
pub use user::{AuthSubject, NewUser, User, UserProfile};
