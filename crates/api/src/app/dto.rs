//! Request DTOs and domain-to-JSON mapping.
//!
//! Ledger entries go over the wire with a `type` field (`DEBIT`/`CREDIT`);
//! amounts keep their stored positive magnitudes, sign is conveyed by
//! `type` only.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use banksy_accounts::{Account, AccountHolder, Card, User};
use banksy_infra::ErrorLog;
use banksy_ledger::{AccountStatement, LedgerEntry};

// ── Request DTOs ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub account_id: i64,
    pub card_number_last4: String,
    pub card_type: String,
    pub expiration_month: u8,
    pub expiration_year: u16,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountHolderRequest {
    pub user_id: i64,
    pub account_id: i64,
    pub holder_type: String,
}

#[derive(Debug, Deserialize)]
pub struct MoneyTransferRequest {
    pub sender_account_id: i64,
    pub recipient_account_id: i64,
    pub amount: i64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatementRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub account_id: i64,
}

// ── Response mapping ────────────────────────────────────────────────────

pub fn user_to_json(user: &User) -> Value {
    json!({
        "id": user.id.as_i64(),
        "subject": user.subject.as_str(),
        "email": user.email,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    })
}

pub fn account_to_json(account: &Account) -> Value {
    json!({
        "id": account.id.as_i64(),
        "name": account.name,
        "currency": account.currency.as_str(),
        "created_at": account.created_at,
        "updated_at": account.updated_at,
    })
}

pub fn entry_to_json(entry: &LedgerEntry) -> Value {
    json!({
        "id": entry.id.as_i64(),
        "account_id": entry.account_id.as_i64(),
        "amount": entry.amount,
        "type": entry.kind.as_str(),
        "description": entry.description,
        "created_at": entry.created_at,
    })
}

pub fn card_to_json(card: &Card) -> Value {
    json!({
        "id": card.id.as_i64(),
        "account_id": card.account_id.as_i64(),
        "card_number_last4": card.card_number_last4,
        "card_type": card.card_type.as_str(),
        "expiration_month": card.expiration_month,
        "expiration_year": card.expiration_year,
        "status": card.status.as_str(),
    })
}

pub fn holder_to_json(holder: &AccountHolder) -> Value {
    json!({
        "id": holder.id.as_i64(),
        "user_id": holder.user_id.as_i64(),
        "account_id": holder.account_id.as_i64(),
        "holder_type": holder.holder_type,
    })
}

pub fn statement_to_json(statement: &AccountStatement) -> Value {
    json!({
        "account_id": statement.account_id.as_i64(),
        "balance": statement.balance,
        "transactions": statement.entries.iter().map(entry_to_json).collect::<Vec<_>>(),
    })
}

pub fn error_log_to_json(log: &ErrorLog) -> Value {
    json!({
        "id": log.id.as_i64(),
        "user_id": log.user_id.map(|u| u.as_i64()),
        "error_code": log.error_code,
        "message": log.message,
        "location": log.location,
        "created_at": log.created_at,
    })
}
