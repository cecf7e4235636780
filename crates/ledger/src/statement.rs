use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use banksy_core::AccountId;

use crate::entry::LedgerEntry;

/// One account's activity and net balance over a date range.
///
/// Amounts in `entries` keep their stored positive magnitudes; only
/// `balance` is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub account_id: AccountId,
    pub balance: i64,
    pub entries: Vec<LedgerEntry>,
}

impl AccountStatement {
    /// Assemble a statement from entries already filtered and ordered by the
    /// store (created_at ascending, id as tiebreak).
    pub fn from_entries(account_id: AccountId, entries: Vec<LedgerEntry>) -> Self {
        let balance = net_balance(&entries);
        Self {
            account_id,
            balance,
            entries,
        }
    }
}

/// Normalize an inclusive date range to timestamp bounds.
///
/// Start is the first microsecond of `start`, end is the last microsecond of
/// `end` (23:59:59.999999), so an entry timestamped anywhere on the end date
/// is included and the following midnight is not.
pub fn statement_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    // and_hms_micro_opt only fails for out-of-range components; these are
    // constants, so the fallbacks are unreachable.
    let lo = start
        .and_hms_micro_opt(0, 0, 0, 0)
        .unwrap_or(start.and_time(chrono::NaiveTime::MIN))
        .and_utc();
    let hi = end
        .and_hms_micro_opt(23, 59, 59, 999_999)
        .unwrap_or(end.and_time(chrono::NaiveTime::MIN))
        .and_utc();
    (lo, hi)
}

/// Net balance of a set of entries: credits count positive, debits negative.
///
/// Accumulates in i128 so pathological sums cannot wrap mid-fold.
pub fn net_balance(entries: &[LedgerEntry]) -> i64 {
    let total: i128 = entries
        .iter()
        .map(|e| e.signed_amount() as i128)
        .sum();
    total.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
