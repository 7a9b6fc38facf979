//! Account-related types for the ledger engine
//!
//! Accounts carry only metadata. Balances are never stored on the account;
//! they are always derived from the account's ledger entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Account identifier
pub type AccountId = u64;

/// Reserved counterparty for deposits and withdrawals.
///
/// The system account is virtual: it has no stored account row and callers
/// may never address it directly. It only ever appears as the `account_id`
/// of the balancing leg of a deposit or withdrawal.
pub const SYSTEM_ACCOUNT: AccountId = 0;

/// Kind of account, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Checking,
    Savings,
    Business,
}

/// Account metadata
///
/// Immutable after creation. The engine only reads accounts to check that
/// they exist and to compare currencies on transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account identifier (never [`SYSTEM_ACCOUNT`])
    pub id: AccountId,

    /// Kind of account
    pub account_type: AccountType,

    /// Three-letter currency code, upper case
    pub currency: String,

    /// Optional reference to the owning user in an external system
    pub user_ref: Option<String>,

    /// When the account was opened
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account opened now
    pub fn new(id: AccountId, account_type: AccountType, currency: impl Into<String>) -> Self {
        Account {
            id,
            account_type,
            currency: currency.into(),
            user_ref: None,
            created_at: Utc::now(),
        }
    }
}

/// Account metadata together with its derived balance
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub account: Account,
    pub balance: Decimal,
}

/// Check that a currency code is three ASCII letters
pub fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_account_has_no_user_ref() {
        let account = Account::new(7, AccountType::Savings, "EUR");

        assert_eq!(account.id, 7);
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(account.currency, "EUR");
        assert_eq!(account.user_ref, None);
    }

    #[rstest]
    #[case::usd("USD", true)]
    #[case::lowercase("eur", true)]
    #[case::too_short("US", false)]
    #[case::too_long("USDT", false)]
    #[case::digits("U5D", false)]
    #[case::empty("", false)]
    fn test_is_valid_currency(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_valid_currency(code), expected);
    }
}
