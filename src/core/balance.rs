//! Balance derivation from ledger entries
//!
//! Balances are never stored. An account's balance is the sum of its credit
//! entries minus the sum of its debit entries, folded with checked decimal
//! arithmetic on every read.
//!
//! The processor only calls [`BalanceCalculator::get_balance`] while holding
//! the account's lock, so the value it validates against cannot change before
//! the dependent write commits.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::traits::LedgerStore;
use crate::types::{AccountId, LedgerEntry, LedgerError};

/// Derives account balances from a ledger store
#[derive(Debug)]
pub struct BalanceCalculator<L> {
    ledger: Arc<L>,
}

impl<L> Clone for BalanceCalculator<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: LedgerStore> BalanceCalculator<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Current balance of an account; zero when it has no entries
    pub fn get_balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        let entries = self.ledger.get_entries(account_id)?;
        fold_balance(account_id, &entries)
    }
}

/// Sum credits minus debits over `entries`
///
/// Fails with `ArithmeticOverflow` instead of wrapping or panicking.
pub fn fold_balance(account_id: AccountId, entries: &[LedgerEntry]) -> Result<Decimal, LedgerError> {
    entries.iter().try_fold(Decimal::ZERO, |balance, entry| {
        balance
            .checked_add(entry.signed_amount())
            .ok_or_else(|| LedgerError::arithmetic_overflow(account_id))
    })
}
