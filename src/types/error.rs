//! Error types for the ledger engine
//!
//! Every operation returns a typed `LedgerError` instead of panicking, so
//! callers can branch on the failure kind.
//!
//! # Error Categories
//!
//! - **Input Errors**: invalid amounts, reserved ids, bad currency codes
//! - **Lookup Errors**: unknown or duplicate accounts
//! - **Business Rule Errors**: insufficient funds, same-account transfers
//! - **Concurrency Errors**: lock acquisition timed out (retryable)
//! - **Storage Errors**: the atomic write failed, nothing was persisted
//! - **Range Errors**: a balance would leave the decimal range

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountId;

/// Main error type for the ledger engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Input rejected before any lock was taken
    ///
    /// Raised for non-positive amounts, amounts with too many fractional
    /// digits, the reserved system account id and malformed currency codes.
    #[error("Validation failed: {reason}")]
    Validation {
        /// What was wrong with the input
        reason: String,
    },

    /// The account does not exist
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Requested account id
        account: AccountId,
    },

    /// An account with this id is already open
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// Conflicting account id
        account: AccountId,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccountTransfer {
        /// The account used on both sides
        account: AccountId,
    },

    /// Transfer between accounts held in different currencies
    #[error("Currency mismatch: account {from} is {from_currency}, account {to} is {to_currency}")]
    CurrencyMismatch {
        from: AccountId,
        to: AccountId,
        from_currency: String,
        to_currency: String,
    },

    /// Balance too low for a withdrawal or transfer
    ///
    /// The operation was aborted with zero writes.
    #[error(
        "Insufficient funds for account {account}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        /// Debited account
        account: AccountId,
        /// Balance at the time of the check
        available: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// Account locks were not acquired within the configured timeout
    ///
    /// Nothing was written and no lock is left held. The caller may retry.
    #[error("Timed out after {waited_ms}ms waiting for locks on accounts {accounts:?}")]
    ConcurrencyTimeout {
        /// Accounts the operation needed, in lock order
        accounts: Vec<AccountId>,
        /// Configured wait bound in milliseconds
        waited_ms: u64,
    },

    /// The underlying atomic write failed
    ///
    /// The whole multi-row write was discarded.
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the failure
        message: String,
    },

    /// Folding an account's entries overflowed the decimal range
    #[error("Arithmetic overflow computing balance for account {account}")]
    ArithmeticOverflow {
        /// Account whose entries overflowed
        account: AccountId,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a Validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            reason: reason.into(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: AccountId) -> Self {
        LedgerError::DuplicateAccount { account }
    }

    /// Create a SameAccountTransfer error
    pub fn same_account_transfer(account: AccountId) -> Self {
        LedgerError::SameAccountTransfer { account }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            available,
            requested,
        }
    }

    /// Create a ConcurrencyTimeout error
    pub fn concurrency_timeout(accounts: &[AccountId], waited_ms: u64) -> Self {
        LedgerError::ConcurrencyTimeout {
            accounts: accounts.to_vec(),
            waited_ms,
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow { account }
    }

    /// Whether resubmitting the same operation unchanged may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrencyTimeout { .. })
    }
}
