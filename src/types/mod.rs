//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account metadata and the reserved system account
//! - `transaction`: Transactions, ledger entries and batch input records
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{is_valid_currency, Account, AccountId, AccountSummary, AccountType, SYSTEM_ACCOUNT};
pub use error::LedgerError;
pub use transaction::{
    EntryId, EntryKind, LedgerEntry, OperationRecord, OperationType, Transaction, TransactionId,
    TransactionType,
};
