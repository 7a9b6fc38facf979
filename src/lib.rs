//! Ledger Engine Library
//! # Overview
//!
//! This library provides a double-entry ledger transaction engine. Every
//! deposit, withdrawal and transfer is recorded as a balanced pair of ledger
//! entries, and balances are always derived from those entries rather than
//! stored.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerEntry, LedgerError)
//! - [`config`] - Processor settings (lock timeout, default currency)
//! - [`core`] - Business logic components:
//!   - [`core::processor`] - Operation orchestration and validation
//!   - [`core::locks`] - Per-account locks with ordered acquisition and timeouts
//!   - [`core::unit_of_work`] - Commit-or-discard scope for one operation
//!   - [`core::ledger_store`] / [`core::account_store`] - In-memory storage
//!   - [`core::balance`] - Balance derivation
//!   - [`core::batch_processor`] - Concurrent, order-preserving batches
//! - [`io`] - CSV input parsing and balance output
//! - [`strategy`] - Sequential and concurrent processing pipelines
//! - [`cli`] / [`logging`] - Binary front end
//!
//! # Operations
//!
//! - **Deposit**: Credit an account, debiting the system account
//! - **Withdraw**: Debit an account (requires sufficient balance), crediting
//!   the system account
//! - **Transfer**: Debit one account and credit another of the same currency
//!
//! Failed operations leave no trace in the ledger.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use config::EngineConfig;
pub use self::core::{
    AccountStore, InMemoryAccountStore, InMemoryLedgerStore, InMemoryProcessor, LedgerStore,
    TransactionProcessor,
};
pub use io::write_balances_csv;
pub use types::{
    Account, AccountId, AccountType, LedgerEntry, LedgerError, OperationRecord, Transaction,
    TransactionId, TransactionType, SYSTEM_ACCOUNT,
};
