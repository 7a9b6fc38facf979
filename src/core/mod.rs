//! Core business logic module
//!
//! This module contains the transaction processing components:
//! - `traits` - Storage abstractions injected into the processor
//! - `account_store` - In-memory account metadata store
//! - `ledger_store` - In-memory append-only ledger with atomic writes
//! - `balance` - Balance derivation from ledger entries
//! - `locks` - Per-account locking with ordered acquisition and timeouts
//! - `unit_of_work` - Scoped commit-or-discard container for one operation
//! - `processor` - Deposit, withdraw and transfer orchestration
//! - `batch_processor` - Concurrent, order-preserving batch execution

pub mod account_store;
pub mod balance;
pub mod batch_processor;
pub mod ledger_store;
pub mod locks;
pub mod processor;
pub mod traits;
pub mod unit_of_work;

pub use account_store::InMemoryAccountStore;
pub use balance::BalanceCalculator;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use ledger_store::InMemoryLedgerStore;
pub use locks::{AccountLocks, LockSet};
pub use processor::TransactionProcessor;
pub use traits::{AccountStore, LedgerStore};
pub use unit_of_work::UnitOfWork;

/// Processor over the in-memory stores shipped with the crate
pub type InMemoryProcessor = TransactionProcessor<InMemoryAccountStore, InMemoryLedgerStore>;

impl InMemoryProcessor {
    /// Processor backed by fresh, empty in-memory stores
    pub fn in_memory(config: crate::config::EngineConfig) -> Self {
        TransactionProcessor::new(
            std::sync::Arc::new(InMemoryAccountStore::new()),
            std::sync::Arc::new(InMemoryLedgerStore::new()),
            config,
        )
    }
}
