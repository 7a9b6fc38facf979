//! Storage traits the engine is built on
//!
//! The processor never owns storage directly. Account metadata and the
//! ledger are injected at construction through these traits, so the
//! in-memory stores shipped with the crate can be swapped for a database
//! backed implementation without touching the processing logic.

use crate::types::{Account, AccountId, LedgerEntry, LedgerError, Transaction, TransactionId};

/// Account metadata lookup and creation
///
/// Accounts are immutable once inserted, so lookups need no coordination
/// with the engine's account locks.
pub trait AccountStore: Send + Sync {
    /// Resolve an account id to its metadata
    fn get_account(&self, id: AccountId) -> Option<Account>;

    /// Insert a new account
    ///
    /// Fails with `DuplicateAccount` if the id is already taken.
    fn insert_account(&self, account: Account) -> Result<(), LedgerError>;

    /// Ids of every stored account, in ascending order
    fn account_ids(&self) -> Vec<AccountId>;
}

/// Append-only storage of transactions and their ledger entries
pub trait LedgerStore: Send + Sync {
    /// Persist a transaction and its entries as one unit
    ///
    /// Either every row is stored or none is. A concurrent reader never
    /// observes the transaction without all of its entries.
    fn append_atomic(
        &self,
        transaction: Transaction,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), LedgerError>;

    /// Entries for an account, ordered by creation time ascending
    fn get_entries(&self, account_id: AccountId) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Look up a committed transaction
    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError>;

    /// Entries committed together with a transaction
    fn entries_for_transaction(&self, id: TransactionId)
        -> Result<Vec<LedgerEntry>, LedgerError>;
}
