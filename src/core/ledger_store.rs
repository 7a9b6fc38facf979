//! In-memory append-only ledger
//!
//! This module provides the `InMemoryLedgerStore` struct, which keeps every
//! committed transaction and ledger entry in memory.
//!
//! # Atomicity
//!
//! All rows live behind a single `RwLock`. `append_atomic` validates the whole
//! write first and only then pushes the transaction and both entries while
//! holding the write guard, so a reader either sees all rows of a transaction
//! or none of them. A rejected write leaves the store untouched.
//!
//! # Ordering
//!
//! Entries are indexed per account in append order. `get_entries` returns them
//! sorted by creation time, stable for entries created at the same instant.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::traits::LedgerStore;
use crate::types::{AccountId, LedgerEntry, LedgerError, Transaction, TransactionId};

#[derive(Debug, Default)]
struct LedgerState {
    transactions: HashMap<TransactionId, Transaction>,
    entries: Vec<LedgerEntry>,
    by_account: HashMap<AccountId, Vec<usize>>,
    by_transaction: HashMap<TransactionId, Vec<usize>>,
}

/// Thread-safe, append-only ledger store
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl InMemoryLedgerStore {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transactions
    pub fn transaction_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.transactions.len())
    }

    /// Number of committed ledger entries across all accounts
    pub fn entry_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.entries.len())
    }

    /// Every committed transaction, in no particular order
    pub fn transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.read()?.transactions.values().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state
            .read()
            .map_err(|_| LedgerError::storage_failure("ledger lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state
            .write()
            .map_err(|_| LedgerError::storage_failure("ledger lock poisoned"))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append_atomic(
        &self,
        transaction: Transaction,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), LedgerError> {
        if !transaction.is_balanced_by(&entries) {
            return Err(LedgerError::storage_failure(format!(
                "rejected unbalanced write for transaction {}",
                transaction.id
            )));
        }

        let mut state = self.write()?;

        if state.transactions.contains_key(&transaction.id) {
            return Err(LedgerError::storage_failure(format!(
                "transaction {} already committed",
                transaction.id
            )));
        }

        // Validated; from here on nothing can fail
        let tx_id = transaction.id;
        let mut positions = Vec::with_capacity(entries.len());
        for entry in entries {
            let position = state.entries.len();
            state
                .by_account
                .entry(entry.account_id)
                .or_default()
                .push(position);
            state.entries.push(entry);
            positions.push(position);
        }
        state.by_transaction.insert(tx_id, positions);
        state.transactions.insert(tx_id, transaction);

        Ok(())
    }

    fn get_entries(&self, account_id: AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read()?;

        let mut entries: Vec<LedgerEntry> = state
            .by_account
            .get(&account_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| state.entries[position].clone())
                    .collect()
            })
            .unwrap_or_default();

        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }

    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.read()?.transactions.get(&id).cloned())
    }

    fn entries_for_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read()?;

        Ok(state
            .by_transaction
            .get(&id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| state.entries[position].clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryKind, TransactionType, SYSTEM_ACCOUNT};
    use rust_decimal::Decimal;

    fn deposit(account: AccountId, amount: i64) -> (Transaction, Vec<LedgerEntry>) {
        let tx = Transaction::new(
            TransactionType::Deposit,
            None,
            Some(account),
            Decimal::new(amount, 0),
        );
        let entries = vec![tx.credit(account), tx.debit(SYSTEM_ACCOUNT)];
        (tx, entries)
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryLedgerStore::new();

        assert!(store.get_entries(1).unwrap().is_empty());
        assert_eq!(store.transaction_count().unwrap(), 0);
        assert_eq!(store.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_append_indexes_both_accounts() {
        let store = InMemoryLedgerStore::new();
        let (tx, entries) = deposit(1, 100);
        let tx_id = tx.id;

        store.append_atomic(tx.clone(), entries).unwrap();

        let account_entries = store.get_entries(1).unwrap();
        assert_eq!(account_entries.len(), 1);
        assert_eq!(account_entries[0].kind, EntryKind::Credit);

        let system_entries = store.get_entries(SYSTEM_ACCOUNT).unwrap();
        assert_eq!(system_entries.len(), 1);
        assert_eq!(system_entries[0].kind, EntryKind::Debit);

        assert_eq!(store.get_transaction(tx_id).unwrap(), Some(tx));
        assert_eq!(store.entries_for_transaction(tx_id).unwrap().len(), 2);
    }

    #[test]
    fn test_unbalanced_write_leaves_store_untouched() {
        let store = InMemoryLedgerStore::new();
        let (tx, mut entries) = deposit(1, 100);
        entries.pop();

        let result = store.append_atomic(tx.clone(), entries);

        assert!(matches!(result, Err(LedgerError::StorageFailure { .. })));
        assert_eq!(store.entry_count().unwrap(), 0);
        assert_eq!(store.get_transaction(tx.id).unwrap(), None);
    }

    #[test]
    fn test_duplicate_transaction_id_rejected() {
        let store = InMemoryLedgerStore::new();
        let (tx, entries) = deposit(1, 100);

        store.append_atomic(tx.clone(), entries.clone()).unwrap();
        let result = store.append_atomic(tx, entries);

        assert!(matches!(result, Err(LedgerError::StorageFailure { .. })));
        assert_eq!(store.entry_count().unwrap(), 2);
        assert_eq!(store.transaction_count().unwrap(), 1);
    }

    #[test]
    fn test_entries_ordered_by_creation_time() {
        let store = InMemoryLedgerStore::new();
        let (first, first_entries) = deposit(1, 10);
        let (mut second, _) = deposit(1, 20);
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        let second_entries = vec![second.credit(1), second.debit(SYSTEM_ACCOUNT)];

        // Append out of creation order
        store.append_atomic(second, second_entries).unwrap();
        store.append_atomic(first, first_entries).unwrap();

        let amounts: Vec<Decimal> = store
            .get_entries(1)
            .unwrap()
            .iter()
            .map(|entry| entry.amount)
            .collect();
        assert_eq!(amounts, vec![Decimal::new(10, 0), Decimal::new(20, 0)]);
    }

    #[test]
    fn test_unknown_transaction() {
        let store = InMemoryLedgerStore::new();
        let id = uuid::Uuid::new_v4();

        assert_eq!(store.get_transaction(id).unwrap(), None);
        assert!(store.entries_for_transaction(id).unwrap().is_empty());
    }
}
