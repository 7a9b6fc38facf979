//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore` struct, which keeps account
//! metadata in a `DashMap` so lookups from many concurrent operations never
//! contend on a global lock.
//!
//! # Thread Safety
//!
//! Accounts are insert-only and immutable once stored. DashMap's entry API
//! makes the "id is free, insert" check atomic, so two concurrent opens of
//! the same id cannot both succeed.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, LedgerError, SYSTEM_ACCOUNT};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Thread-safe account metadata store
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Account metadata by id
    ///
    /// Never contains [`SYSTEM_ACCOUNT`], which is virtual.
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountStore {
    /// Create a new empty InMemoryAccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account has been opened yet
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get_account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|entry| entry.value().clone())
    }

    fn insert_account(&self, account: Account) -> Result<(), LedgerError> {
        if account.id == SYSTEM_ACCOUNT {
            return Err(LedgerError::validation(format!(
                "account id {} is reserved for the system account",
                SYSTEM_ACCOUNT
            )));
        }

        match self.accounts.entry(account.id) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(account.id)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}
