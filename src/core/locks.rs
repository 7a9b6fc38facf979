//! Per-account locking for balance-mutating operations
//!
//! This module provides `AccountLocks`, the engine's concurrency controller.
//! Every account gets its own async mutex, created lazily in a `DashMap`.
//! Holding an account's mutex is what makes "read balance, then write" a
//! single critical section for that account.
//!
//! # Deadlock Freedom
//!
//! Operations touching several accounts acquire their mutexes in ascending
//! account id order, whatever order the caller named them in. A transfer
//! A→B and a concurrent transfer B→A therefore both try A first, and one of
//! them simply waits for the other.
//!
//! # Bounded Waits
//!
//! All acquisitions of one operation share a single deadline. When it passes,
//! the guards collected so far are dropped and `ConcurrencyTimeout` is
//! returned; no lock is left held by the failed attempt.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::{timeout_at, Instant};

use crate::types::{AccountId, LedgerError};

/// Lock table keyed by account id
#[derive(Debug)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
    timeout: Duration,
}

impl AccountLocks {
    /// Create an empty lock table with the given wait bound
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    /// Acquire the locks of every account in `accounts`
    ///
    /// Duplicates are ignored and the locks are taken in ascending id order.
    /// The returned [`LockSet`] releases all of them when dropped.
    pub async fn acquire(&self, accounts: &[AccountId]) -> Result<LockSet, LedgerError> {
        let ordered = lock_order(accounts);
        let deadline = Instant::now() + self.timeout;
        let mut guards = Vec::with_capacity(ordered.len());

        for &account in &ordered {
            let mutex = self.mutex_for(account);
            match timeout_at(deadline, mutex.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => {
                    tracing::warn!(
                        account,
                        accounts = ?ordered,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "account lock wait timed out"
                    );
                    // Dropping `guards` here releases whatever was acquired
                    return Err(LedgerError::concurrency_timeout(
                        &ordered,
                        self.timeout.as_millis() as u64,
                    ));
                }
            }
        }

        tracing::trace!(accounts = ?ordered, "account locks acquired");
        Ok(LockSet {
            accounts: ordered,
            _guards: guards,
        })
    }

    /// Whether some operation currently holds the account's lock
    pub fn is_locked(&self, account: AccountId) -> bool {
        self.locks
            .get(&account)
            .map(|entry| entry.value().try_lock().is_err())
            .unwrap_or(false)
    }

    fn mutex_for(&self, account: AccountId) -> Arc<Mutex<()>> {
        let entry = self.locks.entry(account).or_default();
        Arc::clone(entry.value())
    }
}

/// Locks held by one operation
///
/// Released exactly once, when the set is dropped, on every exit path.
#[derive(Debug)]
pub struct LockSet {
    accounts: Vec<AccountId>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl LockSet {
    /// Locked accounts, in acquisition order
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// Whether this set holds the lock for `account`
    pub fn covers(&self, account: AccountId) -> bool {
        self.accounts.binary_search(&account).is_ok()
    }
}

impl Drop for LockSet {
    fn drop(&mut self) {
        tracing::trace!(accounts = ?self.accounts, "account locks released");
    }
}

/// Canonical acquisition order: ascending, without duplicates
pub fn lock_order(accounts: &[AccountId]) -> Vec<AccountId> {
    let mut ordered = accounts.to_vec();
    ordered.sort_unstable();
    ordered.dedup();
    ordered
}
