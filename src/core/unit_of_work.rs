//! Scoped commit-or-discard unit of work
//!
//! A `UnitOfWork` owns the account locks of one operation and the rows that
//! operation wants to write. Rows are only staged in memory; nothing reaches
//! the ledger until [`UnitOfWork::commit`] hands them to
//! [`LedgerStore::append_atomic`] in one call.
//!
//! Whatever way the unit ends (commit, early `?` return on a business rule,
//! a storage failure), dropping it discards anything still staged and
//! releases the locks.

use crate::core::locks::LockSet;
use crate::core::traits::LedgerStore;
use crate::types::{LedgerEntry, LedgerError, Transaction, TransactionId, SYSTEM_ACCOUNT};

#[derive(Debug)]
pub struct UnitOfWork<'a, L> {
    ledger: &'a L,
    locks: LockSet,
    staged: Option<(Transaction, Vec<LedgerEntry>)>,
}

impl<'a, L: LedgerStore> UnitOfWork<'a, L> {
    /// Start a unit of work under already acquired locks
    pub fn begin(ledger: &'a L, locks: LockSet) -> Self {
        Self {
            ledger,
            locks,
            staged: None,
        }
    }

    /// Stage a transaction and its entries for commit
    ///
    /// The entries must form a balanced pair for the transaction, and every
    /// real account they touch must be covered by this unit's locks.
    pub fn stage(
        &mut self,
        transaction: Transaction,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), LedgerError> {
        if self.staged.is_some() {
            return Err(LedgerError::storage_failure(
                "a transaction is already staged in this unit of work",
            ));
        }

        if !transaction.is_balanced_by(&entries) {
            return Err(LedgerError::storage_failure(format!(
                "transaction {} does not balance",
                transaction.id
            )));
        }

        if let Some(entry) = entries
            .iter()
            .find(|entry| entry.account_id != SYSTEM_ACCOUNT && !self.locks.covers(entry.account_id))
        {
            return Err(LedgerError::storage_failure(format!(
                "entry for account {} staged without holding its lock",
                entry.account_id
            )));
        }

        self.staged = Some((transaction, entries));
        Ok(())
    }

    /// Write the staged rows atomically and release the locks
    pub fn commit(mut self) -> Result<TransactionId, LedgerError> {
        let (transaction, entries) = self
            .staged
            .take()
            .ok_or_else(|| LedgerError::storage_failure("nothing staged to commit"))?;
        let tx_id = transaction.id;

        self.ledger.append_atomic(transaction, entries).map_err(|e| {
            tracing::error!(%tx_id, accounts = ?self.locks.accounts(), error = %e, "atomic append failed");
            e
        })?;

        Ok(tx_id)
    }
}

impl<L> Drop for UnitOfWork<'_, L> {
    fn drop(&mut self) {
        if let Some((transaction, _)) = self.staged.take() {
            tracing::debug!(tx_id = %transaction.id, "discarding uncommitted transaction");
        }
    }
}
