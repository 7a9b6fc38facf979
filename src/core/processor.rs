//! Transaction processing orchestration
//!
//! This module provides the `TransactionProcessor` struct, which runs deposits,
//! withdrawals and transfers as atomic units of work against injected account
//! and ledger stores.
//!
//! # Architecture
//!
//! ```text
//! TransactionProcessor
//!     ├── Arc<A: AccountStore>     (account metadata)
//!     ├── Arc<L: LedgerStore>      (append-only ledger, atomic writes)
//!     ├── BalanceCalculator<L>     (balances folded from entries)
//!     └── AccountLocks             (per-account serialization)
//! ```
//!
//! # Operation Lifecycle
//!
//! Each operation moves through Initiated → Validating → Committed | Aborted:
//! 1. Input checks (amount, reserved ids, account existence) run first and
//!    fail without taking any lock.
//! 2. Account locks are acquired in ascending id order, bounded by the
//!    configured timeout.
//! 3. Balances are read and business rules checked under the locks.
//! 4. The transaction and its two entries are committed in one atomic write.
//!
//! Aborted operations write nothing. Locks are released when the operation's
//! [`UnitOfWork`] is dropped, on every path.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::{EngineConfig, MAX_AMOUNT_SCALE};
use crate::core::balance::BalanceCalculator;
use crate::core::locks::AccountLocks;
use crate::core::traits::{AccountStore, LedgerStore};
use crate::core::unit_of_work::UnitOfWork;
use crate::types::{
    is_valid_currency, Account, AccountId, AccountSummary, AccountType, LedgerEntry, LedgerError,
    OperationRecord, OperationType, Transaction, TransactionId, TransactionType, SYSTEM_ACCOUNT,
};

/// Double-entry transaction engine
///
/// Safe to share across tasks behind an `Arc`; all mutation goes through the
/// stores and the lock table.
#[derive(Debug)]
pub struct TransactionProcessor<A, L> {
    accounts: Arc<A>,
    ledger: Arc<L>,
    balances: BalanceCalculator<L>,
    locks: AccountLocks,
    config: EngineConfig,
}

impl<A: AccountStore, L: LedgerStore> TransactionProcessor<A, L> {
    /// Create a processor over the given stores
    pub fn new(accounts: Arc<A>, ledger: Arc<L>, config: EngineConfig) -> Self {
        Self {
            balances: BalanceCalculator::new(Arc::clone(&ledger)),
            locks: AccountLocks::new(config.lock_timeout),
            accounts,
            ledger,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn account_store(&self) -> &A {
        &self.accounts
    }

    pub fn ledger_store(&self) -> &L {
        &self.ledger
    }

    /// The lock table guarding balance-mutating operations
    pub fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// Open a new account
    pub fn open_account(
        &self,
        id: AccountId,
        account_type: AccountType,
        currency: &str,
        user_ref: Option<String>,
    ) -> Result<Account, LedgerError> {
        reject_system_account(id)?;
        if !is_valid_currency(currency) {
            return Err(LedgerError::validation(format!(
                "invalid currency code '{}'",
                currency
            )));
        }

        let mut account = Account::new(id, account_type, currency.to_uppercase());
        account.user_ref = user_ref;
        self.accounts.insert_account(account.clone())?;

        tracing::debug!(account = id, currency = %account.currency, "account opened");
        Ok(account)
    }

    /// Account metadata together with its current balance
    pub fn account_summary(&self, id: AccountId) -> Result<AccountSummary, LedgerError> {
        let account = self.require_account(id)?;
        let balance = self.balances.get_balance(id)?;
        Ok(AccountSummary { account, balance })
    }

    /// Current balance of an account
    ///
    /// Reads without locking; appends are atomic, so the value always
    /// reflects a whole number of committed transactions.
    pub fn balance(&self, id: AccountId) -> Result<Decimal, LedgerError> {
        self.require_account(id)?;
        self.balances.get_balance(id)
    }

    /// Ledger entries of an account, oldest first
    pub fn ledger(&self, id: AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        self.require_account(id)?;
        self.ledger.get_entries(id)
    }

    /// Credit `amount` to an account from the system account
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        validate_amount(amount)?;
        self.require_account(account_id)?;

        let mut unit = UnitOfWork::begin(
            self.ledger.as_ref(),
            self.locks.acquire(&[account_id]).await?,
        );

        self.ensure_capacity(account_id, amount)?;

        let tx = Transaction::new(TransactionType::Deposit, None, Some(account_id), amount);
        let entries = vec![tx.credit(account_id), tx.debit(SYSTEM_ACCOUNT)];
        unit.stage(tx, entries)?;

        let tx_id = unit.commit()?;
        tracing::debug!(%tx_id, "deposit committed");
        Ok(tx_id)
    }

    /// Debit `amount` from an account to the system account
    ///
    /// Fails with `InsufficientFunds` when the balance, read under the
    /// account's lock, is lower than `amount`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        validate_amount(amount)?;
        self.require_account(account_id)?;

        let mut unit = UnitOfWork::begin(
            self.ledger.as_ref(),
            self.locks.acquire(&[account_id]).await?,
        );

        self.ensure_funds(account_id, amount)?;

        let tx = Transaction::new(TransactionType::Withdraw, Some(account_id), None, amount);
        let entries = vec![tx.debit(account_id), tx.credit(SYSTEM_ACCOUNT)];
        unit.stage(tx, entries)?;

        let tx_id = unit.commit()?;
        tracing::debug!(%tx_id, "withdrawal committed");
        Ok(tx_id)
    }

    /// Move `amount` from one account to another
    ///
    /// Both accounts are locked in ascending id order before the source
    /// balance is read.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn transfer(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        validate_amount(amount)?;
        if from_id == to_id {
            return Err(LedgerError::same_account_transfer(from_id));
        }
        let from = self.require_account(from_id)?;
        let to = self.require_account(to_id)?;
        if from.currency != to.currency {
            return Err(LedgerError::CurrencyMismatch {
                from: from_id,
                to: to_id,
                from_currency: from.currency,
                to_currency: to.currency,
            });
        }

        let mut unit = UnitOfWork::begin(
            self.ledger.as_ref(),
            self.locks.acquire(&[from_id, to_id]).await?,
        );

        self.ensure_funds(from_id, amount)?;
        self.ensure_capacity(to_id, amount)?;

        let tx = Transaction::new(TransactionType::Transfer, Some(from_id), Some(to_id), amount);
        let entries = vec![tx.debit(from_id), tx.credit(to_id)];
        unit.stage(tx, entries)?;

        let tx_id = unit.commit()?;
        tracing::debug!(%tx_id, "transfer committed");
        Ok(tx_id)
    }

    /// Run one batch input record
    ///
    /// Returns the committed transaction id, or `None` for `open`.
    pub async fn process(
        &self,
        record: &OperationRecord,
    ) -> Result<Option<TransactionId>, LedgerError> {
        match record.op {
            OperationType::Open => {
                self.open_account(
                    record.account,
                    AccountType::Checking,
                    &self.config.default_currency,
                    None,
                )?;
                Ok(None)
            }
            OperationType::Deposit => self
                .deposit(record.account, required_amount(record)?)
                .await
                .map(Some),
            OperationType::Withdraw => self
                .withdraw(record.account, required_amount(record)?)
                .await
                .map(Some),
            OperationType::Transfer => {
                let to = record.to.ok_or_else(|| {
                    LedgerError::validation("transfer requires a destination account")
                })?;
                self.transfer(record.account, to, required_amount(record)?)
                    .await
                    .map(Some)
            }
        }
    }

    fn require_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        reject_system_account(id)?;
        self.accounts
            .get_account(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Must only be called while holding `account_id`'s lock
    fn ensure_funds(&self, account_id: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        let available = self.balances.get_balance(account_id)?;
        if available < amount {
            tracing::warn!(
                account = account_id,
                %available,
                requested = %amount,
                "insufficient funds, aborting"
            );
            return Err(LedgerError::insufficient_funds(account_id, available, amount));
        }
        Ok(())
    }

    /// Must only be called while holding `account_id`'s lock
    ///
    /// A committed credit that overflowed would leave the account's balance
    /// unreadable, so it is rejected before anything is staged.
    fn ensure_capacity(&self, account_id: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        let current = self.balances.get_balance(account_id)?;
        if current.checked_add(amount).is_none() {
            tracing::warn!(
                account = account_id,
                %current,
                credit = %amount,
                "credit would overflow balance, aborting"
            );
            return Err(LedgerError::arithmetic_overflow(account_id));
        }
        Ok(())
    }
}

/// Amounts must be positive with at most [`MAX_AMOUNT_SCALE`] fractional digits
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(LedgerError::validation(format!(
            "amount {} has more than {} decimal places",
            amount, MAX_AMOUNT_SCALE
        )));
    }
    Ok(())
}

fn reject_system_account(id: AccountId) -> Result<(), LedgerError> {
    if id == SYSTEM_ACCOUNT {
        return Err(LedgerError::validation(format!(
            "account id {} is reserved for the system account",
            SYSTEM_ACCOUNT
        )));
    }
    Ok(())
}

fn required_amount(record: &OperationRecord) -> Result<Decimal, LedgerError> {
    record.amount.ok_or_else(|| {
        LedgerError::validation(format!(
            "{:?} on account {} requires an amount",
            record.op, record.account
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_store::InMemoryAccountStore;
    use crate::core::ledger_store::InMemoryLedgerStore;
    use crate::types::{EntryKind, TransactionId};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Processor = TransactionProcessor<InMemoryAccountStore, InMemoryLedgerStore>;

    fn processor_with_accounts(ids: &[AccountId]) -> Processor {
        let processor = TransactionProcessor::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryLedgerStore::new()),
            EngineConfig::default().with_lock_timeout(Duration::from_millis(50)),
        );
        for &id in ids {
            processor
                .open_account(id, AccountType::Checking, "USD", None)
                .unwrap();
        }
        processor
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    /// Ledger store whose next `n` appends fail, then recovers
    #[derive(Debug, Default)]
    struct FlakyLedger {
        inner: InMemoryLedgerStore,
        failures: AtomicUsize,
    }

    impl FlakyLedger {
        fn fail_next(&self, times: usize) {
            self.failures.store(times, Ordering::SeqCst);
        }
    }

    impl LedgerStore for FlakyLedger {
        fn append_atomic(
            &self,
            transaction: Transaction,
            entries: Vec<LedgerEntry>,
        ) -> Result<(), LedgerError> {
            let should_fail = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(LedgerError::storage_failure("disk unavailable"));
            }
            self.inner.append_atomic(transaction, entries)
        }

        fn get_entries(&self, account_id: AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
            self.inner.get_entries(account_id)
        }

        fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
            self.inner.get_transaction(id)
        }

        fn entries_for_transaction(
            &self,
            id: TransactionId,
        ) -> Result<Vec<LedgerEntry>, LedgerError> {
            self.inner.entries_for_transaction(id)
        }
    }

    #[tokio::test]
    async fn test_deposit_writes_credit_and_system_debit() {
        let processor = processor_with_accounts(&[1]);

        let tx_id = processor.deposit(1, dec(100)).await.unwrap();

        assert_eq!(processor.balance(1).unwrap(), dec(100));
        let entries = processor.ledger_store().entries_for_transaction(tx_id).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.account_id == 1 && e.kind == EntryKind::Credit && e.amount == dec(100)));
        assert!(entries.iter().any(|e| e.account_id == SYSTEM_ACCOUNT
            && e.kind == EntryKind::Debit
            && e.amount == dec(100)));

        let tx = processor.ledger_store().get_transaction(tx_id).unwrap().unwrap();
        assert_eq!(tx.tx_type, TransactionType::Deposit);
        assert_eq!(tx.source, None);
        assert_eq!(tx.destination, Some(1));
    }

    #[tokio::test]
    async fn test_scenario_deposit_withdraw_transfer() {
        let processor = processor_with_accounts(&[1, 2]);

        processor.deposit(1, dec(100)).await.unwrap();
        assert_eq!(processor.balance(1).unwrap(), dec(100));

        processor.withdraw(1, dec(40)).await.unwrap();
        assert_eq!(processor.balance(1).unwrap(), dec(60));

        processor.transfer(1, 2, dec(60)).await.unwrap();
        assert_eq!(processor.balance(1).unwrap(), Decimal::ZERO);
        assert_eq!(processor.balance(2).unwrap(), dec(60));

        let result = processor.withdraw(1, dec(1)).await;
        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(1, Decimal::ZERO, dec(1)))
        );
        assert_eq!(processor.balance(1).unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_withdraw_insufficient_funds_writes_nothing() {
        let processor = processor_with_accounts(&[1]);
        processor.deposit(1, dec(10)).await.unwrap();
        let entries_before = processor.ledger(1).unwrap();

        let result = processor.withdraw(1, dec(11)).await;

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(processor.ledger(1).unwrap(), entries_before);
        assert_eq!(processor.balance(1).unwrap(), dec(10));
        assert_eq!(processor.ledger_store().transaction_count().unwrap(), 1);
        assert!(!processor.locks().is_locked(1));
    }

    #[tokio::test]
    async fn test_withdraw_exact_balance_succeeds() {
        let processor = processor_with_accounts(&[1]);
        processor.deposit(1, dec(25)).await.unwrap();

        processor.withdraw(1, dec(25)).await.unwrap();

        assert_eq!(processor.balance(1).unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(dec(-5))]
    #[case::too_precise(Decimal::new(1_00001, 5))]
    #[tokio::test]
    async fn test_invalid_amount_rejected_without_lock(#[case] amount: Decimal) {
        let processor = processor_with_accounts(&[1, 2]);
        let _held = processor.locks().acquire(&[1]).await.unwrap();

        // Validation fails immediately even though account 1 is locked
        assert!(matches!(
            processor.deposit(1, amount).await,
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            processor.withdraw(1, amount).await,
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            processor.transfer(1, 2, amount).await,
            Err(LedgerError::Validation { .. })
        ));
    }

    #[rstest]
    #[case::four_places(Decimal::new(1_2345, 4))]
    #[case::trailing_zeros(Decimal::new(1_500000, 6))]
    #[case::whole(dec(3))]
    fn test_validate_amount_accepts(#[case] amount: Decimal) {
        assert!(validate_amount(amount).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let processor = processor_with_accounts(&[1]);

        assert_eq!(
            processor.deposit(9, dec(1)).await,
            Err(LedgerError::account_not_found(9))
        );
        assert_eq!(
            processor.transfer(1, 9, dec(1)).await,
            Err(LedgerError::account_not_found(9))
        );
        assert_eq!(processor.balance(9), Err(LedgerError::account_not_found(9)));
    }

    #[tokio::test]
    async fn test_system_account_not_addressable() {
        let processor = processor_with_accounts(&[1]);
        processor.deposit(1, dec(5)).await.unwrap();

        assert!(matches!(
            processor.deposit(SYSTEM_ACCOUNT, dec(1)).await,
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            processor.transfer(1, SYSTEM_ACCOUNT, dec(1)).await,
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            processor.balance(SYSTEM_ACCOUNT),
            Err(LedgerError::Validation { .. })
        ));
        assert!(matches!(
            processor.open_account(SYSTEM_ACCOUNT, AccountType::Checking, "USD", None),
            Err(LedgerError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_same_account_transfer() {
        let processor = processor_with_accounts(&[1]);
        processor.deposit(1, dec(5)).await.unwrap();

        assert_eq!(
            processor.transfer(1, 1, dec(1)).await,
            Err(LedgerError::same_account_transfer(1))
        );
        assert_eq!(processor.balance(1).unwrap(), dec(5));
    }

    #[tokio::test]
    async fn test_transfer_currency_mismatch() {
        let processor = processor_with_accounts(&[1]);
        processor
            .open_account(2, AccountType::Savings, "EUR", None)
            .unwrap();
        processor.deposit(1, dec(5)).await.unwrap();

        let result = processor.transfer(1, 2, dec(1)).await;

        assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));
        assert_eq!(processor.balance(1).unwrap(), dec(5));
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_writes_nothing() {
        let processor = processor_with_accounts(&[1, 2]);
        processor.deposit(1, dec(5)).await.unwrap();

        let result = processor.transfer(1, 2, dec(6)).await;

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(processor.balance(1).unwrap(), dec(5));
        assert_eq!(processor.balance(2).unwrap(), Decimal::ZERO);
        assert!(processor.ledger(2).unwrap().is_empty());
        assert!(!processor.locks().is_locked(1));
        assert!(!processor.locks().is_locked(2));
    }

    #[tokio::test]
    async fn test_timeout_when_account_locked() {
        let processor = processor_with_accounts(&[1, 2]);
        processor.deposit(1, dec(5)).await.unwrap();
        let held = processor.locks().acquire(&[2]).await.unwrap();

        let result = processor.transfer(1, 2, dec(1)).await;

        assert_eq!(result, Err(LedgerError::concurrency_timeout(&[1, 2], 50)));
        assert!(result.unwrap_err().is_retryable());
        assert!(!processor.locks().is_locked(1));

        drop(held);
        processor.transfer(1, 2, dec(1)).await.unwrap();
        assert_eq!(processor.balance(2).unwrap(), dec(1));
    }

    fn flaky_processor(ids: &[AccountId]) -> TransactionProcessor<InMemoryAccountStore, FlakyLedger> {
        let processor = TransactionProcessor::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(FlakyLedger::default()),
            EngineConfig::default(),
        );
        for &id in ids {
            processor
                .open_account(id, AccountType::Checking, "USD", None)
                .unwrap();
        }
        processor
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back_and_releases() {
        let processor = flaky_processor(&[1]);
        processor.ledger_store().fail_next(1);

        let result = processor.deposit(1, dec(10)).await;

        assert!(matches!(result, Err(LedgerError::StorageFailure { .. })));
        assert_eq!(processor.balance(1).unwrap(), Decimal::ZERO);
        assert!(processor.ledger(1).unwrap().is_empty());
        assert!(!processor.locks().is_locked(1));

        processor.deposit(1, dec(10)).await.unwrap();
        assert_eq!(processor.balance(1).unwrap(), dec(10));
    }

    #[tokio::test]
    async fn test_transfer_storage_failure_leaves_both_ledgers_untouched() {
        let processor = flaky_processor(&[1, 2]);
        processor.deposit(1, dec(10)).await.unwrap();
        processor.ledger_store().fail_next(1);

        let result = processor.transfer(1, 2, dec(4)).await;

        assert!(matches!(result, Err(LedgerError::StorageFailure { .. })));
        assert_eq!(processor.balance(1).unwrap(), dec(10));
        assert_eq!(processor.balance(2).unwrap(), Decimal::ZERO);
        assert_eq!(processor.ledger(1).unwrap().len(), 1);
        assert!(processor.ledger(2).unwrap().is_empty());
        assert!(!processor.locks().is_locked(1));
        assert!(!processor.locks().is_locked(2));

        processor.transfer(1, 2, dec(4)).await.unwrap();
        assert_eq!(processor.balance(1).unwrap(), dec(6));
        assert_eq!(processor.balance(2).unwrap(), dec(4));
    }

    #[tokio::test]
    async fn test_deposit_that_would_overflow_is_rejected() {
        let processor = processor_with_accounts(&[1]);
        let half = Decimal::from_str_exact("50000000000000000000000000000").unwrap();

        processor.deposit(1, half).await.unwrap();
        let result = processor.deposit(1, half).await;

        assert_eq!(result, Err(LedgerError::arithmetic_overflow(1)));
        assert_eq!(processor.balance(1).unwrap(), half);
        assert_eq!(processor.ledger(1).unwrap().len(), 1);
        assert!(!processor.locks().is_locked(1));
        processor.withdraw(1, dec(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_transfer_that_would_overflow_destination_is_rejected() {
        let processor = processor_with_accounts(&[1, 2]);
        let half = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        processor.deposit(1, half).await.unwrap();
        processor.deposit(2, half).await.unwrap();

        let result = processor.transfer(1, 2, half).await;

        assert_eq!(result, Err(LedgerError::arithmetic_overflow(2)));
        assert_eq!(processor.balance(1).unwrap(), half);
        assert_eq!(processor.balance(2).unwrap(), half);
        assert!(!processor.locks().is_locked(1));
        assert!(!processor.locks().is_locked(2));
    }

    #[tokio::test]
    async fn test_open_account_validation() {
        let processor = processor_with_accounts(&[1]);

        assert_eq!(
            processor.open_account(1, AccountType::Checking, "USD", None),
            Err(LedgerError::duplicate_account(1))
        );
        assert!(matches!(
            processor.open_account(2, AccountType::Checking, "DOLLARS", None),
            Err(LedgerError::Validation { .. })
        ));

        let account = processor
            .open_account(3, AccountType::Business, "gbp", Some("user-3".to_string()))
            .unwrap();
        assert_eq!(account.currency, "GBP");
        assert_eq!(account.user_ref.as_deref(), Some("user-3"));
    }

    #[tokio::test]
    async fn test_account_summary() {
        let processor = processor_with_accounts(&[1]);
        processor.deposit(1, Decimal::new(12_5000, 4)).await.unwrap();

        let summary = processor.account_summary(1).unwrap();

        assert_eq!(summary.account.id, 1);
        assert_eq!(summary.balance, Decimal::new(12_5000, 4));
    }

    #[rstest]
    #[case::open(OperationType::Open, 5, None, None, true)]
    #[case::deposit(OperationType::Deposit, 1, None, Some(dec(10)), true)]
    #[case::deposit_missing_amount(OperationType::Deposit, 1, None, None, false)]
    #[case::transfer_missing_target(OperationType::Transfer, 1, None, Some(dec(1)), false)]
    #[case::transfer(OperationType::Transfer, 1, Some(2), Some(dec(1)), true)]
    #[tokio::test]
    async fn test_process_dispatch(
        #[case] op: OperationType,
        #[case] account: AccountId,
        #[case] to: Option<AccountId>,
        #[case] amount: Option<Decimal>,
        #[case] succeeds: bool,
    ) {
        let processor = processor_with_accounts(&[1, 2]);
        processor.deposit(1, dec(10)).await.unwrap();

        let record = OperationRecord {
            op,
            account,
            to,
            amount,
        };
        let result = processor.process(&record).await;

        assert_eq!(result.is_ok(), succeeds, "unexpected result {:?}", result);
        if op == OperationType::Open && succeeds {
            assert_eq!(result.unwrap(), None);
            assert_eq!(
                processor.account_store().get_account(account).unwrap().currency,
                "USD"
            );
        }
    }
}
