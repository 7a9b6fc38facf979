//! Transaction and ledger entry types for the ledger engine
//!
//! A committed transaction is always stored together with exactly two
//! ledger entries: one credit and one debit of the same amount. Neither
//! transactions nor entries are ever updated or removed once committed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::account::AccountId;

/// Transaction identifier
pub type TransactionId = Uuid;

/// Ledger entry identifier
pub type EntryId = Uuid;

/// Kinds of value movement the engine commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Funds enter an account from the system account
    Deposit,

    /// Funds leave an account to the system account
    Withdraw,

    /// Funds move between two real accounts
    Transfer,
}

/// Direction of a ledger entry
///
/// Credits increase an account's balance, debits decrease it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Credit,
    Debit,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of one committed value movement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub tx_type: TransactionType,

    /// Account the funds leave (withdraw, transfer)
    pub source: Option<AccountId>,

    /// Account the funds enter (deposit, transfer)
    pub destination: Option<AccountId>,

    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction with a fresh id, stamped now
    pub fn new(
        tx_type: TransactionType,
        source: Option<AccountId>,
        destination: Option<AccountId>,
        amount: Decimal,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            tx_type,
            source,
            destination,
            amount,
            created_at: Utc::now(),
        }
    }

    /// Build the credit leg of this transaction for `account_id`
    pub fn credit(&self, account_id: AccountId) -> LedgerEntry {
        LedgerEntry::new(self, account_id, EntryKind::Credit)
    }

    /// Build the debit leg of this transaction for `account_id`
    pub fn debit(&self, account_id: AccountId) -> LedgerEntry {
        LedgerEntry::new(self, account_id, EntryKind::Debit)
    }

    /// Check that `entries` form a valid double-entry pair for this transaction
    ///
    /// Holds when there are exactly two entries, both owned by this
    /// transaction, one credit and one debit, each for the transaction amount.
    pub fn is_balanced_by(&self, entries: &[LedgerEntry]) -> bool {
        let [first, second] = entries else {
            return false;
        };

        let owned = first.transaction_id == self.id && second.transaction_id == self.id;
        let opposite = first.kind != second.kind;
        let amounts = first.amount == self.amount && second.amount == self.amount;

        owned && opposite && amounts && self.amount > Decimal::ZERO
    }
}

/// One credit or debit against a single account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub kind: EntryKind,

    /// Always positive; the direction is carried by `kind`
    pub amount: Decimal,

    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    fn new(transaction: &Transaction, account_id: AccountId, kind: EntryKind) -> Self {
        LedgerEntry {
            id: Uuid::new_v4(),
            transaction_id: transaction.id,
            account_id,
            kind,
            amount: transaction.amount,
            created_at: transaction.created_at,
        }
    }

    /// Amount signed by direction (positive for credit, negative for debit)
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Credit => self.amount,
            EntryKind::Debit => -self.amount,
        }
    }
}

/// Operations accepted by the engine's batch input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Open a new account
    Open,
    Deposit,
    Withdraw,
    Transfer,
}

/// Input operation record from CSV
///
/// `to` is only meaningful for transfers. `amount` is required for every
/// operation except `open`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub op: OperationType,
    pub account: AccountId,
    pub to: Option<AccountId>,
    pub amount: Option<Decimal>,
}

impl OperationRecord {
    /// Every account this operation reads or writes
    pub fn touched_accounts(&self) -> Vec<AccountId> {
        match (self.op, self.to) {
            (OperationType::Transfer, Some(to)) => vec![self.account, to],
            _ => vec![self.account],
        }
    }
}
