//! Processing strategy module for batch ledger runs
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both CSV parsing and the transaction processor. This allows
//! different execution models (sequential, concurrent waves) to be selected
//! at runtime. Both produce identical balances for the same input.

use crate::cli::StrategyType;
use crate::config::EngineConfig;
use crate::core::{AccountStore, LedgerStore, TransactionProcessor};
use crate::io::BalanceRow;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete batch pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process operations from the input file and write final balances to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A fatal I/O error occurs during reading or writing
    /// - Output cannot be written
    ///
    /// Rejected operations and malformed rows are logged and skipped; they do
    /// not cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch_config` is only used by the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    engine_config: EngineConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine_config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            engine_config,
        )),
    }
}

/// Snapshot every known account as an output row
pub(crate) fn collect_balances<A: AccountStore, L: LedgerStore>(
    processor: &TransactionProcessor<A, L>,
) -> Result<Vec<BalanceRow>, LedgerError> {
    processor
        .account_store()
        .account_ids()
        .into_iter()
        .map(|id| {
            let summary = processor.account_summary(id)?;
            let entries = processor.ledger(id)?.len();
            Ok(BalanceRow {
                account: id,
                currency: summary.account.currency,
                balance: summary.balance,
                entries,
            })
        })
        .collect()
}
