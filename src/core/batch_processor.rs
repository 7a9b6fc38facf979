//! Wave-scheduled batch processing
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! operations concurrently on the tokio runtime while keeping the outcome
//! identical to running them one by one in input order.
//!
//! # Design
//!
//! A batch is split into waves. An operation's wave is one past the latest
//! wave of any earlier operation in the batch that touches one of its
//! accounts, so:
//! - operations within a wave touch pairwise disjoint accounts and can run
//!   in parallel without contending for locks
//! - operations on the same account keep their input order across waves
//!
//! Transfers touch two accounts, which is why this is a wave schedule rather
//! than a simple partition by account.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::processor::TransactionProcessor;
use crate::core::traits::{AccountStore, LedgerStore};
use crate::types::{AccountId, LedgerError, OperationRecord, TransactionId};

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was processed
    pub record: OperationRecord,

    /// Committed transaction id (`None` for `open`), or the failure
    pub result: Result<Option<TransactionId>, LedgerError>,
}

/// Batch processor with wave scheduling
#[derive(Debug)]
pub struct BatchProcessor<A, L> {
    processor: Arc<TransactionProcessor<A, L>>,
}

impl<A, L> Clone for BatchProcessor<A, L> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<A, L> BatchProcessor<A, L>
where
    A: AccountStore + 'static,
    L: LedgerStore + 'static,
{
    pub fn new(processor: Arc<TransactionProcessor<A, L>>) -> Self {
        Self { processor }
    }

    /// Run every operation of one wave concurrently
    ///
    /// Results are returned in the wave's input order.
    pub async fn process_wave(&self, wave: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let tasks: Vec<_> = wave
            .into_iter()
            .map(|record| {
                let processor = Arc::clone(&self.processor);
                tokio::spawn(async move {
                    let result = processor.process(&record).await;
                    ProcessingResult { record, result }
                })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(outcome) => {
                    if let Err(e) = &outcome.result {
                        tracing::warn!(record = ?outcome.record, error = %e, "operation rejected");
                    }
                    results.push(outcome);
                }
                Err(e) => tracing::error!(error = ?e, "operation task panicked"),
            }
        }

        results
    }

    /// Process a batch wave by wave
    ///
    /// Each wave completes before the next one starts.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());

        for wave in schedule_waves(batch) {
            results.extend(self.process_wave(wave).await);
        }

        results
    }
}

/// Split a batch into waves of operations on disjoint accounts
///
/// Every operation appears in exactly one wave. Operations sharing an account
/// land in strictly increasing waves, in input order.
pub fn schedule_waves(batch: Vec<OperationRecord>) -> Vec<Vec<OperationRecord>> {
    let mut last_wave: HashMap<AccountId, usize> = HashMap::new();
    let mut waves: Vec<Vec<OperationRecord>> = Vec::new();

    for record in batch {
        let accounts = record.touched_accounts();
        let wave = accounts
            .iter()
            .filter_map(|account| last_wave.get(account))
            .map(|&previous| previous + 1)
            .max()
            .unwrap_or(0);

        for account in accounts {
            last_wave.insert(account, wave);
        }
        if waves.len() <= wave {
            waves.resize_with(wave + 1, Vec::new);
        }
        waves[wave].push(record);
    }

    waves
}
