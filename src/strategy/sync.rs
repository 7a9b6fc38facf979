//! Sequential processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates processing by coordinating
//! between the SyncReader (for CSV input) and the TransactionProcessor (for
//! business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Ledger operations to `TransactionProcessor`
//! - CSV output to `csv_format::write_balances_csv`
//!
//! The processor's operations are async because lock acquisition is bounded
//! by a tokio timeout, so records are driven one at a time on a
//! current-thread runtime. Nothing ever contends for a lock here.
//!
//! # Memory Efficiency
//!
//! Records are streamed one at a time; the input file is never loaded
//! whole. The ledger itself grows with every committed operation.

use crate::config::EngineConfig;
use crate::core::InMemoryProcessor;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{collect_balances, ProcessingStrategy};
use std::io::Write;
use std::path::Path;

/// Sequential processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_engine::config::EngineConfig;
/// use ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(EngineConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    engine: EngineConfig,
}

impl SyncProcessingStrategy {
    pub fn new(engine: EngineConfig) -> Self {
        Self { engine }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process operations from input file and write results to output
    ///
    /// 1. Streams records from the CSV file with a SyncReader
    /// 2. Runs each record through a fresh in-memory TransactionProcessor,
    ///    waiting for it to finish before reading the next
    /// 3. Writes every account's derived balance to output
    ///
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Rejected operations are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let processor = InMemoryProcessor::in_memory(self.engine.clone());
        let reader = SyncReader::new(input_path)?;

        runtime.block_on(async {
            for result in reader {
                match result {
                    Ok(record) => {
                        if let Err(e) = processor.process(&record).await {
                            tracing::warn!(?record, error = %e, "operation rejected");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "skipping invalid CSV row"),
                }
            }
        });

        let rows = collect_balances(&processor).map_err(|e| e.to_string())?;
        write_balances_csv(&rows, output)?;

        Ok(())
    }
}
