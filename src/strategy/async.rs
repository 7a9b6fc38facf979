//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It reads operations in batches and runs each
//! batch as a sequence of concurrent waves.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (wave scheduling + tokio tasks)
//!     └── TransactionProcessor (shared behind an Arc)
//!         ├── InMemoryAccountStore (DashMap)
//!         ├── InMemoryLedgerStore (RwLock, atomic appends)
//!         └── AccountLocks (per-account tokio mutexes)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed sequentially, so an account's operations keep
//!   their order across batch boundaries
//! - Within a batch, operations sharing an account run in input order
//! - Operations on disjoint accounts run in parallel on the worker threads

use crate::config::EngineConfig;
use crate::core::{BatchProcessor, InMemoryProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::strategy::{collect_balances, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how operations are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults, with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "invalid batch_size (0), using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches (0), using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of operations per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    engine: EngineConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, engine: EngineConfig) -> Self {
        Self { config, engine }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process operations from input file and write results to output
    ///
    /// 1. Creates a multi-threaded tokio runtime
    /// 2. Reads operations in batches from CSV using AsyncReader
    /// 3. Runs each batch through the BatchProcessor, waiting for it to
    ///    finish before reading the next
    /// 4. Writes every account's derived balance to output
    ///
    /// Fatal errors (file not found, I/O errors, runtime errors) are returned
    /// immediately. Rejected operations are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .enable_time()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let processor = Arc::new(InMemoryProcessor::in_memory(self.engine.clone()));
            let batches = BatchProcessor::new(Arc::clone(&processor));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads through the futures-io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut batch_count = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                batch_count += 1;
                let results = batches.process_batch(batch).await;
                tracing::debug!(
                    batch = batch_count,
                    committed = results.iter().filter(|r| r.result.is_ok()).count(),
                    total = results.len(),
                    "batch processed"
                );
            }

            let rows = collect_balances(&*processor).map_err(|e| e.to_string())?;
            write_balances_csv(&rows, output)?;

            Ok(())
        })
    }
}
