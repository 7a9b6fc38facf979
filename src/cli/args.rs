use crate::config::{EngineConfig, DEFAULT_CURRENCY};
use crate::strategy::BatchConfig;
use crate::types::is_valid_currency;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay deposits, withdrawals and transfers through a double-entry ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Replay ledger operations and print derived account balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of operations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Bound on how long an operation waits for its account locks
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MS",
        env = "LEDGER_LOCK_TIMEOUT_MS",
        help = "Milliseconds an operation may wait for account locks (default: 5000)"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Currency of accounts opened from the input
    #[arg(
        long = "currency",
        value_name = "CODE",
        env = "LEDGER_DEFAULT_CURRENCY",
        default_value = DEFAULT_CURRENCY,
        help = "ISO currency code for opened accounts"
    )]
    pub currency: String,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values fall back to the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the processor settings from CLI arguments
    ///
    /// Fails on a currency code every `open` would reject.
    pub fn to_engine_config(&self) -> Result<EngineConfig, String> {
        if !is_valid_currency(&self.currency) {
            return Err(format!(
                "Invalid currency code '{}': expected three ASCII letters",
                self.currency
            ));
        }

        let config = EngineConfig::default().with_default_currency(self.currency.as_str());
        Ok(match self.lock_timeout_ms {
            Some(ms) => config.with_lock_timeout(Duration::from_millis(ms)),
            None => config,
        })
    }
}
