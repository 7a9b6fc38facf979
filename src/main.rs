//! Ledger Engine CLI
//!
//! Command-line interface for replaying ledger operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --strategy sync operations.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 operations.csv > balances.csv
//! RUST_LOG=debug LEDGER_LOCK_TIMEOUT_MS=500 cargo run -- operations.csv
//! ```
//!
//! The program reads operation records from the input CSV file, runs them
//! through the transaction processor using the selected strategy, and writes
//! every account's derived balance to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, invalid currency code, unreadable input file)

use ledger_engine::{cli, logging, strategy};
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let engine_config = args.to_engine_config().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration");
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let strategy = {
        let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), batch_config, engine_config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
