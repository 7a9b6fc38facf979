//! CSV format handling for operation records and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{AccountId, OperationRecord, OperationType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, to, amount.
/// `to` is only used by transfers and `amount` is absent for `open`, so both
/// may be empty or missing entirely.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op: String,
    pub account: AccountId,
    #[serde(default)]
    pub to: Option<AccountId>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// One output row: an account and its derived balance
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub account: AccountId,
    pub currency: String,
    pub balance: Decimal,
    /// Number of ledger entries the balance was folded from
    pub entries: usize,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation string (case-insensitive, `withdrawal` is accepted
///   as an alias of `withdraw`)
/// - Parses the amount string into a Decimal (if present)
/// - Validates that amounts are present for deposit, withdraw and transfer
/// - Validates that transfers name a destination account
///
/// Amount sign and precision are left to the processor, which rejects them
/// with a typed validation error.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let op = match csv_record.op.to_lowercase().as_str() {
        "open" => OperationType::Open,
        "deposit" => OperationType::Deposit,
        "withdraw" | "withdrawal" => OperationType::Withdraw,
        "transfer" => OperationType::Transfer,
        _ => {
            return Err(format!(
                "Invalid operation type: '{}' for account {}",
                csv_record.op, csv_record.account
            ))
        }
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match Decimal::from_str(amount_str.trim()) {
                Ok(decimal) => Some(decimal),
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for account {}",
                        amount_str, csv_record.account
                    ))
                }
            }
        }
        _ => None,
    };

    match op {
        OperationType::Deposit | OperationType::Withdraw | OperationType::Transfer => {
            if amount.is_none() {
                return Err(format!(
                    "{:?} on account {} requires an amount",
                    op, csv_record.account
                ));
            }
        }
        // Any amount given with `open` is ignored
        OperationType::Open => {}
    }

    if op == OperationType::Transfer && csv_record.to.is_none() {
        return Err(format!(
            "Transfer from account {} requires a destination account",
            csv_record.account
        ));
    }

    Ok(OperationRecord {
        op,
        account: csv_record.account,
        to: if op == OperationType::Transfer {
            csv_record.to
        } else {
            None
        },
        amount: if op == OperationType::Open { None } else { amount },
    })
}

/// Write account balances in CSV format
///
/// Writes columns: account, currency, balance, entries.
/// Rows are sorted by account id for deterministic output and balances are
/// printed with four decimal places.
pub fn write_balances_csv(rows: &[BalanceRow], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "currency", "balance", "entries"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_rows = rows.to_vec();
    sorted_rows.sort_by_key(|row| row.account);

    for row in sorted_rows {
        writer
            .write_record(&[
                row.account.to_string(),
                row.currency,
                format!("{:.4}", row.balance),
                row.entries.to_string(),
            ])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
