//! Engine configuration
//!
//! Batch settings for the async strategy live next to that strategy in
//! [`crate::strategy::BatchConfig`]; this module holds the settings of the
//! transaction processor itself.

use std::time::Duration;

/// Default bound on how long an operation waits for its account locks
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default currency for accounts opened from batch input
pub const DEFAULT_CURRENCY: &str = "USD";

/// Largest number of fractional digits an amount may carry
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Settings for [`crate::core::TransactionProcessor`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long one operation may wait to acquire all of its account locks
    pub lock_timeout: Duration,

    /// Currency of accounts opened through [`crate::types::OperationType::Open`]
    pub default_currency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Override the lock wait bound
    ///
    /// A zero timeout falls back to the default, with a warning.
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        if lock_timeout.is_zero() {
            tracing::warn!(
                default_ms = DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
                "invalid lock timeout (0ms), using default"
            );
            self.lock_timeout = DEFAULT_LOCK_TIMEOUT;
        } else {
            self.lock_timeout = lock_timeout;
        }
        self
    }

    /// Override the currency used when batch input opens an account
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into().to_uppercase();
        self
    }
}
