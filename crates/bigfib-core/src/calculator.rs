//! Calculator traits and the `FibCalculator` decorator.
//!
//! `Calculator` is the public trait consumed by orchestration.
//! `CoreCalculator` is the internal trait implemented by the engines.
//! `FibCalculator` decorates a core engine with the small-n fast path,
//! the pre-flight cancellation check, and the terminal progress update.

use std::sync::Arc;

use num_bigint::BigUint;

use crate::constants::{exit_codes, lookup_small};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::{CancellationToken, ProgressUpdate};

/// Error type for Fibonacci calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// A calculation error occurred.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Calculation was cancelled.
    #[error("calculation cancelled")]
    Cancelled,

    /// Calculation timed out.
    #[error("calculation timed out after {0}")]
    Timeout(String),

    /// Results from different algorithms don't match.
    #[error("result mismatch between algorithms")]
    Mismatch,
}

impl FibError {
    /// Whether this error stems from cancellation, manual or by deadline.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout(_))
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Calculation(_) => exit_codes::ERROR_GENERIC,
            Self::Config(_) => exit_codes::ERROR_CONFIG,
            Self::Cancelled => exit_codes::ERROR_CANCELED,
            Self::Timeout(_) => exit_codes::ERROR_TIMEOUT,
            Self::Mismatch => exit_codes::ERROR_MISMATCH,
        }
    }
}

/// Public trait for Fibonacci calculators, consumed by orchestration.
pub trait Calculator: Send + Sync {
    /// Calculate F(n) with the given options.
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError>;

    /// Get the name of this calculator. Names are static so progress
    /// updates can carry them without borrowing the calculator.
    fn name(&self) -> &'static str;
}

/// Internal trait for algorithm implementations.
/// Wrapped by `FibCalculator` which adds the fast path and terminal report.
pub trait CoreCalculator: Send + Sync {
    /// Perform the core calculation for large n.
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError>;

    /// Get the name of this algorithm.
    fn name(&self) -> &'static str;
}

/// Decorator that wraps a `CoreCalculator`.
pub struct FibCalculator {
    inner: Arc<dyn CoreCalculator>,
}

impl FibCalculator {
    /// Create a new `FibCalculator` wrapping the given core calculator.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreCalculator>) -> Self {
        Self { inner }
    }
}

impl Calculator for FibCalculator {
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        // Fast path for small n, no engine involved
        if let Some(value) = lookup_small(n) {
            observer.on_progress(&ProgressUpdate::done(calc_index, self.inner.name()));
            return Ok(value);
        }

        cancel.check_cancelled()?;

        let result = self
            .inner
            .calculate_core(cancel, observer, calc_index, n, opts)?;

        // Single terminal update per successful run; engines only emit
        // fractional updates.
        observer.on_progress(&ProgressUpdate::done(calc_index, self.inner.name()));
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
