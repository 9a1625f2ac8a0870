//! # bigfib-core
//!
//! Core library for the BigFib arbitrary-precision Fibonacci calculator.
//! Implements Fast Doubling, Matrix Exponentiation, and FFT-based engines
//! behind a common `Calculator` trait, with cooperative cancellation,
//! throttled progress reporting, and pooled scratch state.

pub mod calculator;
pub mod constants;
pub mod fastdoubling;
pub mod fft_based;
pub mod matrix;
pub(crate) mod matrix_types;
pub(crate) mod multiply;
pub mod observer;
pub mod observers;
pub mod options;
pub(crate) mod pool;
pub mod progress;
pub mod registry;

// Re-exports
pub use calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
pub use constants::{
    exit_codes, lookup_small, CALIBRATION_N, CALIBRATION_THRESHOLDS, DEFAULT_FFT_THRESHOLD,
    DEFAULT_PARALLEL_THRESHOLD, FIB_TABLE, MAX_FIB_U64, PROGRESS_REPORT_THRESHOLD,
};
pub use observer::{FrozenObserver, ProgressObserver};
pub use options::{available_workers, Options};
pub use progress::{CancellationToken, ProgressUpdate};
pub use registry::{CalculatorFactory, DefaultFactory};

use num_bigint::BigUint;

/// Compute F(n) using the fast doubling algorithm.
///
/// This is a convenience function for simple use cases. For advanced
/// configuration (progress, cancellation, thresholds), use the
/// `Calculator` trait directly.
///
/// # Example
/// ```
/// assert_eq!(bigfib_core::fibonacci(10).to_string(), "55");
/// assert_eq!(bigfib_core::fibonacci(0).to_string(), "0");
/// ```
#[must_use]
pub fn fibonacci(n: u64) -> BigUint {
    use calculator::Calculator;
    use fastdoubling::FastDoubling;
    use observers::NoOpObserver;
    use progress::CancellationToken;

    let calc = FibCalculator::new(std::sync::Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    calc.calculate(&cancel, &observer, 0, n, &opts)
        .expect("fast doubling should not fail with a fresh token and default options")
}
