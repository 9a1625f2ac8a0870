//! Thresholds, lookup tables, and process-level constants.

use num_bigint::BigUint;

/// Default threshold (in bits) for parallel multiplication.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Default threshold (in bits) for FFT multiplication.
pub const DEFAULT_FFT_THRESHOLD: usize = 500_000;

/// Fibonacci index used by the calibration sweep.
pub const CALIBRATION_N: u64 = 10_000_000;

/// Parallel thresholds (in bits) probed by the calibration sweep,
/// in ascending order. Zero means fully sequential.
pub const CALIBRATION_THRESHOLDS: [usize; 8] = [0, 256, 512, 1024, 2048, 4096, 8192, 16_384];

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Maximum number of scratch states each engine keeps pooled.
pub const STATE_POOL_MAX: usize = 4;

/// Maximum Fibonacci index that fits in a u64.
/// F(93) = 12200160415121876738
pub const MAX_FIB_U64: u64 = 93;

/// Precomputed Fibonacci values for n = 0..=93 (fast path).
///
/// F(93) = 12,200,160,415,121,876,738 is the largest Fibonacci number
/// that fits in `u64`. F(94) = 19,740,274,219,868,223,167 overflows
/// `u64::MAX` (18,446,744,073,709,551,615).
pub const FIB_TABLE: [u64; 94] = {
    let mut table = [0u64; 94];
    table[0] = 0;
    table[1] = 1;
    let mut i = 2;
    while i < 94 {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};

/// Table lookup for small indices, returned as a fresh `BigUint` so the
/// caller never aliases the table. Returns `None` when n exceeds
/// [`MAX_FIB_U64`].
#[must_use]
pub fn lookup_small(n: u64) -> Option<BigUint> {
    usize::try_from(n)
        .ok()
        .and_then(|i| FIB_TABLE.get(i))
        .map(|&v| BigUint::from(v))
}

/// Process exit codes used by front ends to map [`FibError`](crate::calculator::FibError)
/// variants onto shell conventions.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Algorithm results did not match during cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
