//! Calculation options and configuration.

use crate::constants::{DEFAULT_FFT_THRESHOLD, DEFAULT_PARALLEL_THRESHOLD};

/// Options for Fibonacci calculation.
///
/// Both thresholds treat zero as "disabled": a zero `parallel_threshold`
/// forces fully sequential multiplication (the calibration sweep relies on
/// this), and a zero `fft_threshold` disables the FFT path entirely.
#[derive(Debug, Clone)]
pub struct Options {
    /// Operand size (in bits) above which multiplications run in parallel.
    /// Zero disables parallelism.
    pub parallel_threshold: usize,
    /// Operand size (in bits) above which multiplications use FFT.
    /// Zero disables the FFT path.
    pub fft_threshold: usize,
    /// Worker count for parallel sections. Zero means "use all cores"
    /// and is resolved by [`Options::normalize`].
    pub workers: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            fft_threshold: DEFAULT_FFT_THRESHOLD,
            workers: available_workers(),
        }
    }
}

impl Options {
    /// Normalize options, resolving a zero worker count to the number of
    /// available cores. Thresholds are left untouched since zero carries
    /// meaning for them.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.workers == 0 {
            self.workers = available_workers();
        }
        self
    }
}

/// Number of hardware threads available to this process, defaulting to 1
/// when the platform cannot tell.
#[must_use]
pub fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}
