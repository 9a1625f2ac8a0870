//! FFT-based Fibonacci calculator.
//!
//! Runs the same doubling recurrence as `FastDoubling` but routes every
//! product straight through the FFT backend, which falls back to
//! standard multiplication on its own below its direct threshold. The
//! per-operand threshold checks of the dispatcher never apply here,
//! which is exactly what makes this engine a useful cross-check.

use num_bigint::BigUint;

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::STATE_POOL_MAX;
use crate::fastdoubling::CalculationState;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::pool::ObjectPool;
use crate::progress::{CancellationToken, DoublingWork, ProgressUpdate};

const NAME: &str = "FFTBased";

/// FFT-based Fibonacci calculator.
pub struct FftBased {
    pool: ObjectPool<CalculationState>,
}

impl FftBased {
    /// Create a new FFT-based calculator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: ObjectPool::new(STATE_POOL_MAX),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn execute_doubling_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
    ) -> Result<BigUint, FibError> {
        let num_bits = 64 - n.leading_zeros();
        let mut state = self.pool.acquire(CalculationState::new, CalculationState::reset);

        let frozen = observer.freeze();
        let mut work = DoublingWork::new(n);

        let result = (|| {
            for i in (0..num_bits).rev() {
                cancel.check_cancelled()?;

                let CalculationState {
                    fk,
                    fk1,
                    t1,
                    t2,
                    t3,
                    t4,
                } = &mut state;

                // t1 = 2*F(k+1) - F(k)
                t1.clone_from(fk1);
                *t1 <<= 1;
                *t1 -= &*fk;

                *t2 = bigfib_fft::mul(fk, t1);
                *t3 = bigfib_fft::sqr(fk1);
                *t4 = bigfib_fft::sqr(fk);

                std::mem::swap(fk, t2);
                std::mem::swap(fk1, t3);
                *fk1 += &*t4;

                if (n >> i) & 1 == 1 {
                    std::mem::swap(fk, fk1);
                    *fk1 += &*fk;
                }

                let fraction = work.advance((num_bits - 1 - i) as usize);
                if frozen.should_report(fraction) || i == 0 {
                    frozen.update(fraction);
                    observer.on_progress(&ProgressUpdate::new(
                        calc_index,
                        NAME,
                        fraction,
                        u64::from(num_bits - i),
                        u64::from(num_bits),
                    ));
                }
            }

            Ok(std::mem::take(&mut state.fk))
        })();

        self.pool.release(state);

        result
    }
}

impl Default for FftBased {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for FftBased {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        _opts: &Options,
    ) -> Result<BigUint, FibError> {
        self.execute_doubling_loop(n, cancel, observer, calc_index)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::NoOpObserver;

    fn compute_fib(n: u64) -> BigUint {
        let calc = FftBased::new();
        let cancel = CancellationToken::new();
        let observer = NoOpObserver::new();
        let opts = Options::default();
        calc.calculate_core(&cancel, &observer, 0, n, &opts)
            .unwrap()
    }

    #[test]
    fn fft_base_cases() {
        assert_eq!(compute_fib(0), BigUint::ZERO);
        assert_eq!(compute_fib(1), BigUint::from(1u32));
        assert_eq!(compute_fib(10), BigUint::from(55u32));
    }

    #[test]
    fn fft_known_values() {
        assert_eq!(
            compute_fib(100),
            BigUint::parse_bytes(b"354224848179261915075", 10).unwrap()
        );
        assert_eq!(
            compute_fib(200),
            BigUint::parse_bytes(b"280571172992510140037611932413038677189525", 10).unwrap()
        );
    }

    #[test]
    fn fft_agrees_with_fast_doubling() {
        use crate::fastdoubling::FastDoubling;

        let fast = FastDoubling::new();
        let cancel = CancellationToken::new();
        let observer = NoOpObserver::new();
        let opts = Options::default();
        for n in [94, 1000, 4321, 50_000] {
            let expected = fast
                .calculate_core(&cancel, &observer, 0, n, &opts)
                .unwrap();
            assert_eq!(compute_fib(n), expected, "n = {n}");
        }
    }

    #[test]
    fn fft_cancellation() {
        let calc = FftBased::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let observer = NoOpObserver::new();
        let opts = Options::default();
        let result = calc.calculate_core(&cancel, &observer, 0, 10_000, &opts);
        assert!(matches!(result, Err(FibError::Cancelled)));
    }
}
