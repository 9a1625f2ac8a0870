//! Fast Doubling algorithm for Fibonacci computation.
//!
//! Uses the doubling identities:
//!   F(2k)   = F(k) * (2*F(k+1) - F(k))
//!   F(2k+1) = F(k+1)^2 + F(k)^2
//!
//! Iterates over the bits of n from MSB to LSB. All intermediates live in
//! a pooled `CalculationState`; the three products per step can run
//! concurrently once the operands are large enough.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::STATE_POOL_MAX;
use crate::multiply;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::pool::ObjectPool;
use crate::progress::{CancellationToken, DoublingWork, ProgressUpdate};

const NAME: &str = "FastDoubling";

/// State for the doubling loop, enabling pool reuse.
///
/// `fk`/`fk1` hold the running pair F(k), F(k+1); `t1` holds the
/// 2*F(k+1) - F(k) operand and `t2`..`t4` receive the three products.
pub struct CalculationState {
    /// Current F(k).
    pub fk: BigUint,
    /// Current F(k+1).
    pub fk1: BigUint,
    /// Doubling operand 2*F(k+1) - F(k).
    pub t1: BigUint,
    /// Product F(k) * t1, the next F(2k).
    pub t2: BigUint,
    /// Square F(k+1)^2.
    pub t3: BigUint,
    /// Square F(k)^2.
    pub t4: BigUint,
}

impl CalculationState {
    /// Create a new calculation state initialized for F(0)=0, F(1)=1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fk: BigUint::ZERO,
            fk1: BigUint::from(1u32),
            t1: BigUint::ZERO,
            t2: BigUint::ZERO,
            t3: BigUint::ZERO,
            t4: BigUint::ZERO,
        }
    }

    /// Reset state for reuse, keeping allocated capacity.
    pub fn reset(&mut self) {
        self.fk.set_zero();
        self.fk1.set_one();
        self.t1.set_zero();
        self.t2.set_zero();
        self.t3.set_zero();
        self.t4.set_zero();
    }
}

impl Default for CalculationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fast Doubling calculator.
///
/// # Example
/// ```
/// use bigfib_core::fastdoubling::FastDoubling;
/// use bigfib_core::calculator::CoreCalculator;
/// use bigfib_core::observers::NoOpObserver;
/// use bigfib_core::options::Options;
/// use bigfib_core::progress::CancellationToken;
///
/// let calc = FastDoubling::new();
/// let cancel = CancellationToken::new();
/// let observer = NoOpObserver::new();
/// let opts = Options::default();
/// let result = calc.calculate_core(&cancel, &observer, 0, 100, &opts).unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
pub struct FastDoubling {
    pool: ObjectPool<CalculationState>,
}

impl FastDoubling {
    /// Create a new `FastDoubling` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: ObjectPool::new(STATE_POOL_MAX),
        }
    }

    /// Execute the doubling loop.
    #[allow(clippy::cast_possible_truncation)]
    fn execute_doubling_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let num_bits = 64 - n.leading_zeros();
        let use_parallel = opts.workers > 1 && opts.parallel_threshold > 0;
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

                // t1 = 2*F(k+1) - F(k), in place
                t1.clone_from(fk1);
                *t1 <<= 1;
                *t1 -= &*fk;

                let in_parallel =
                    use_parallel && fk1.bits() as usize > opts.parallel_threshold;

                if in_parallel {
                    let fk_ref: &BigUint = fk;
                    let fk1_ref: &BigUint = fk1;
                    let t1_ref: &BigUint = t1;
                    // Calling thread takes the F(2k) product; the two
                    // squarings are open to work stealing. join is the
                    // barrier, nothing reads the state until all three land.
                    rayon::join(
                        || multiply::mul_into(t2, fk_ref, t1_ref, opts.fft_threshold),
                        || {
                            rayon::join(
                                || multiply::sqr_into(t3, fk1_ref, opts.fft_threshold),
                                || multiply::sqr_into(t4, fk_ref, opts.fft_threshold),
                            )
                        },
                    );
                } else {
                    multiply::mul_into(t2, fk, t1, opts.fft_threshold);
                    multiply::sqr_into(t3, fk1, opts.fft_threshold);
                    multiply::sqr_into(t4, fk, opts.fft_threshold);
                }

                // F(2k) and F(2k+1) replace the pair; the displaced values
                // become the next round's scratch buffers.
                std::mem::swap(fk, t2);
                std::mem::swap(fk1, t3);
                *fk1 += &*t4;

                if (n >> i) & 1 == 1 {
                    // Shift the pair up by one: (F(2k+1), F(2k+2))
                    std::mem::swap(fk, fk1);
                    *fk1 += &*fk;
                }

                debug_assert!(fk1 >= fk);

                // Step i covers numbers ~4^(num_bits-1-i) times the size of
                // the first step's, which is its share of the total work.
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

        // Return state to pool regardless of success/failure
        self.pool.release(state);

        result
    }

    #[cfg(test)]
    fn pooled_states(&self) -> usize {
        self.pool.available()
    }
}

impl Default for FastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for FastDoubling {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        self.execute_doubling_loop(n, cancel, observer, calc_index, opts)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
