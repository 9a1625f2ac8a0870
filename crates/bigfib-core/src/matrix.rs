//! Matrix Exponentiation algorithm for Fibonacci computation.
//!
//! Computes F(n) as the top-left entry of Q^(n-1) where Q = [[1,1],[1,0]],
//! scanning the exponent's bits from LSB to MSB: the accumulator picks up
//! the running power on set bits, and the running power squares itself
//! between iterations. All matrices and product registers live in a pooled
//! `MatrixState`; the displaced halves of each swap become the next
//! round's scratch space.

use num_bigint::BigUint;

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::STATE_POOL_MAX;
use crate::matrix_types::{Matrix, MatrixState, MatrixTemps};
use crate::multiply;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::pool::ObjectPool;
use crate::progress::{CancellationToken, ProgressUpdate};

const NAME: &str = "MatrixExponentiation";

/// General 2x2 product `dest = x * y` built from eight elementwise
/// multiplications. In parallel mode seven run as stealable tasks and the
/// eighth on the calling thread; the scope is the barrier.
fn multiply_matrices(
    dest: &mut Matrix,
    x: &Matrix,
    y: &Matrix,
    t: &mut MatrixTemps,
    in_parallel: bool,
    fft_threshold: usize,
) {
    {
        let MatrixTemps {
            t1,
            t2,
            t3,
            t4,
            t5,
            t6,
            t7,
            t8,
        } = &mut *t;
        if in_parallel {
            rayon::scope(|s| {
                s.spawn(|_| multiply::mul_into(t1, &x.a, &y.a, fft_threshold));
                s.spawn(|_| multiply::mul_into(t2, &x.b, &y.c, fft_threshold));
                s.spawn(|_| multiply::mul_into(t3, &x.a, &y.b, fft_threshold));
                s.spawn(|_| multiply::mul_into(t4, &x.b, &y.d, fft_threshold));
                s.spawn(|_| multiply::mul_into(t5, &x.c, &y.a, fft_threshold));
                s.spawn(|_| multiply::mul_into(t6, &x.d, &y.c, fft_threshold));
                s.spawn(|_| multiply::mul_into(t7, &x.c, &y.b, fft_threshold));
                multiply::mul_into(t8, &x.d, &y.d, fft_threshold);
            });
        } else {
            multiply::mul_into(t1, &x.a, &y.a, fft_threshold);
            multiply::mul_into(t2, &x.b, &y.c, fft_threshold);
            multiply::mul_into(t3, &x.a, &y.b, fft_threshold);
            multiply::mul_into(t4, &x.b, &y.d, fft_threshold);
            multiply::mul_into(t5, &x.c, &y.a, fft_threshold);
            multiply::mul_into(t6, &x.d, &y.c, fft_threshold);
            multiply::mul_into(t7, &x.c, &y.b, fft_threshold);
            multiply::mul_into(t8, &x.d, &y.d, fft_threshold);
        }
    }

    std::mem::swap(&mut dest.a, &mut t.t1);
    dest.a += &t.t2;
    std::mem::swap(&mut dest.b, &mut t.t3);
    dest.b += &t.t4;
    std::mem::swap(&mut dest.c, &mut t.t5);
    dest.c += &t.t6;
    std::mem::swap(&mut dest.d, &mut t.t7);
    dest.d += &t.t8;
}

/// Squaring of a symmetric matrix (b == c), which the running power of Q
/// always is. Four multiplications instead of eight:
///   dest.a = a^2 + b^2
///   dest.b = dest.c = b * (a + d)
///   dest.d = b^2 + d^2
fn square_symmetric(
    dest: &mut Matrix,
    m: &Matrix,
    t: &mut MatrixTemps,
    in_parallel: bool,
    fft_threshold: usize,
) {
    debug_assert!(m.b == m.c);
    {
        let MatrixTemps { t1, t2, t3, t4, t5, .. } = &mut *t;

        // t5 = a + d feeds the shared off-diagonal product
        t5.clone_from(&m.a);
        *t5 += &m.d;

        if in_parallel {
            rayon::scope(|s| {
                s.spawn(|_| multiply::sqr_into(t1, &m.a, fft_threshold));
                s.spawn(|_| multiply::sqr_into(t2, &m.b, fft_threshold));
                s.spawn(|_| multiply::sqr_into(t3, &m.d, fft_threshold));
                multiply::mul_into(t4, &m.b, t5, fft_threshold);
            });
        } else {
            multiply::sqr_into(t1, &m.a, fft_threshold);
            multiply::sqr_into(t2, &m.b, fft_threshold);
            multiply::sqr_into(t3, &m.d, fft_threshold);
            multiply::mul_into(t4, &m.b, t5, fft_threshold);
        }
    }

    std::mem::swap(&mut dest.a, &mut t.t1);
    dest.a += &t.t2;
    std::mem::swap(&mut dest.d, &mut t.t3);
    dest.d += &t.t2;
    dest.b.clone_from(&t.t4);
    std::mem::swap(&mut dest.c, &mut t.t4);
}

/// Matrix Exponentiation calculator.
pub struct MatrixExponentiation {
    pool: ObjectPool<MatrixState>,
}

impl MatrixExponentiation {
    /// Create a new `MatrixExponentiation` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: ObjectPool::new(STATE_POOL_MAX),
        }
    }

    /// Execute the binary exponentiation loop for Q^(n-1).
    #[allow(clippy::cast_possible_truncation)]
    fn execute_power_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        if n == 0 {
            return Ok(BigUint::ZERO);
        }
        let exponent = n - 1;
        let num_bits = 64 - exponent.leading_zeros();
        let use_parallel = opts.workers > 1 && opts.parallel_threshold > 0;
        let mut state = self.pool.acquire(MatrixState::new, MatrixState::reset);

        let frozen = observer.freeze();

        let result = (|| {
            for i in 0..num_bits {
                cancel.check_cancelled()?;

                // Bit position over bit count is only an estimate; the
                // iterations are nowhere near equal cost. Reported at entry
                // so it never claims completion.
                let fraction = f64::from(i) / f64::from(num_bits);
                if frozen.should_report(fraction) {
                    frozen.update(fraction);
                    observer.on_progress(&ProgressUpdate::new(
                        calc_index,
                        NAME,
                        fraction,
                        u64::from(i),
                        u64::from(num_bits),
                    ));
                }

                let MatrixState {
                    res,
                    power,
                    temp,
                    temps,
                } = &mut state;
                let in_parallel =
                    use_parallel && power.a.bits() as usize > opts.parallel_threshold;

                if (exponent >> i) & 1 == 1 {
                    multiply_matrices(temp, res, power, temps, in_parallel, opts.fft_threshold);
                    std::mem::swap(res, temp);
                }

                // The final squaring would never be read
                if i + 1 < num_bits {
                    square_symmetric(temp, power, temps, in_parallel, opts.fft_threshold);
                    std::mem::swap(power, temp);
                }
            }

            // Q^(n-1)[0][0] = F(n)
            Ok(std::mem::take(&mut state.res.a))
        })();

        self.pool.release(state);

        result
    }

    #[cfg(test)]
    fn pooled_states(&self) -> usize {
        self.pool.available()
    }
}

impl Default for MatrixExponentiation {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for MatrixExponentiation {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        self.execute_power_loop(n, cancel, observer, calc_index, opts)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
