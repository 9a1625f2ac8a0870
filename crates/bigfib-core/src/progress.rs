//! Progress tracking and cooperative cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::calculator::FibError;

/// Progress update sent from calculators to observers.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Calculator index (for multi-calculator runs).
    pub calc_index: usize,
    /// Name of the algorithm producing this update.
    pub algorithm: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Current iteration/step number.
    pub current_step: u64,
    /// Total number of steps.
    pub total_steps: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update. The fraction is clamped to [0.0, 1.0]
    /// so observers never see an out-of-range value.
    #[must_use]
    pub fn new(
        calc_index: usize,
        algorithm: &'static str,
        progress: f64,
        current: u64,
        total: u64,
    ) -> Self {
        Self {
            calc_index,
            algorithm,
            progress: progress.clamp(0.0, 1.0),
            current_step: current,
            total_steps: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            calc_index,
            algorithm,
            progress: 1.0,
            current_step: 0,
            total_steps: 0,
            done: true,
        }
    }
}

/// Calculate total work for a Fibonacci computation.
///
/// Uses a geometric model based on powers of 4: each doubling step
/// operates on numbers roughly four times as expensive to multiply as
/// the step before.
#[must_use]
pub fn calc_total_work(n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let num_bits = 64 - n.leading_zeros();
    let mut total = 0.0f64;
    for i in 0..num_bits {
        total += POWERS_OF_4[i as usize];
    }
    total
}

/// Precomputed powers of 4 for work estimation (4^0 through 4^63).
const POWERS_OF_4: [f64; 64] = {
    let mut table = [0.0f64; 64];
    table[0] = 1.0;
    let mut i = 1;
    while i < 64 {
        table[i] = table[i - 1] * 4.0;
        i += 1;
    }
    table
};

/// Incremental work accounting for doubling-based engines.
///
/// Completed step weights accumulate in the same order [`calc_total_work`]
/// sums them, so after the last step the fraction is exactly 1.0 rather
/// than merely close to it.
#[derive(Debug)]
pub struct DoublingWork {
    total: f64,
    completed: f64,
}

impl DoublingWork {
    /// Work model for computing F(n).
    #[must_use]
    pub fn new(n: u64) -> Self {
        Self {
            total: calc_total_work(n),
            completed: 0.0,
        }
    }

    /// Record completion of the doubling step with the given weight index
    /// (0 for the first, cheapest step) and return the fraction done.
    pub fn advance(&mut self, step: usize) -> f64 {
        self.completed += POWERS_OF_4[step];
        if self.total > 0.0 {
            self.completed / self.total
        } else {
            1.0
        }
    }
}

/// Cooperative cancellation token, optionally carrying a deadline.
///
/// The token is considered cancelled once `cancel()` has been called or,
/// for tokens built with [`CancellationToken::with_timeout`], once the
/// deadline has passed. Clones share the manual flag.
///
/// # Example
/// ```
/// use bigfib_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicU64>,
    deadline: Option<(Instant, Duration)>,
}

impl CancellationToken {
    /// Create a token without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicU64::new(0)),
            deadline: None,
        }
    }

    /// Create a token that additionally expires after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicU64::new(0)),
            deadline: Some((Instant::now() + timeout, timeout)),
        }
    }

    /// Check if cancellation has been requested or the deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) != 0 {
            return true;
        }
        match self.deadline {
            Some((deadline, _)) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(1, Ordering::Relaxed);
    }

    /// Check for cancellation, returning the matching error if the token
    /// is no longer live. Manual cancellation takes precedence over the
    /// deadline. Use this as a checkpoint in algorithm loops:
    ///
    /// ```
    /// use bigfib_core::progress::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(token.check_cancelled().is_ok());
    ///
    /// token.cancel();
    /// assert!(token.check_cancelled().is_err());
    /// ```
    pub fn check_cancelled(&self) -> Result<(), FibError> {
        if self.cancelled.load(Ordering::Relaxed) != 0 {
            return Err(FibError::Cancelled);
        }
        if let Some((deadline, budget)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(FibError::Timeout(format!("{budget:?}")));
            }
        }
        Ok(())
    }

    /// Remaining time before the deadline, or `None` for tokens without one.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|(deadline, _)| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_update_new() {
        let update = ProgressUpdate::new(0, "FastDoubling", 0.5, 16, 32);
        assert_eq!(update.calc_index, 0);
        assert_eq!(update.algorithm, "FastDoubling");
        assert!((update.progress - 0.5).abs() < f64::EPSILON);
        assert!(!update.done);
    }

    #[test]
    fn progress_update_clamps_out_of_range() {
        let over = ProgressUpdate::new(0, "FastDoubling", 1.5, 1, 2);
        assert!((over.progress - 1.0).abs() < f64::EPSILON);
        let under = ProgressUpdate::new(0, "FastDoubling", -0.5, 1, 2);
        assert!(under.progress.abs() < f64::EPSILON);
    }

    #[test]
    fn progress_update_done() {
        let update = ProgressUpdate::done(1, "MatrixExponentiation");
        assert!(update.done);
        assert!((update.progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_work_zero() {
        assert!(calc_total_work(0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_work_positive() {
        assert!(calc_total_work(100) > 0.0);
        assert!(calc_total_work(1000) > calc_total_work(100));
    }

    #[test]
    fn doubling_work_reaches_exactly_one() {
        let n = 12_345u64;
        let num_bits = 64 - n.leading_zeros();
        let mut work = DoublingWork::new(n);
        let mut last = 0.0;
        for step in 0..num_bits as usize {
            last = work.advance(step);
        }
        // Same additions in the same order as calc_total_work, so the
        // division is exact.
        assert!((last - 1.0).abs() < f64::EPSILON);
        assert!(last <= 1.0);
    }

    #[test]
    fn doubling_work_monotonic() {
        let mut work = DoublingWork::new(1000);
        let mut prev = 0.0;
        for step in 0..10 {
            let fraction = work.advance(step);
            assert!(fraction > prev);
            prev = fraction;
        }
    }

    #[test]
    fn cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn check_cancelled_ok() {
        let token = CancellationToken::new();
        assert!(token.check_cancelled().is_ok());
    }

    #[test]
    fn check_cancelled_err() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(token.check_cancelled(), Err(FibError::Cancelled)));
    }

    #[test]
    fn cancellation_propagates_through_clone() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();
        token1.cancel();
        assert!(token2.is_cancelled());
    }

    #[test]
    fn timeout_token_not_expired() {
        let token = CancellationToken::with_timeout(Duration::from_secs(60));
        assert!(!token.is_cancelled());
        assert!(token.check_cancelled().is_ok());
        assert!(token.remaining().unwrap() > Duration::from_secs(0));
    }

    #[test]
    fn timeout_token_expired() {
        let token = CancellationToken::with_timeout(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(1));
        assert!(token.is_cancelled());
        assert!(matches!(token.check_cancelled(), Err(FibError::Timeout(_))));
    }

    #[test]
    fn manual_cancel_beats_deadline() {
        let token = CancellationToken::with_timeout(Duration::from_millis(0));
        token.cancel();
        std::thread::sleep(Duration::from_millis(1));
        assert!(matches!(token.check_cancelled(), Err(FibError::Cancelled)));
    }

    #[test]
    fn plain_token_has_no_remaining() {
        let token = CancellationToken::new();
        assert!(token.remaining().is_none());
    }
}
