//! Property-based and identity tests for the Fibonacci engines.
//!
//! Mixes direct `CoreCalculator` exercise with facade-level checks of the
//! fast path, progress protocol, and cancellation.

use std::sync::Arc;
use std::time::Duration;

use num_bigint::BigUint;
use proptest::prelude::*;

use bigfib_core::calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
use bigfib_core::constants::{FIB_TABLE, MAX_FIB_U64};
use bigfib_core::fastdoubling::FastDoubling;
use bigfib_core::fft_based::FftBased;
use bigfib_core::matrix::MatrixExponentiation;
use bigfib_core::observer::ProgressObserver;
use bigfib_core::observers::{ChannelObserver, NoOpObserver};
use bigfib_core::options::Options;
use bigfib_core::progress::{CancellationToken, ProgressUpdate};

fn compute_core(algo: &dyn CoreCalculator, n: u64) -> BigUint {
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    algo.calculate_core(&cancel, &observer, 0, n, &opts)
        .unwrap()
}

fn oracle(n: u64) -> BigUint {
    // Iterative reference, trusted because it is too simple to be wrong
    let (mut a, mut b) = (BigUint::ZERO, BigUint::from(1u32));
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}

#[test]
fn engines_match_iterative_oracle() {
    let fd = FastDoubling::new();
    let mx = MatrixExponentiation::new();
    let fft = FftBased::new();
    for n in [0, 1, 2, 10, 20, 50, 92, 93, 100, 1000] {
        let expected = oracle(n);
        assert_eq!(compute_core(&fd, n), expected, "FastDoubling at n={n}");
        assert_eq!(compute_core(&mx, n), expected, "Matrix at n={n}");
        assert_eq!(compute_core(&fft, n), expected, "FFT at n={n}");
    }
}

#[test]
fn known_decimal_values() {
    assert_eq!(bigfib_core::fibonacci(10).to_string(), "55");
    assert_eq!(bigfib_core::fibonacci(20).to_string(), "6765");
    assert_eq!(bigfib_core::fibonacci(50).to_string(), "12586269025");
    assert_eq!(
        bigfib_core::fibonacci(100).to_string(),
        "354224848179261915075"
    );
}

#[test]
fn cassini_identity_holds() {
    // F(n-1)*F(n+1) - F(n)^2 = (-1)^n, stated without signed arithmetic
    let fd = FastDoubling::new();
    for n in [95u64, 96, 127, 128, 1000, 1001] {
        let prev = compute_core(&fd, n - 1);
        let curr = compute_core(&fd, n);
        let next = compute_core(&fd, n + 1);
        let product = &prev * &next;
        let square = &curr * &curr;
        if n % 2 == 0 {
            assert_eq!(product, &square + 1u32, "n = {n}");
        } else {
            assert_eq!(&product + 1u32, square, "n = {n}");
        }
    }
}

#[test]
fn small_n_never_reaches_engine() {
    struct PanickingCore;
    impl CoreCalculator for PanickingCore {
        fn calculate_core(
            &self,
            _cancel: &CancellationToken,
            _observer: &dyn ProgressObserver,
            _calc_index: usize,
            _n: u64,
            _opts: &Options,
        ) -> Result<BigUint, FibError> {
            panic!("engine must not run for table-range n");
        }
        fn name(&self) -> &'static str {
            "Stub"
        }
    }

    let calc = FibCalculator::new(Arc::new(PanickingCore));
    let cancel = CancellationToken::new();
    let opts = Options::default();

    for n in [0, 1, 50, MAX_FIB_U64] {
        let (tx, rx) = crossbeam_channel::bounded(8);
        let observer = ChannelObserver::new(tx);
        let value = calc.calculate(&cancel, &observer, 0, n, &opts).unwrap();
        assert_eq!(value, BigUint::from(FIB_TABLE[n as usize]));

        drop(observer);
        let updates: Vec<ProgressUpdate> = rx.try_iter().collect();
        assert_eq!(updates.len(), 1, "exactly one terminal update for n={n}");
        assert!(updates[0].done);
    }
}

#[test]
fn progress_is_monotonic_and_terminal() {
    let (tx, rx) = crossbeam_channel::bounded(1024);
    let observer = ChannelObserver::new(tx);
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::new();
    let opts = Options::default();

    let result = calc
        .calculate(&cancel, &observer, 0, 200_000, &opts)
        .unwrap();
    assert!(result.bits() > 0);

    drop(observer);
    let updates: Vec<ProgressUpdate> = rx.try_iter().collect();
    assert!(updates.len() >= 2, "expected fractional updates plus done");

    let mut prev = 0.0;
    for update in &updates {
        assert!(update.progress >= prev, "progress went backwards");
        assert!(update.progress <= 1.0);
        prev = update.progress;
    }

    let last = updates.last().unwrap();
    assert!(last.done, "final update must be the terminal one");
    assert!((last.progress - 1.0).abs() < f64::EPSILON);

    // The done marker appears exactly once
    assert_eq!(updates.iter().filter(|u| u.done).count(), 1);
}

#[test]
fn failed_run_emits_no_terminal_update() {
    let (tx, rx) = crossbeam_channel::bounded(64);
    let observer = ChannelObserver::new(tx);
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let opts = Options::default();

    let result = calc.calculate(&cancel, &observer, 0, 1_000_000, &opts);
    assert!(result.is_err());

    drop(observer);
    let updates: Vec<ProgressUpdate> = rx.try_iter().collect();
    assert!(
        updates.iter().all(|u| !u.done && u.progress < 1.0),
        "a failed run must never claim completion"
    );
}

#[test]
fn mutating_a_returned_value_leaves_the_table_intact() {
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();

    let mut first = calc.calculate(&cancel, &observer, 0, 50, &opts).unwrap();
    first += 1u32;

    let second = calc.calculate(&cancel, &observer, 0, 50, &opts).unwrap();
    assert_eq!(second, BigUint::from(12_586_269_025u64));
}

#[test]
fn facade_rejects_cancelled_token_for_large_n() {
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let observer = NoOpObserver::new();
    let opts = Options::default();

    let result = calc.calculate(&cancel, &observer, 0, 1_000_000, &opts);
    assert!(matches!(result, Err(FibError::Cancelled)));
}

#[test]
fn facade_times_out_with_expired_deadline() {
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
    let cancel = CancellationToken::with_timeout(Duration::from_millis(0));
    std::thread::sleep(Duration::from_millis(1));
    let observer = NoOpObserver::new();
    let opts = Options::default();

    let result = calc.calculate(&cancel, &observer, 0, 1_000_000, &opts);
    assert!(matches!(result, Err(FibError::Timeout(_))));
    assert!(result.unwrap_err().is_cancellation());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// For random n in [94..5000], all three core engines agree.
    #[test]
    fn all_core_engines_agree(n in 94u64..5000) {
        let fd = FastDoubling::new();
        let mx = MatrixExponentiation::new();
        let fft = FftBased::new();

        let fd_result = compute_core(&fd, n);
        let mx_result = compute_core(&mx, n);
        let fft_result = compute_core(&fft, n);

        prop_assert_eq!(&fd_result, &mx_result, "FastDoubling != Matrix at n={}", n);
        prop_assert_eq!(&fd_result, &fft_result, "FastDoubling != FFT at n={}", n);
    }

    /// F(n) + F(n+1) == F(n+2) for random n.
    #[test]
    fn fibonacci_addition_property(n in 2u64..2000) {
        let algo = FastDoubling::new();
        let fn_val = compute_core(&algo, n);
        let fn1_val = compute_core(&algo, n + 1);
        let fn2_val = compute_core(&algo, n + 2);
        prop_assert_eq!(&fn_val + &fn1_val, fn2_val, "F({}) + F({}) != F({})", n, n + 1, n + 2);
    }

    /// Cassini's identity for random n.
    #[test]
    fn cassini_identity_random(n in 95u64..3000) {
        let algo = FastDoubling::new();
        let prev = compute_core(&algo, n - 1);
        let curr = compute_core(&algo, n);
        let next = compute_core(&algo, n + 1);
        let product = &prev * &next;
        let square = &curr * &curr;
        if n % 2 == 0 {
            prop_assert_eq!(product, &square + 1u32);
        } else {
            prop_assert_eq!(&product + 1u32, square);
        }
    }
}
