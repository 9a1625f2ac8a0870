//! Parallel execution and cross-validation of calculator results.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use bigfib_core::calculator::{Calculator, FibError};
use bigfib_core::observer::ProgressObserver;
use bigfib_core::observers::NoOpObserver;
use bigfib_core::options::Options;
use bigfib_core::progress::CancellationToken;

use crate::interfaces::{CalculationResult, ComparisonOutcome};

/// Execute calculations with all given calculators.
pub fn execute_calculations(
    calculators: &[Arc<dyn Calculator>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
) -> Vec<CalculationResult> {
    execute_calculations_with_observer(calculators, n, opts, cancel, &NoOpObserver::new())
}

/// Execute calculations with all given calculators and a progress observer.
///
/// Each calculator runs to completion and is timed individually; a failing
/// sibling never cancels the others. Results come back in input order.
pub fn execute_calculations_with_observer(
    calculators: &[Arc<dyn Calculator>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> Vec<CalculationResult> {
    if calculators.len() == 1 {
        // Single calculator: run directly on this thread
        return vec![run_single(calculators[0].as_ref(), 0, n, opts, cancel, observer)];
    }

    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    calculators
        .iter()
        .enumerate()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(i, calc)| run_single(calc.as_ref(), i, n, opts, cancel, observer))
        .collect()
}

fn run_single(
    calc: &dyn Calculator,
    calc_index: usize,
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> CalculationResult {
    let start = Instant::now();
    let outcome = calc.calculate(cancel, observer, calc_index, n, opts);
    let duration = start.elapsed();
    debug!(
        algorithm = calc.name(),
        ?duration,
        success = outcome.is_ok(),
        "Calculation finished"
    );
    CalculationResult {
        algorithm: calc.name().to_string(),
        outcome,
        duration,
    }
}

/// Sort results successes-first, then by ascending duration.
pub fn sort_results(results: &mut [CalculationResult]) {
    results.sort_by_key(|r| (r.outcome.is_err(), r.duration));
}

/// Check cross-algorithm agreement.
///
/// With zero successes the first failure is returned as is. With two or
/// more successes every value must match bit for bit; disagreement is
/// reported as a mismatch even when other runs failed.
pub fn analyze_comparison_results(results: &[CalculationResult]) -> Result<(), FibError> {
    let mut successes = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|v| (r.algorithm.as_str(), v)));
    let Some((first_algorithm, first_value)) = successes.next() else {
        let first_failure = results
            .iter()
            .find_map(|r| r.outcome.as_ref().err())
            .cloned()
            .unwrap_or_else(|| FibError::Calculation("no calculation results".into()));
        return Err(first_failure);
    };
    for (algorithm, value) in successes {
        if value != first_value {
            error!(algorithm, reference = first_algorithm, "Cross-validation mismatch");
            return Err(FibError::Mismatch);
        }
    }
    Ok(())
}

/// Run every calculator on the same input, cross-validate, and return the
/// fastest successful result together with the full sorted table.
pub fn run_comparison(
    calculators: &[Arc<dyn Calculator>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> Result<ComparisonOutcome, FibError> {
    let mut results = execute_calculations_with_observer(calculators, n, opts, cancel, observer);
    sort_results(&mut results);
    analyze_comparison_results(&results)?;

    // Sorted successes-first, and analyze ensured there is at least one
    let value = match &results[0].outcome {
        Ok(v) => v.clone(),
        Err(e) => return Err(e.clone()),
    };
    let algorithm = results[0].algorithm.clone();
    let duration = results[0].duration;
    info!(%algorithm, ?duration, "Comparison validated");

    Ok(ComparisonOutcome {
        value,
        algorithm,
        duration,
        results,
    })
}
