//! Parallel-threshold calibration.
//!
//! Runs the fast doubling engine over a fixed workload once per candidate
//! threshold and recommends the fastest setting.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use bigfib_core::calculator::{Calculator, FibCalculator, FibError};
use bigfib_core::constants::{CALIBRATION_N, CALIBRATION_THRESHOLDS};
use bigfib_core::fastdoubling::FastDoubling;
use bigfib_core::observers::NoOpObserver;
use bigfib_core::options::Options;
use bigfib_core::progress::CancellationToken;

/// One timed calibration run.
#[derive(Debug, Clone)]
pub struct CalibrationSample {
    pub threshold: usize,
    pub label: String,
    pub duration: Duration,
}

/// Outcome of a full calibration sweep.
#[derive(Debug, Clone)]
pub struct CalibrationReport {
    pub samples: Vec<CalibrationSample>,
    /// Threshold of the fastest sample.
    pub recommended: usize,
}

/// Run the default calibration sweep.
pub fn run_calibration(cancel: &CancellationToken) -> Result<CalibrationReport, FibError> {
    run_calibration_with(CALIBRATION_N, &CALIBRATION_THRESHOLDS, cancel)
}

/// Run a calibration sweep over explicit threshold candidates.
///
/// Computes F(n) once per candidate and times each run. Any failure,
/// cancellation included, aborts the whole sweep.
pub fn run_calibration_with(
    n: u64,
    thresholds: &[usize],
    cancel: &CancellationToken,
) -> Result<CalibrationReport, FibError> {
    let calculator = FibCalculator::new(Arc::new(FastDoubling::new()));
    let observer = NoOpObserver::new();
    let mut samples = Vec::with_capacity(thresholds.len());

    for (i, &threshold) in thresholds.iter().enumerate() {
        let label = if threshold == 0 {
            "Sequential".to_string()
        } else {
            format!("{threshold} bits")
        };
        // Only the parallel threshold varies across runs
        let opts = Options {
            parallel_threshold: threshold,
            fft_threshold: 0,
            workers: 0,
        }
        .normalize();

        let start = Instant::now();
        calculator.calculate(cancel, &observer, i, n, &opts)?;
        let duration = start.elapsed();
        info!(%label, ?duration, "Calibration sample");
        samples.push(CalibrationSample {
            threshold,
            label,
            duration,
        });
    }

    let recommended = samples
        .iter()
        .min_by_key(|s| s.duration)
        .map(|s| s.threshold)
        .ok_or_else(|| FibError::Config("calibration needs at least one threshold".into()))?;
    info!(recommended, "Calibration complete");

    Ok(CalibrationReport {
        samples,
        recommended,
    })
}
