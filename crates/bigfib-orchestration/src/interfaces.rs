//! Result types shared across the orchestration layer.

use std::time::Duration;

use num_bigint::BigUint;

use bigfib_core::calculator::FibError;

/// Result of a single calculation.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// Algorithm name.
    pub algorithm: String,
    /// The computed value or a structured error.
    pub outcome: Result<BigUint, FibError>,
    /// Computation duration.
    pub duration: Duration,
}

impl CalculationResult {
    /// Whether this run produced a value.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Outcome of a multi-algorithm comparison run.
///
/// `value` is the cross-validated result; `algorithm` and `duration`
/// identify the fastest successful run that produced it. `results` keeps
/// every individual run, sorted successes-first then by duration.
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    pub value: BigUint,
    pub algorithm: String,
    pub duration: Duration,
    pub results: Vec<CalculationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculation_result_success() {
        let result = CalculationResult {
            algorithm: "FastDoubling".into(),
            outcome: Ok(BigUint::from(55u32)),
            duration: Duration::from_millis(100),
        };
        assert_eq!(result.algorithm, "FastDoubling");
        assert!(result.is_success());
    }

    #[test]
    fn calculation_result_failure() {
        let result = CalculationResult {
            algorithm: "FastDoubling".into(),
            outcome: Err(FibError::Cancelled),
            duration: Duration::from_millis(5),
        };
        assert!(!result.is_success());
    }
}
