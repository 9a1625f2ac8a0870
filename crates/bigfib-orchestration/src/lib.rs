//! # bigfib-orchestration
//!
//! Parallel execution, cross-validation, calculator selection, and
//! parallel-threshold calibration.

pub mod calculator_selection;
pub mod calibration;
pub mod interfaces;
pub mod orchestrator;

pub use calculator_selection::get_calculators_to_run;
pub use calibration::{run_calibration, run_calibration_with, CalibrationReport, CalibrationSample};
pub use interfaces::{CalculationResult, ComparisonOutcome};
pub use orchestrator::{
    analyze_comparison_results, execute_calculations, execute_calculations_with_observer,
    run_comparison, sort_results,
};
