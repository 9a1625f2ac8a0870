//! Calculator selection logic.

use std::sync::Arc;

use bigfib_core::calculator::{Calculator, FibError};
use bigfib_core::registry::CalculatorFactory;

/// Resolve an algorithm selection into concrete calculators.
///
/// `"all"` selects every registered algorithm; any other value is looked up
/// by name (aliases included).
pub fn get_calculators_to_run(
    algo: &str,
    factory: &dyn CalculatorFactory,
) -> Result<Vec<Arc<dyn Calculator>>, FibError> {
    match algo {
        "all" => {
            let names = factory.available();
            let mut calcs = Vec::new();
            for name in names {
                calcs.push(factory.get(name)?);
            }
            Ok(calcs)
        }
        name => {
            let calc = factory.get(name)?;
            Ok(vec![calc])
        }
    }
}
