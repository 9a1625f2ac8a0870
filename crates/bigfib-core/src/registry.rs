//! Calculator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::{Calculator, FibCalculator, FibError};
use crate::fastdoubling::FastDoubling;
use crate::fft_based::FftBased;
use crate::matrix::MatrixExponentiation;

/// Factory trait for creating calculators.
pub trait CalculatorFactory: Send + Sync {
    /// Get or create a calculator by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator>, FibError>;

    /// List all available calculator names, sorted.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
///
/// Caching matters beyond construction cost: repeated `get` calls hand
/// back the same engine instance, so its scratch-state pool carries over
/// between calculations.
pub struct DefaultFactory {
    cache: RwLock<HashMap<String, Arc<dyn Calculator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Aliases collapse to one cache entry so they share an instance.
    fn canonical(name: &str) -> &str {
        match name {
            "fastdoubling" => "fast",
            other => other,
        }
    }

    fn create_calculator(name: &str) -> Result<Arc<dyn Calculator>, FibError> {
        match name {
            "fast" => {
                let core = Arc::new(FastDoubling::new());
                Ok(Arc::new(FibCalculator::new(core)))
            }
            "matrix" => {
                let core = Arc::new(MatrixExponentiation::new());
                Ok(Arc::new(FibCalculator::new(core)))
            }
            "fft" => {
                let core = Arc::new(FftBased::new());
                Ok(Arc::new(FibCalculator::new(core)))
            }
            _ => Err(FibError::Config(format!("unknown calculator: {name}"))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator>, FibError> {
        let key = Self::canonical(name);

        if let Some(calc) = self.cache.read().get(key) {
            return Ok(Arc::clone(calc));
        }

        let calc = Self::create_calculator(key)?;
        self.cache
            .write()
            .insert(key.to_string(), Arc::clone(&calc));
        Ok(calc)
    }

    fn available(&self) -> Vec<&str> {
        vec!["fast", "fft", "matrix"]
    }
}
