use crate::error::{Error, Result};
use crate::types::{MAX_LEVEL, P};

/// Construction options for a skip list.
///
/// ```
/// use skiplist_engine::Options;
///
/// let opts = Options::default().max_level(16).seed(7);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Number of forward links in the header; no node grows taller.
    pub max_level: usize,
    /// Per-step promotion probability of the level generator.
    pub probability: f64,
    /// Seed for the level generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_level: MAX_LEVEL,
            probability: P,
            seed: None,
        }
    }
}

impl Options {
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the options describe a usable list.
    ///
    /// `max_level` must be in `1..=MAX_LEVEL` and `probability` in `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(Error::InvalidOptions(format!(
                "max_level must be in 1..={MAX_LEVEL}, got {}",
                self.max_level
            )));
        }
        // NaN fails both comparisons.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(Error::InvalidOptions(format!(
                "probability must be in (0, 1), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
