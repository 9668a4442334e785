//! Construction parameters for `HashTable`.

use crate::error::TableError;

pub const DEFAULT_INITIAL_SIZE: usize = 16;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Bucket-array sizing policy.
///
/// Growth happens on insert when `count / size` is strictly greater than
/// `max_load_factor`; the new size is `size * growth_factor`. Setting
/// `max_load_factor` to `f64::INFINITY` yields a fixed-size table that
/// only changes size through explicit `resize` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_size: usize,
    pub max_load_factor: f64,
    pub growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_INITIAL_SIZE,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Fixed-size policy: never grows on insert.
    pub fn fixed(initial_size: usize) -> Self {
        Self::default()
            .with_initial_size(initial_size)
            .with_max_load_factor(f64::INFINITY)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_size == 0 {
            return Err(TableError::ZeroSize);
        }
        // NaN fails the comparison as well.
        if !(self.max_load_factor > 0.0) {
            return Err(TableError::InvalidLoadFactor(self.max_load_factor));
        }
        if self.growth_factor < 2 {
            return Err(TableError::InvalidGrowthFactor(self.growth_factor));
        }
        Ok(())
    }
}
