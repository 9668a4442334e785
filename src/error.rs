//! Error taxonomy for table construction, growth and hashing.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A bucket array of length zero was requested.
    #[error("bucket array size must be at least 1")]
    ZeroSize,
    /// `fnv::hash` was asked to reduce modulo zero.
    #[error("hash modulus must be at least 1")]
    ZeroModulus,
    #[error("max load factor must be positive, got {0}")]
    InvalidLoadFactor(f64),
    #[error("growth factor must be at least 2, got {0}")]
    InvalidGrowthFactor(usize),
    /// Growing `size` by the configured factor does not fit in `usize`.
    #[error("bucket array size overflows usize when growing from {size}")]
    CapacityOverflow { size: usize },
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}
