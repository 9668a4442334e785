//! FNV-1a (64-bit) string hashing and bucket-index reduction.
//!
//! The table only needs `bucket_index`; `hash` is the checked form for
//! callers holding an arbitrary modulus. `FnvHasher`/`FnvBuildHasher` expose
//! the same accumulator through `core::hash` so it can back other maps.

use crate::error::TableError;
use core::hash::{BuildHasher, Hasher};
use core::num::NonZeroUsize;

pub const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Raw 64-bit FNV-1a over `bytes`. Every byte counts, NUL included.
#[inline]
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut acc = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        acc ^= bytes[i] as u64;
        acc = acc.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    acc
}

/// Index of `text` in a bucket array of length `modulus`.
///
/// Returns `TableError::ZeroModulus` instead of dividing by zero.
pub fn hash(text: &str, modulus: usize) -> Result<usize, TableError> {
    let modulus = NonZeroUsize::new(modulus).ok_or(TableError::ZeroModulus)?;
    Ok(bucket_index(text, modulus))
}

#[inline]
pub(crate) fn bucket_index(text: &str, modulus: NonZeroUsize) -> usize {
    // Reduce in u64 so the full accumulator participates on 32-bit targets.
    (fnv1a_64(text.as_bytes()) % modulus.get() as u64) as usize
}

/// `core::hash::Hasher` running FNV-1a over everything written to it.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        FnvHasher(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut acc = self.0;
        for &b in bytes {
            acc ^= u64::from(b);
            acc = acc.wrapping_mul(FNV_PRIME);
        }
        self.0 = acc;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;
    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::default()
    }
}
