//! fnv-chain: a single-threaded separate-chaining hash table from text keys
//! to `i32` values, placed by FNV-1a.
//!
//! Internal Design:
//!
//! Summary
//! - `fnv`: pure FNV-1a (64-bit) hashing and reduction to a bucket index.
//! - `HashTable`: bucket array of chain heads over slot storage; each entry
//!   owns a copy of its key and links to the next entry of its bucket.
//! - `TableConfig`: initial bucket count, growth threshold, growth factor.
//!
//! Constraints
//! - Keys are unique across all chains; inserting an existing key
//!   overwrites its value in place.
//! - `len()` always equals the number of entries reachable through the
//!   chains, and the bucket count is never zero.
//! - Growth is checked before every insert: when `len / size` is strictly
//!   greater than the threshold (0.7 by default) the bucket array is
//!   multiplied by the growth factor (2 by default) and every entry is
//!   relinked.
//! - No ordering guarantee: iteration walks buckets in index order and each
//!   chain from its most recently inserted entry.
//!
//! Absence and failure
//! - Lookups return `Option<i32>`; a stored `-1` is an ordinary value.
//! - Bucket-array and key-copy allocations are fallible and surface as
//!   `TableError::OutOfMemory`. Zero sizes and zero moduli are rejected
//!   with their own variants instead of dividing by zero.
//!
//! Ownership
//! - The table exclusively owns the bucket array and every entry; dropping
//!   it releases everything. There is no shared ownership and no cycle.
//! - Iteration borrows the table, so it cannot be mutated mid-traversal.
//!
//! ```
//! use fnv_chain::HashTable;
//!
//! let mut table = HashTable::with_size(16)?;
//! table.insert("foo", 1)?;
//! table.insert("bar", 2)?;
//! assert_eq!(table.search("foo"), Some(1));
//! assert_eq!(table.search("baz"), None);
//!
//! table.delete("foo");
//! assert_eq!(table.search("foo"), None);
//! assert_eq!(table.len(), 1);
//! # Ok::<(), fnv_chain::TableError>(())
//! ```

pub mod config;
mod error;
pub mod fnv;
mod hash_table;
mod hash_table_proptest;

// Public surface
pub use config::TableConfig;
pub use error::TableError;
pub use fnv::{FnvBuildHasher, FnvHasher};
pub use hash_table::{HashTable, Iter};
