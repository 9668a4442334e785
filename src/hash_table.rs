//! HashTable: separate chaining over FNV-1a with load-factor driven growth.
//!
//! Entries are stored in a `SlotMap` and threaded into per-bucket chains by
//! their generational keys. A bucket holds the key of its chain head; each
//! entry holds the key of its successor. Resizing relinks entries into a new
//! bucket array without touching their storage.

use crate::config::{TableConfig, DEFAULT_INITIAL_SIZE};
use crate::error::TableError;
use crate::fnv::bucket_index;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use core::num::NonZeroUsize;
use slotmap::SlotMap;

slotmap::new_key_type! {
    struct EntryKey;
}

const DEFAULT_SIZE: NonZeroUsize = match NonZeroUsize::new(DEFAULT_INITIAL_SIZE) {
    Some(n) => n,
    None => panic!("default bucket count must be non-zero"),
};

#[derive(Debug)]
struct Entry {
    key: String,
    value: i32,
    next: Option<EntryKey>,
}

/// Map from owned text keys to `i32` values.
///
/// Not synchronized: share across threads only behind the caller's own lock.
pub struct HashTable {
    buckets: Vec<Option<EntryKey>>,
    // Always equal to `buckets.len()`.
    size: NonZeroUsize,
    entries: SlotMap<EntryKey, Entry>,
    config: TableConfig,
}

impl HashTable {
    /// Empty table with the default policy (16 buckets, grow past 0.7).
    pub fn new() -> Self {
        log::trace!("creating hash table with {} buckets", DEFAULT_SIZE);
        Self {
            buckets: vec![None; DEFAULT_SIZE.get()],
            size: DEFAULT_SIZE,
            entries: SlotMap::with_key(),
            config: TableConfig::default(),
        }
    }

    /// Empty table with `initial_size` buckets and the default growth policy.
    pub fn with_size(initial_size: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::default().with_initial_size(initial_size))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let size = NonZeroUsize::new(config.initial_size).ok_or(TableError::ZeroSize)?;
        let buckets = alloc_buckets(size)?;
        log::trace!("creating hash table with {} buckets", size);
        Ok(Self {
            buckets,
            size,
            entries: SlotMap::with_key(),
            config,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the bucket array.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.size.get() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Inserts or overwrites `key`, returning the previous value if any.
    ///
    /// Growth is checked before placement: when the load factor already
    /// exceeds the configured maximum, the bucket array is multiplied by the
    /// growth factor first. On error the table is unchanged.
    pub fn insert(&mut self, key: &str, value: i32) -> Result<Option<i32>, TableError> {
        if self.load_factor() > self.config.max_load_factor {
            self.grow()?;
        }

        let idx = bucket_index(key, self.size);
        if let Some(k) = self.find_in_bucket(idx, key) {
            if let Some(entry) = self.entries.get_mut(k) {
                return Ok(Some(mem::replace(&mut entry.value, value)));
            }
        }

        let mut owned = String::new();
        owned.try_reserve_exact(key.len())?;
        owned.push_str(key);

        let next = self.buckets[idx];
        let k = self.entries.insert(Entry {
            key: owned,
            value,
            next,
        });
        self.buckets[idx] = Some(k);
        Ok(None)
    }

    /// Inserts every pair in order, stopping at the first error.
    pub fn try_extend<I, K>(&mut self, pairs: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = (K, i32)>,
        K: AsRef<str>,
    {
        for (key, value) in pairs {
            self.insert(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Value stored under `key`, or `None` when absent.
    pub fn search(&self, key: &str) -> Option<i32> {
        let idx = bucket_index(key, self.size);
        let k = self.find_in_bucket(idx, key)?;
        self.entries.get(k).map(|e| e.value)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<i32> {
        self.search(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let idx = bucket_index(key, self.size);
        self.find_in_bucket(idx, key).is_some()
    }

    /// Unlinks and drops the entry for `key`, returning its value.
    /// Deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &str) -> Option<i32> {
        let idx = bucket_index(key, self.size);
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.buckets[idx];

        while let Some(k) = cur {
            let entry = self.entries.get(k)?;
            if entry.key == key {
                let next = entry.next;
                match prev.and_then(|p| self.entries.get_mut(p)) {
                    Some(p) => p.next = next,
                    None => self.buckets[idx] = next,
                }
                return self.entries.remove(k).map(|e| e.value);
            }
            prev = cur;
            cur = entry.next;
        }
        None
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<i32> {
        self.delete(key)
    }

    /// Rebuilds the bucket array with `new_size` buckets.
    ///
    /// Accepts any non-zero size, smaller or larger than the current one.
    /// Entries keep their storage and are only relinked. If the new array
    /// cannot be allocated the table is left as it was.
    pub fn resize(&mut self, new_size: usize) -> Result<(), TableError> {
        let new_size = NonZeroUsize::new(new_size).ok_or(TableError::ZeroSize)?;
        let mut fresh = alloc_buckets(new_size)?;

        for mut cur in self.buckets.drain(..) {
            while let Some(k) = cur {
                let Some(entry) = self.entries.get_mut(k) else {
                    break;
                };
                cur = entry.next;
                let idx = bucket_index(&entry.key, new_size);
                entry.next = fresh[idx];
                fresh[idx] = Some(k);
            }
        }

        log::debug!(
            "resized hash table from {} to {} buckets ({} entries)",
            self.size,
            new_size,
            self.entries.len()
        );
        self.buckets = fresh;
        self.size = new_size;
        Ok(())
    }

    /// Drops every entry; the bucket array keeps its current size.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.fill(None);
    }

    /// Visits every entry in bucket order, each chain from its head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            entries: &self.entries,
            cur: None,
            remaining: self.entries.len(),
        }
    }

    /// Callback form of `iter`.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, i32),
    {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let size = self.size.get();
        let new_size = size
            .checked_mul(self.config.growth_factor)
            .ok_or(TableError::CapacityOverflow { size })?;
        self.resize(new_size)
    }

    fn find_in_bucket(&self, idx: usize, key: &str) -> Option<EntryKey> {
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let entry = self.entries.get(k)?;
            if entry.key == key {
                return Some(k);
            }
            cur = entry.next;
        }
        None
    }
}

fn alloc_buckets(size: NonZeroUsize) -> Result<Vec<Option<EntryKey>>, TableError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(size.get())?;
    buckets.resize(size.get(), None);
    Ok(buckets)
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a str, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over `(key, value)` pairs of a `HashTable`.
pub struct Iter<'a> {
    buckets: core::slice::Iter<'a, Option<EntryKey>>,
    entries: &'a SlotMap<EntryKey, Entry>,
    cur: Option<EntryKey>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let entry = self.entries.get(k)?;
                self.cur = entry.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((entry.key.as_str(), entry.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn walk_count(t: &HashTable) -> usize {
        let mut n = 0;
        t.for_each(|_, _| n += 1);
        n
    }

    /// Invariant: the end-to-end foo/bar scenario on a 16-bucket table.
    #[test]
    fn foo_bar_scenario() {
        let mut t = HashTable::with_size(16).unwrap();
        assert_eq!(t.insert("foo", 1), Ok(None));
        assert_eq!(t.insert("bar", 2), Ok(None));
        assert_eq!(t.search("foo"), Some(1));
        assert_eq!(t.search("bar"), Some(2));
        assert_eq!(t.search("baz"), None);

        assert_eq!(t.delete("foo"), Some(1));
        assert_eq!(t.search("foo"), None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.size(), 16);
    }

    /// Invariant: inserting an existing key overwrites in place; count is unchanged.
    #[test]
    fn update_keeps_count() {
        let mut t = HashTable::new();
        t.insert("k", 1).unwrap();
        assert_eq!(t.insert("k", 2), Ok(Some(1)));
        assert_eq!(t.len(), 1);
        assert_eq!(t.search("k"), Some(2));
    }

    /// Invariant: a stored -1 is distinguishable from absence, as are the extremes.
    #[test]
    fn sentinel_like_values_round_trip() {
        let mut t = HashTable::new();
        for (k, v) in [("neg", -1), ("zero", 0), ("min", i32::MIN), ("max", i32::MAX)] {
            t.insert(k, v).unwrap();
        }
        assert_eq!(t.search("neg"), Some(-1));
        assert_eq!(t.search("zero"), Some(0));
        assert_eq!(t.search("min"), Some(i32::MIN));
        assert_eq!(t.search("max"), Some(i32::MAX));
        assert_eq!(t.search("missing"), None);
    }

    /// Invariant: the empty string and keys with embedded NULs are ordinary keys.
    #[test]
    fn empty_and_nul_keys() {
        let mut t = HashTable::with_size(4).unwrap();
        t.insert("", 10).unwrap();
        t.insert("a\0b", 20).unwrap();
        t.insert("a", 30).unwrap();
        assert_eq!(t.search(""), Some(10));
        assert_eq!(t.search("a\0b"), Some(20));
        assert_eq!(t.search("a"), Some(30));
        assert_eq!(t.search("a\0"), None);
    }

    /// Invariant: the table keeps its own copy of the key.
    #[test]
    fn key_is_copied() {
        let mut t = HashTable::new();
        let mut caller = String::from("owned");
        t.insert(&caller, 5).unwrap();
        caller.push_str("-changed");
        assert_eq!(t.search("owned"), Some(5));
        assert_eq!(t.search(&caller), None);
    }

    /// Invariant: delete of a present key removes exactly it; a second delete is a no-op.
    #[test]
    fn delete_then_delete_again() {
        let mut t = HashTable::new();
        t.insert("a", 1).unwrap();
        t.insert("b", 2).unwrap();
        assert_eq!(t.delete("a"), Some(1));
        assert_eq!(t.len(), 1);
        assert_eq!(t.delete("a"), None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.search("b"), Some(2));
        assert_eq!(t.delete("never"), None);
    }

    /// Invariant: in a single shared chain, unlinking the head, middle or tail
    /// keeps the rest of the chain reachable.
    #[test]
    fn unlink_positions_in_single_chain() {
        let mut t = HashTable::with_config(TableConfig::fixed(1)).unwrap();
        for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            t.insert(k, i as i32).unwrap();
        }
        assert_eq!(t.size(), 1);

        // Chain order is e, d, c, b, a (head insertion).
        assert_eq!(t.delete("c"), Some(2)); // middle
        assert_eq!(t.delete("e"), Some(4)); // head
        assert_eq!(t.delete("a"), Some(0)); // tail
        let left: BTreeMap<&str, i32> = t.iter().collect();
        assert_eq!(left, BTreeMap::from([("b", 1), ("d", 3)]));
        assert_eq!(walk_count(&t), t.len());
    }

    /// Invariant: new entries go to the head of their chain.
    #[test]
    fn chain_is_head_inserted() {
        let mut t = HashTable::with_config(TableConfig::fixed(1)).unwrap();
        t.insert("first", 1).unwrap();
        t.insert("second", 2).unwrap();
        let keys: Vec<&str> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }

    /// Invariant: growth triggers only once count/size strictly exceeds 0.7.
    #[test]
    fn growth_threshold_is_strict() {
        let mut t = HashTable::with_size(10).unwrap();
        for i in 0..8 {
            t.insert(&format!("k{i}"), i).unwrap();
        }
        // 7/10 did not exceed the threshold when the 8th key arrived.
        assert_eq!(t.size(), 10);
        // 8/10 does, so the next insert doubles first.
        t.insert("k8", 8).unwrap();
        assert_eq!(t.size(), 20);
        assert_eq!(t.len(), 9);
    }

    /// Invariant: updating an existing key also runs the pre-insert growth check.
    #[test]
    fn update_can_trigger_growth() {
        let mut t = HashTable::with_size(1).unwrap();
        t.insert("a", 1).unwrap();
        t.insert("a", 2).unwrap();
        assert_eq!(t.size(), 2);
        assert_eq!(t.len(), 1);
        assert_eq!(t.search("a"), Some(2));
    }

    /// Invariant: 1000 keys into a 2-bucket table all survive successive doublings.
    #[test]
    fn thousand_keys_from_two_buckets() {
        let mut t = HashTable::with_size(2).unwrap();
        for i in 0..1000 {
            assert_eq!(t.insert(&format!("key-{i}"), i), Ok(None));
        }
        assert_eq!(t.len(), 1000);
        assert_eq!(t.size(), 2048);
        for i in 0..1000 {
            assert_eq!(t.search(&format!("key-{i}")), Some(i));
        }
        assert_eq!(walk_count(&t), 1000);
    }

    /// Invariant: explicit resize, growing or shrinking, preserves every pair once.
    #[test]
    fn explicit_resize_preserves_pairs() {
        let mut t = HashTable::with_size(8).unwrap();
        for i in 0..5 {
            t.insert(&format!("k{i}"), i * 10).unwrap();
        }
        let before: BTreeMap<String, i32> =
            t.iter().map(|(k, v)| (k.to_string(), v)).collect();

        for new_size in [1, 3, 64, 5] {
            t.resize(new_size).unwrap();
            assert_eq!(t.size(), new_size);
            assert_eq!(t.len(), 5);
            let after: BTreeMap<String, i32> =
                t.iter().map(|(k, v)| (k.to_string(), v)).collect();
            assert_eq!(after, before);
            assert_eq!(walk_count(&t), 5);
        }
    }

    /// Invariant: zero sizes are rejected and leave the table untouched.
    #[test]
    fn zero_sizes_rejected() {
        assert!(matches!(HashTable::with_size(0), Err(TableError::ZeroSize)));
        let mut t = HashTable::with_size(4).unwrap();
        t.insert("x", 1).unwrap();
        assert_eq!(t.resize(0), Err(TableError::ZeroSize));
        assert_eq!(t.size(), 4);
        assert_eq!(t.search("x"), Some(1));
    }

    /// Invariant: growth that would overflow usize is reported, not wrapped.
    #[test]
    fn growth_overflow_reported() {
        let cfg = TableConfig::new()
            .with_initial_size(1)
            .with_growth_factor(usize::MAX);
        let mut t = HashTable::with_config(cfg).unwrap();
        t.insert("a", 1).unwrap();
        // 1/1 > 0.7 so the next insert grows to 1 * usize::MAX buckets, which
        // cannot be reserved.
        let err = t.insert("b", 2).unwrap_err();
        assert!(matches!(err, TableError::OutOfMemory(_)));
        assert_eq!(t.len(), 1);
        assert_eq!(t.size(), 1);

        let cfg = TableConfig::new()
            .with_initial_size(2)
            .with_growth_factor(usize::MAX);
        let mut t = HashTable::with_config(cfg).unwrap();
        t.insert("a", 1).unwrap();
        t.insert("b", 2).unwrap();
        assert_eq!(
            t.insert("c", 3),
            Err(TableError::CapacityOverflow { size: 2 })
        );
        assert_eq!(t.len(), 2);
    }

    /// Invariant: iteration yields each live entry exactly once and reports its length.
    #[test]
    fn iteration_yields_each_entry_once() {
        let mut t = HashTable::with_size(4).unwrap();
        let keys = ["k1", "k2", "k3", "k4", "k5", "k6"];
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as i32).unwrap();
        }
        let it = t.iter();
        assert_eq!(it.len(), keys.len());
        let seen: Vec<&str> = it.map(|(k, _)| k).collect();
        assert_eq!(seen.len(), keys.len());
        let unique: BTreeSet<&str> = seen.into_iter().collect();
        assert_eq!(unique, keys.iter().copied().collect::<BTreeSet<&str>>());

        let mut sum = 0;
        for (_, v) in &t {
            sum += v;
        }
        assert_eq!(sum, 15);
    }

    /// Invariant: an exhausted iterator stays exhausted.
    #[test]
    fn iterator_is_fused() {
        let mut t = HashTable::new();
        t.insert("only", 1).unwrap();
        let mut it = t.iter();
        assert_eq!(it.next(), Some(("only", 1)));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert_eq!(it.len(), 0);
    }

    /// Invariant: clear drops all entries but keeps the bucket array.
    #[test]
    fn clear_keeps_size() {
        let mut t = HashTable::with_size(2).unwrap();
        t.try_extend([("a", 1), ("b", 2), ("c", 3)]).unwrap();
        let size = t.size();
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.size(), size);
        assert_eq!(t.search("a"), None);
        assert_eq!(t.iter().next(), None);
        t.insert("a", 9).unwrap();
        assert_eq!(t.search("a"), Some(9));
    }

    /// Invariant: `contains_key` and the `get`/`remove` aliases agree with search/delete.
    #[test]
    fn aliases_agree() {
        let mut t = HashTable::new();
        t.insert("k", -1).unwrap();
        assert!(t.contains_key("k"));
        assert_eq!(t.get("k"), t.search("k"));
        assert_eq!(t.remove("k"), Some(-1));
        assert!(!t.contains_key("k"));
    }

    /// Invariant: Debug renders the table as a map.
    #[test]
    fn debug_renders_map() {
        let mut t = HashTable::new();
        t.insert("foo", 1).unwrap();
        assert_eq!(format!("{t:?}"), r#"{"foo": 1}"#);
    }

    /// Invariant: load factor is count over bucket count.
    #[test]
    fn load_factor_reports_ratio() {
        let mut t = HashTable::with_size(4).unwrap();
        assert_eq!(t.load_factor(), 0.0);
        t.insert("a", 1).unwrap();
        t.insert("b", 2).unwrap();
        assert_eq!(t.load_factor(), 0.5);
    }
}
