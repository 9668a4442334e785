#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can use
// small fixed-size configurations alongside the default policy.

use crate::config::TableConfig;
use crate::hash_table::HashTable;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Delete(usize),
    Search(usize),
    Contains(String),
    Resize(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    // Keys may be empty and may contain NUL.
    proptest::collection::vec("[a-c\\x00]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Search),
            1 => prop_oneof![contains_pool, "[a-d]{0,4}"].prop_map(OpI::Contains),
            1 => (1usize..40).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn snapshot(t: &HashTable) -> BTreeMap<String, i32> {
    let mut out = BTreeMap::new();
    for (k, v) in t.iter() {
        // A key seen twice would mean a duplicate chain entry.
        assert!(out.insert(k.to_string(), v).is_none(), "duplicate key {k:?}");
    }
    out
}

fn run_state_machine(
    mut sut: HashTable,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("insert within memory");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.delete(k), model.remove(k));
                prop_assert_eq!(sut.search(k), None);
            }
            OpI::Search(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.search(k), model.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Resize(n) => {
                sut.resize(n).expect("resize within memory");
                prop_assert_eq!(sut.size(), n);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(snapshot(&sut), expected);
            }
        }

        // Post-conditions after each op: count parity with the model and with
        // what is reachable through the chains.
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let mut reachable = 0usize;
        sut.for_each(|_, _| reachable += 1);
        prop_assert_eq!(reachable, sut.len());
        prop_assert!(sut.size() >= 1);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert returns the previous value and overwrites in place.
// - delete returns the removed value; a later search is absent.
// - resize and automatic growth keep every pair exactly once.
// - len equals both the model size and the number of chain-reachable entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut = HashTable::with_size(2).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: Same state-machine invariants with one fixed bucket, so every
// key shares a chain and all unlinking happens within it.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario()) {
        let sut = HashTable::with_config(TableConfig::fixed(1)).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: after any run of inserts the load factor stays within one
// growth step of the threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_bounds_load(initial in 1usize..16, n in 0usize..500) {
        let mut t = HashTable::with_size(initial).unwrap();
        for i in 0..n {
            t.insert(&format!("key-{i}"), i as i32).unwrap();
        }
        prop_assert_eq!(t.len(), n);
        // The last insert saw (n - 1) entries at or under the threshold.
        if n > 0 {
            prop_assert!((n - 1) as f64 / t.size() as f64 <= 0.7 || t.size() == initial);
        }
        let grown = t.size() / initial;
        prop_assert_eq!(t.size() % initial, 0);
        prop_assert!(grown.is_power_of_two());
    }
}
