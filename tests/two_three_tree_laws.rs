//! Property-based tests for TwoThreeTree.
//!
//! These tests drive the tree with random operation sequences and compare
//! every observable result against `std::collections::BTreeMap`.

use std::collections::BTreeMap;

use proptest::prelude::*;
use twothree::{Handle, Location, TwoThreeTree};

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16, i32),
    Remove(i16),
}

/// Narrow keys so removals hit existing entries often.
fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-64_i16..64, any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
        2 => (-64_i16..64).prop_map(Operation::Remove),
    ]
}

fn arbitrary_entries(max_size: usize) -> impl Strategy<Value = Vec<(i16, i32)>> {
    prop::collection::vec((any::<i16>(), any::<i32>()), 0..max_size)
}

// =============================================================================
// Model Equivalence Laws
// =============================================================================

proptest! {
    /// Law: after every operation the tree is structurally valid and holds
    /// exactly what a BTreeMap holds after the same operations.
    #[test]
    fn prop_matches_btreemap_model(operations in prop::collection::vec(operation(), 0..200)) {
        let mut tree = TwoThreeTree::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    let (_, inserted) = tree.insert(key, value);
                    prop_assert_eq!(inserted, model.insert(key, value).is_none());
                }
                Operation::Remove(key) => {
                    prop_assert_eq!(tree.remove(&key), model.remove(&key));
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
            prop_assert_eq!(tree.len(), model.len());
        }

        let entries: Vec<(i16, i32)> = tree.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i16, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// Law: in-order traversal yields strictly increasing keys, forwards and
    /// backwards.
    #[test]
    fn prop_traversal_is_sorted(entries in arbitrary_entries(300)) {
        let tree: TwoThreeTree<i16, i32> = entries.into_iter().collect();
        let forward: Vec<i16> = tree.keys().copied().collect();
        let mut backward: Vec<i16> = tree.keys().rev().copied().collect();
        backward.reverse();

        prop_assert!(forward.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// Round-trip and Idempotence Laws
// =============================================================================

proptest! {
    /// Law: find after insert dereferences to the inserted pair.
    #[test]
    fn prop_find_after_insert(entries in arbitrary_entries(100), key: i16, value: i32) {
        let mut tree: TwoThreeTree<i16, i32> = entries.into_iter().collect();
        let (handle, _) = tree.insert(key, value);

        prop_assert_eq!(tree.find(&key).handle(), Some(handle));
        prop_assert_eq!(tree.dereference(Location::Entry(handle)), Ok((&key, &value)));
    }

    /// Law: inserting the same key twice leaves a single entry holding the
    /// second value.
    #[test]
    fn prop_overwrite_is_idempotent_in_size(entries in arbitrary_entries(100), key: i16) {
        let mut tree: TwoThreeTree<i16, i32> = entries.into_iter().collect();
        tree.insert(key, 1);
        let size = tree.len();
        let (_, inserted) = tree.insert(key, 2);

        prop_assert!(!inserted);
        prop_assert_eq!(tree.len(), size);
        prop_assert_eq!(tree.get(&key), Some(&2));
    }

    /// Law: inserting n distinct keys and deleting them all in any order
    /// yields an empty tree of height zero.
    #[test]
    fn prop_delete_everything(
        keys in prop::collection::btree_set(any::<i16>(), 0..150),
        seed in any::<u64>()
    ) {
        let mut tree = TwoThreeTree::new();
        let mut handles: Vec<Handle> = keys.iter().map(|&key| tree.insert(key, ()).0).collect();
        prop_assert_eq!(tree.len(), keys.len());

        // Deterministic shuffle driven by the seed.
        let mut state = seed | 1;
        for index in (1..handles.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let other = usize::try_from(state % (index as u64 + 1)).unwrap_or(0);
            handles.swap(index, other);
        }

        for handle in handles {
            prop_assert!(tree.delete(handle).is_some());
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 0);
    }

    /// Law: a deleted handle never aliases an entry created afterwards.
    #[test]
    fn prop_stale_handles_never_alias(
        keys in prop::collection::btree_set(0_i16..1000, 1..60),
        fresh in prop::collection::vec(1000_i16..2000, 1..60)
    ) {
        let mut tree = TwoThreeTree::new();
        let handles: Vec<Handle> = keys.iter().map(|&key| tree.insert(key, key).0).collect();
        for &handle in &handles {
            tree.delete(handle);
        }
        for key in fresh {
            tree.insert(key, key);
        }
        for handle in handles {
            prop_assert_eq!(tree.get_handle(handle), None);
            prop_assert!(!tree.is_live(Location::Entry(handle)));
        }
    }

    /// Law: entry count equals successful inserts minus successful deletes.
    #[test]
    fn prop_size_conservation(operations in prop::collection::vec(operation(), 0..200)) {
        let mut tree = TwoThreeTree::new();
        let mut inserted = 0_usize;
        let mut deleted = 0_usize;
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    if tree.insert(key, value).1 {
                        inserted += 1;
                    }
                }
                Operation::Remove(key) => {
                    if tree.remove(&key).is_some() {
                        deleted += 1;
                    }
                }
            }
        }
        prop_assert_eq!(tree.len(), inserted - deleted);
    }
}

// =============================================================================
// Range Laws
// =============================================================================

proptest! {
    /// Law: range agrees with BTreeMap::range for ordered bounds.
    #[test]
    fn prop_range_matches_model(entries in arbitrary_entries(200), start: i16, end: i16) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let tree: TwoThreeTree<i16, i32> = entries.iter().copied().collect();
        let model: BTreeMap<i16, i32> = entries.into_iter().collect();

        let actual: Vec<i16> = tree.range(start..=end).map(|(key, _)| *key).collect();
        let expected: Vec<i16> = model.range(start..=end).map(|(key, _)| *key).collect();
        prop_assert_eq!(&actual, &expected);

        let reversed: Vec<i16> = tree.range(start..=end).rev().map(|(key, _)| *key).collect();
        let mut forward = reversed;
        forward.reverse();
        prop_assert_eq!(forward, expected);
    }
}
