//! Integration tests for sharing a tree across threads.

#![cfg(feature = "sync")]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use rstest::rstest;
use std::thread;
use twothree::{Location, SharedTree, TwoThreeTree};

#[rstest]
fn test_concurrent_writers_insert_disjoint_keys() {
    let shared: SharedTree<u32, u32> = SharedTree::default();

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for key in 0..250 {
                    shared.write().insert(worker * 1000 + key, worker);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("Thread panicked");
    }

    let tree = shared.into_inner().expect("all clones dropped");
    assert_eq!(tree.len(), 2000);
    assert_eq!(tree.check_invariants(), Ok(()));
    assert_eq!(tree.get(&7249), Some(&7));
}

#[rstest]
fn test_concurrent_readers_see_consistent_tree() {
    let shared = SharedTree::from((0..500).map(|key| (key, key * 2)).collect::<TwoThreeTree<i64, i64>>());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let tree = shared.read();
                let total: i64 = tree.values().sum();
                assert_eq!(tree.check_invariants(), Ok(()));
                total
            })
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().expect("Thread panicked"), 249_500);
    }
}

#[rstest]
fn test_location_outlives_guard_and_detects_deletion() {
    let shared: SharedTree<i32, &str> = SharedTree::default();
    let location = {
        let mut tree = shared.write();
        tree.insert(1, "one");
        Location::Entry(tree.insert(2, "two").0)
    };

    let remover = {
        let shared = shared.clone();
        thread::spawn(move || shared.write().remove(&2))
    };
    assert_eq!(remover.join().expect("Thread panicked"), Some("two"));

    let tree = shared.read();
    assert!(!tree.is_live(location));
    assert!(tree.dereference(location).is_err());
}

#[rstest]
fn test_mixed_readers_and_writers() {
    let shared: SharedTree<usize, usize> = SharedTree::default();

    let writers: Vec<_> = (0..2)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for key in 0..300 {
                    let key = key * 2 + worker;
                    shared.write().insert(key, key);
                    if key % 3 == 0 {
                        shared.write().remove(&key);
                    }
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..2)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let tree = shared.read();
                    assert_eq!(tree.check_invariants(), Ok(()));
                }
            })
        })
        .collect();
    for worker in writers.into_iter().chain(readers) {
        worker.join().expect("Thread panicked");
    }

    let tree = shared.read();
    assert_eq!(tree.len(), 400);
    assert!(tree.keys().all(|key| key % 3 != 0));
}
