use std::collections::BTreeSet;

use mway_tree::{MwayTreeSet, TreeError};
use proptest::prelude::*;

/// Generates keys in a range narrow enough to force collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    First,
    Last,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
    ]
}

// ─── Model-based comparison against std::collections::BTreeSet ───────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays a random sequence of operations on both MwayTreeSet and
    /// BTreeSet and asserts identical results at every step, across orders.
    #[test]
    fn set_ops_match_btreeset(
        order in 3usize..=16,
        ops in proptest::collection::vec(set_op_strategy(), 1..2_000),
    ) {
        let mut mw_set: MwayTreeSet<i64> = MwayTreeSet::new(order).unwrap();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(mw_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(mw_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(mw_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(mw_set.first(), bt_set.first(), "first()");
                }
                SetOp::Last => {
                    prop_assert_eq!(mw_set.last(), bt_set.last(), "last()");
                }
            }
            prop_assert_eq!(mw_set.len(), bt_set.len());
        }

        let collected: Vec<i64> = mw_set.iter().copied().collect();
        let expected: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(collected, expected);
    }

    /// Inserting a key set and erasing all of it leaves a single empty root.
    #[test]
    fn erasing_everything_restores_the_empty_root(
        keys in proptest::collection::btree_set(value_strategy(), 0..500),
    ) {
        let mut set: MwayTreeSet<i64> = MwayTreeSet::new(5).unwrap();
        for &key in &keys {
            prop_assert!(set.insert(key));
        }
        prop_assert_eq!(set.len(), keys.len());

        // Erase in the reverse of insertion order.
        for &key in keys.iter().rev() {
            prop_assert!(set.remove(&key));
        }

        prop_assert!(set.is_empty());
        prop_assert_eq!(set.height(), 1);
        prop_assert_eq!(set.iter().next(), None);
    }

    /// The visitor API and the iterator agree on content and order.
    #[test]
    fn traverse_matches_iter(keys in proptest::collection::vec(value_strategy(), 0..500)) {
        let mut set: MwayTreeSet<i64> = MwayTreeSet::new(7).unwrap();
        for &key in &keys {
            set.insert(key);
        }

        let mut visited = Vec::new();
        set.traverse(|&key: &i64| visited.push(key));
        let iterated: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(&visited, &iterated);

        let mut expected: Vec<i64> = keys.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(iterated, expected);
    }
}

// ─── Deterministic scenarios ─────────────────────────────────────────────────

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mixed_insert_erase_scenario_at_order_three() {
        let mut set = MwayTreeSet::new(3).unwrap();
        for key in [20, 10, 30, 15, 5, 7, 26, 35] {
            assert!(set.insert(key));
        }

        assert!(set.remove(&15));

        assert!(!set.contains(&15));
        assert!(set.contains(&5));
        let mut keys = Vec::new();
        set.traverse(|&key: &i32| keys.push(key));
        assert_eq!(keys, vec![5, 7, 10, 20, 26, 30, 35]);
    }

    #[test]
    fn rejects_orders_below_three() {
        assert_eq!(MwayTreeSet::<i32>::new(0).unwrap_err(), TreeError::InvalidOrder(0));
        assert_eq!(MwayTreeSet::<i32>::new(2).unwrap_err(), TreeError::InvalidOrder(2));
        assert_eq!(
            MwayTreeSet::with_comparator(1, |a: &i32, b: &i32| a < b).unwrap_err(),
            TreeError::InvalidOrder(1)
        );
        assert!(MwayTreeSet::<i32>::new(3).is_ok());
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = MwayTreeSet::new(4).unwrap();
        assert!(set.insert("key"));
        assert!(!set.insert("key"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn reverse_comparator_orders_descending() {
        let mut set = MwayTreeSet::with_comparator(4, |a: &i32, b: &i32| a > b).unwrap();
        set.extend([3, 1, 4, 1, 5, 9, 2, 6]);

        let keys: Vec<i32> = set.iter().copied().collect();
        assert_eq!(keys, vec![9, 6, 5, 4, 3, 2, 1]);
        assert_eq!(set.first(), Some(&9));
        assert_eq!(set.last(), Some(&1));
        assert!(set.contains(&5));
        assert!(set.remove(&5));
        assert!(!set.contains(&5));
    }

    #[test]
    fn get_returns_the_stored_key_under_a_coarse_comparator() {
        let mut set = MwayTreeSet::with_comparator(4, |a: &&str, b: &&str| a.len() < b.len()).unwrap();
        assert!(set.insert("kiwi"));
        assert!(set.insert("fig"));

        // "plum" compares equal to "kiwi" by length; the original stays.
        assert!(!set.insert("plum"));
        assert_eq!(set.get(&"plum"), Some(&"kiwi"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn debug_formats_as_a_set() {
        let mut set = MwayTreeSet::new(3).unwrap();
        set.extend([2, 1, 3]);
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    }

    #[test]
    fn clone_is_independent() {
        let mut set = MwayTreeSet::new(3).unwrap();
        set.extend(0..50);
        let snapshot = set.clone();

        for key in 0..25 {
            set.remove(&key);
        }

        assert_eq!(set.len(), 25);
        assert_eq!(snapshot.len(), 50);
        assert!(snapshot.contains(&0));
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut set = MwayTreeSet::new(3).unwrap();
        set.extend(0..100);
        assert!(set.height() > 1);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.height(), 1);
        assert_eq!(set.iter().next(), None);

        // Still usable after the reset.
        assert!(set.insert(7));
        assert!(set.contains(&7));
    }

    #[test]
    fn iterator_is_exact_size_and_fused() {
        let mut set = MwayTreeSet::new(4).unwrap();
        set.extend(0..10);

        let mut iter = set.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 8);

        let rest: Vec<i32> = iter.by_ref().copied().collect();
        assert_eq!(rest, (2..10).collect::<Vec<_>>());
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn borrowed_into_iterator() {
        let mut set = MwayTreeSet::new(5).unwrap();
        set.extend([30, 10, 20]);

        let mut seen = Vec::new();
        for &key in &set {
            seen.push(key);
        }
        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn bulk_ascending_inserts_stay_shallow() {
        let mut set = MwayTreeSet::new(3).unwrap();
        for key in 0..1_000 {
            set.insert(key);
        }

        assert_eq!(set.len(), 1_000);
        // Order 3 guarantees at least two-way fanout below the root.
        assert!(set.height() <= 12, "height {} out of bounds", set.height());
        assert_eq!(set.first(), Some(&0));
        assert_eq!(set.last(), Some(&999));
    }
}
