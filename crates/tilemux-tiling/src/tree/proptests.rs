use proptest::prelude::*;
use std::collections::HashSet;

use super::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { target: usize, side: Side },
    Remove { victim: usize },
    Ratio { split: usize, ratio: f64 },
    Swap { a: usize, b: usize },
    Equalize,
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Left),
        Just(Side::Right),
        Just(Side::Top),
        Just(Side::Bottom),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<usize>(), side()).prop_map(|(target, side)| Op::Insert { target, side }),
        3 => any::<usize>().prop_map(|victim| Op::Remove { victim }),
        2 => (any::<usize>(), -2.0f64..3.0).prop_map(|(split, ratio)| Op::Ratio { split, ratio }),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Swap { a, b }),
        1 => Just(Op::Equalize),
    ]
}

fn check_structure(tree: &LayoutTree<u32>) -> Result<(), TestCaseError> {
    let order = tree.leaf_order();
    let unique: HashSet<u32> = order.iter().copied().collect();
    prop_assert_eq!(unique.len(), order.len());
    prop_assert_eq!(order.len(), tree.leaf_count());

    let splits = tree.splits();
    prop_assert_eq!(splits.len(), tree.leaf_count().saturating_sub(1));
    for split in &splits {
        prop_assert!(tree.node(split.first).is_some());
        prop_assert!(tree.node(split.second).is_some());
        prop_assert!(split.ratio >= MIN_RATIO && split.ratio <= MAX_RATIO);
    }
    let ids: HashSet<SplitId> = splits.iter().map(|s| s.id).collect();
    prop_assert_eq!(ids.len(), splits.len());
    Ok(())
}

proptest! {
    #[test]
    fn random_edits_keep_tree_well_formed(ops in prop::collection::vec(op(), 1..80)) {
        let mut tree = LayoutTree::from_leaf(0u32);
        let mut live: Vec<u32> = vec![0];
        let mut next = 1u32;

        for op in ops {
            match op {
                Op::Insert { target, side } => {
                    if live.is_empty() {
                        tree.set_single_leaf(next);
                    } else {
                        let target = live[target % live.len()];
                        prop_assert!(tree.insert_leaf(&target, next, side));
                    }
                    live.push(next);
                    next += 1;
                }
                Op::Remove { victim } => {
                    if !live.is_empty() {
                        let id = live.remove(victim % live.len());
                        prop_assert!(tree.remove_leaf(&id));
                        prop_assert!(!tree.contains(&id));
                    }
                }
                Op::Ratio { split, ratio } => {
                    let splits = tree.splits();
                    if !splits.is_empty() {
                        let id = splits[split % splits.len()].id;
                        tree.update_split_ratio(id, ratio);
                        let after = tree.split(id).map(|s| s.ratio);
                        prop_assert!(after.is_some_and(|r| (MIN_RATIO..=MAX_RATIO).contains(&r)));
                    }
                }
                Op::Swap { a, b } => {
                    if !live.is_empty() {
                        let a = live[a % live.len()];
                        let b = live[b % live.len()];
                        let before = tree.leaf_order();
                        tree.swap_leaves(&a, &b);
                        let after = tree.leaf_order();
                        let pos_a = before.iter().position(|&x| x == a);
                        let pos_b = before.iter().position(|&x| x == b);
                        prop_assert_eq!(pos_a.map(|i| after[i]), Some(b));
                        prop_assert_eq!(pos_b.map(|i| after[i]), Some(a));
                    }
                }
                Op::Equalize => {
                    tree.equalize();
                }
            }
            check_structure(&tree)?;
            let mut expected = live.clone();
            expected.sort_unstable();
            let mut actual = tree.leaf_order();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn ratio_always_clamped(ratio in prop::num::f64::ANY) {
        let mut tree = LayoutTree::from_leaf(1u32);
        tree.insert_leaf(&1, 2, Side::Right);
        let id = tree.splits()[0].id;
        tree.update_split_ratio(id, ratio);
        let stored = tree.split(id).map(|s| s.ratio).unwrap_or(f64::NAN);
        prop_assert!((MIN_RATIO..=MAX_RATIO).contains(&stored));
    }

    #[test]
    fn shape_round_trip_preserves_order(count in 1usize..24, sides in prop::collection::vec(side(), 24)) {
        let mut tree = LayoutTree::from_leaf(0usize);
        for i in 1..count {
            tree.insert_leaf(&(i - 1), i, sides[i]);
        }
        let shape = tree.to_shape();
        prop_assert!(shape.is_some());
        if let Some(shape) = shape {
            let rebuilt = LayoutTree::from_shape(&shape);
            prop_assert_eq!(rebuilt.leaf_order(), tree.leaf_order());
            prop_assert_eq!(rebuilt.to_shape(), Some(shape));
        }
    }
}
