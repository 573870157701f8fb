use super::*;

use node::Node;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_tree<V, C>(t: &TreeMap<u16, V, C>) {
    if t.root.is_sentinel() {
        assert_eq!(t.len(), 0, "empty tree must have zero length");
        return;
    }
    assert!(t.node_ref(t.root, Node::is_black), "root must be black");
    assert!(
        t.node_ref(t.root, Node::parent).is_sentinel(),
        "root must have no parent"
    );

    // (node, black nodes above it)
    let mut stack = vec![(t.root, 0usize)];
    let mut black_height = None;
    let mut count = 0usize;
    while let Some((x, above)) = stack.pop() {
        count += 1;
        let node = &t.nodes[x.index()];
        assert!(!node.is_vacant(), "linked node must hold an entry");
        let depth = above + usize::from(node.is_black());
        for child in [node.left(), node.right()] {
            if child.is_sentinel() {
                match black_height {
                    None => black_height = Some(depth),
                    Some(h) => assert_eq!(h, depth, "black height differs between paths"),
                }
                continue;
            }
            let child_node = &t.nodes[child.index()];
            assert_eq!(child_node.parent(), x, "child must point back at its parent");
            assert!(
                node.is_black() || child_node.is_black(),
                "red node must not have a red child"
            );
            stack.push((child, depth));
        }
    }
    assert_eq!(count, t.len(), "len must match the linked node count");
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    LowerBound(u16),
    PopFirst,
    PopLast,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // a narrow key range makes hits and overwrites common
    let key = 0u16..512;
    let op = prop_oneof![
        45 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        12 => key.clone().prop_map(Op::Get),
        12 => key.clone().prop_map(Op::LowerBound),
        3 => Just(Op::PopFirst),
        3 => Just(Op::PopLast),
    ];
    prop::collection::vec(op, 0..=1500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btree_map(ops in ops_strategy()) {
        let mut t: TreeMap<u16, u32> = TreeMap::new();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(key, value), m.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
                Op::LowerBound(key) => {
                    let got = t.lower_bound_entry(&key);
                    let expected = m.range(key..).next();
                    prop_assert_eq!(got, expected);
                }
                Op::PopFirst => {
                    prop_assert_eq!(t.pop_first(), m.pop_first());
                }
                Op::PopLast => {
                    prop_assert_eq!(t.pop_last(), m.pop_last());
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
        let got_rev: Vec<u16> = t.keys().rev().copied().collect();
        let expected_rev: Vec<u16> = m.keys().rev().copied().collect();
        prop_assert_eq!(got_rev, expected_rev);
    }

    #[test]
    fn prop_handles_follow_removals(keys in prop::collection::btree_set(any::<u16>(), 1..300), stride in 1usize..5) {
        let mut t: TreeMap<u16, ()> = keys.iter().map(|k| (*k, ())).collect();
        let mut kept = Vec::new();
        let mut cur = t.min();
        let mut i = 0usize;
        while let Some(x) = cur {
            cur = t.next(x);
            let key = *t.key_at(x).expect("handle from a walk is live");
            if i % stride == 0 {
                prop_assert_eq!(t.remove_at(x), Some((key, ())));
                prop_assert_eq!(t.key_at(x), None);
            } else {
                kept.push(key);
            }
            i += 1;
        }
        validate_tree(&t);
        prop_assert_eq!(t.keys().copied().collect::<Vec<_>>(), kept);
    }
}

#[test]
fn every_insert_order_of_small_set_balances() {
    let keys = [1u16, 2, 3, 4, 5, 6];
    for_each_permutation(&keys, |order| {
        let mut t = TreeMap::new();
        for k in &order {
            t.insert(*k, ());
            validate_tree(&t);
        }
        for k in order.iter().rev() {
            assert_eq!(t.remove(k), Some(()));
            validate_tree(&t);
        }
        assert!(t.is_empty());
    });
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}
