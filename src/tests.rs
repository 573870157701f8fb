use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use index::NodeIndex;
use node::{Color, Node};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;

struct KeyGenerator {
    rng: StdRng,
    unique: HashSet<i32>,
    limit: i32,
}

impl KeyGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 100_000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> i32 {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> i32 {
        let mut key = self.next();
        while self.unique.contains(&key) {
            key = self.next();
        }
        self.unique.insert(key);
        key
    }
}

impl<V, C: Comparator<i32>, Ix: IndexType> TreeMap<i32, V, C, Ix> {
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    fn check_rb_properties(&self) {
        assert!(matches!(
            self.node_ref(self.root, Node::color),
            Color::Black
        ));
        assert!(self.node_ref(NodeIndex::sentinel(), Node::is_black));
        self.check_children_color(self.root);
        self.check_black_height(self.root);
    }

    fn check_children_color(&self, x: NodeIndex<Ix>) {
        if x.is_sentinel() {
            return;
        }
        self.check_children_color(self.node_ref(x, Node::left));
        self.check_children_color(self.node_ref(x, Node::right));
        if self.node_ref(x, Node::is_red) {
            assert!(matches!(self.left_ref(x, Node::color), Color::Black));
            assert!(matches!(self.right_ref(x, Node::color), Color::Black));
        }
    }

    fn check_black_height(&self, x: NodeIndex<Ix>) -> usize {
        if x.is_sentinel() {
            return 0;
        }
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }

    /// Parent links mirror child links, keys are strictly ordered by the comparator
    /// and `len` counts the nodes.
    fn check_structure(&self) {
        assert!(self.node_ref(self.root, Node::parent).is_sentinel());
        let count = self.check_links(self.root, None, None);
        assert_eq!(count, self.len());
    }

    fn check_links(&self, x: NodeIndex<Ix>, low: Option<&i32>, high: Option<&i32>) -> usize {
        if x.is_sentinel() {
            return 0;
        }
        let key = self.node_ref(x, Node::key);
        if let Some(low) = low {
            assert_eq!(self.cmp.compare(low, key), Ordering::Less);
        }
        if let Some(high) = high {
            assert_eq!(self.cmp.compare(key, high), Ordering::Less);
        }
        let left = self.node_ref(x, Node::left);
        let right = self.node_ref(x, Node::right);
        for child in [left, right] {
            if !child.is_sentinel() {
                assert_eq!(self.node_ref(child, Node::parent), x);
            }
        }
        1 + self.check_links(left, low, Some(key)) + self.check_links(right, Some(key), high)
    }

    fn check_all(&self) {
        if !self.is_empty() {
            self.check_rb_properties();
        }
        self.check_structure();
    }

    fn keys_by_handles(&self) -> Vec<i32> {
        let mut keys = vec![];
        let mut cur = self.min();
        while let Some(x) = cur {
            keys.push(*self.key_at(x).unwrap());
            cur = self.next(x);
        }
        keys
    }

    fn keys_by_handles_rev(&self) -> Vec<i32> {
        let mut keys = vec![];
        let mut cur = self.max();
        while let Some(x) = cur {
            keys.push(*self.key_at(x).unwrap());
            cur = self.prev(x);
        }
        keys
    }
}

fn with_map_and_generator<V>(test_fn: impl Fn(TreeMap<i32, V>, KeyGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = KeyGenerator::new(seed);
        let map = TreeMap::new();
        test_fn(map, gen);
    }
}

fn key_of<V, C, Ix: IndexType>(map: &TreeMap<i32, V, C, Ix>, x: Option<NodeIndex<Ix>>) -> Option<i32> {
    x.and_then(|x| map.key_at(x)).copied()
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_map_and_generator(|mut map, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys.clone() {
            let _ignore = map.insert(k, ());
            map.check_all();
        }
        for k in keys.iter().step_by(2) {
            let _ignore = map.remove(k);
            map.check_all();
        }
        assert_eq!(map.len(), 500);
    });
}

#[test]
fn map_len_will_update() {
    with_map_and_generator(|mut map, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for k in keys.clone() {
            let _ignore = map.insert(k, ());
        }
        assert_eq!(map.len(), 100);
        for k in keys {
            let _ignore = map.remove(&k);
        }
        assert_eq!(map.len(), 0);
        assert_eq!(map.min(), None);
    });
}

#[test]
fn remove_non_exist_key_will_do_nothing() {
    with_map_and_generator(|mut map, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys {
            let _ignore = map.insert(k, ());
        }
        assert_eq!(map.len(), 1000);
        let to_remove: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in to_remove {
            assert_eq!(map.remove(&k), None);
        }
        assert_eq!(map.len(), 1000);
        map.check_all();
    });
}

#[test]
fn iterate_through_map_is_sorted() {
    with_map_and_generator(|mut map, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(1000)
            .collect();
        for (v, k) in keys.clone() {
            let _ignore = map.insert(k, v);
        }
        keys.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        assert_eq!(map.iter().count(), keys.len());
        for ((ek, ev), (v, k)) in map.iter().zip(keys.iter()) {
            assert_eq!(ek, k);
            assert_eq!(ev, v);
        }
        for ((ek, ev), (v, k)) in map.iter().rev().zip(keys.iter().rev()) {
            assert_eq!(ek, k);
            assert_eq!(ev, v);
        }
        let sorted: Vec<_> = keys.iter().map(|(_, k)| *k).collect();
        assert_eq!(map.keys_by_handles(), sorted);
        let mut reversed = sorted.clone();
        reversed.reverse();
        assert_eq!(map.keys_by_handles_rev(), reversed);
    });
}

#[test]
fn lower_bound_matches_btree_map() {
    with_map_and_generator(|mut map, mut gen| {
        let mut model = BTreeMap::new();
        for _ in 0..1000 {
            let k = gen.next();
            let _ignore = map.insert(k, k);
            let _ignore = model.insert(k, k);
        }
        for _ in 0..1000 {
            let probe = gen.next();
            let expect = model.range(probe..).next().map(|(k, _)| *k);
            assert_eq!(key_of(&map, map.lower_bound(&probe)), expect);
        }
        assert_eq!(map.lower_bound(&i32::MAX), None);
        assert_eq!(key_of(&map, map.lower_bound(&i32::MIN)), model.keys().next().copied());
    });
}

#[test]
fn mixed_operations_keep_invariants() {
    with_map_and_generator(|mut map, mut gen| {
        let mut model = BTreeMap::new();
        for _ in 0..3000 {
            let k = gen.next() % 500;
            if gen.rng.gen_bool(0.6) {
                assert_eq!(map.insert(k, k * 2), model.insert(k, k * 2));
            } else {
                assert_eq!(map.remove(&k), model.remove(&k));
            }
            assert_eq!(map.len(), model.len());
        }
        map.check_all();
        assert!(map.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));
    });
}

#[test]
fn ordering_and_bounds() {
    let mut map = TreeMap::new();
    for k in [20, 10, 30, 5, 15, 25, 35] {
        map.insert(k, k);
    }
    assert_eq!(key_of(&map, map.min()), Some(5));
    assert_eq!(key_of(&map, map.max()), Some(35));
    assert_eq!(key_of(&map, map.lower_bound(&12)), Some(15));
    assert_eq!(key_of(&map, map.lower_bound(&20)), Some(20));
    assert_eq!(map.lower_bound(&40), None);
    assert_eq!(map.lower_bound_entry(&12), Some((&15, &15)));
    map.check_all();
}

#[test]
fn removal_of_leaf_single_and_double_child_nodes() {
    let mut map = TreeMap::new();
    for k in [20, 10, 30, 5, 15, 40] {
        map.insert(k, 0);
    }
    assert_eq!(map.remove(&5), Some(0));
    assert_eq!(map.get(&5), None);
    assert_eq!(map.len(), 5);
    map.check_all();

    assert_eq!(map.remove(&30), Some(0));
    assert_eq!(map.get(&30), None);
    assert!(map.contains_key(&40));
    map.check_all();

    assert_eq!(map.remove(&20), Some(0));
    assert_eq!(map.get(&20), None);
    assert!(map.contains_key(&15));
    assert!(map.contains_key(&40));
    assert_eq!(map.len(), 3);
    map.check_all();
}

#[test]
fn descending_inserts_iterate_ascending() {
    let mut map = TreeMap::new();
    for k in (1..=5).rev() {
        map.insert(k, k);
    }
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(map.keys_by_handles(), vec![1, 2, 3, 4, 5]);
    map.check_all();
}

#[test]
fn tree_map_clear_is_ok() {
    let mut map = TreeMap::new();
    map.insert(1, 1);
    map.insert(2, 2);
    map.insert(6, 3);
    assert_eq!(map.len(), 3);
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.nodes.len(), 1);
    assert!(map.nodes[0].is_vacant());
    for k in [1, 2, 6] {
        assert_eq!(map.get(&k), None);
    }
    map.clear();
    assert!(map.is_empty());
    map.insert(7, 7);
    assert_eq!(map.get(&7), Some(&7));
}

#[test]
fn duplicate_insert_overwrites_value() {
    let mut map = TreeMap::new();
    assert_eq!(map.insert(10, "first"), None);
    assert_eq!(map.insert(10, "second"), Some("first"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&10), Some(&"second"));
}

#[test]
fn successor_handle_survives_two_child_removal() {
    let mut map = TreeMap::new();
    for k in [20, 10, 30, 5, 15, 25, 35] {
        map.insert(k, k);
    }
    let succ = map.find(&25).unwrap();
    assert_eq!(map.remove(&20), Some(20));
    assert_eq!(map.key_at(succ), Some(&25));
    assert_eq!(map.value_at(succ), Some(&25));
    assert_eq!(map.find(&25), Some(succ));
    map.check_all();
}

#[test]
fn stale_handle_is_rejected() {
    let mut map = TreeMap::new();
    for k in 0..10 {
        map.insert(k, k);
    }
    let x = map.find(&4).unwrap();
    assert_eq!(map.remove_at(x), Some((4, 4)));
    assert_eq!(map.key_at(x), None);
    assert_eq!(map.next(x), None);
    assert_eq!(map.prev(x), None);
    assert_eq!(map.remove_at(x), None);
    assert_eq!(map.key_at(NodeIndex::new(1000)), None);
    assert_eq!(map.len(), 9);
    map.check_all();
}

#[test]
fn remove_while_walking_with_captured_successor() {
    let mut map: TreeMap<i32, i32> = (0..200).map(|k| (k, k)).collect();
    let mut cur = map.min();
    while let Some(x) = cur {
        cur = map.next(x);
        if map.key_at(x).is_some_and(|k| k % 3 != 0) {
            let _ignore = map.remove_at(x);
            map.check_all();
        }
    }
    let expect: Vec<_> = (0..200).filter(|k| k % 3 == 0).collect();
    assert_eq!(map.keys_by_handles(), expect);
}

#[test]
fn vacant_slots_are_reused() {
    let mut map = TreeMap::new();
    for k in 0..100 {
        map.insert(k, ());
    }
    for k in 0..50 {
        map.remove(&k);
    }
    let slots = map.nodes.len();
    for k in 100..150 {
        map.insert(k, ());
    }
    assert_eq!(map.nodes.len(), slots);
    assert_eq!(map.len(), 100);
    map.check_all();
}

#[test]
fn index_overflow_leaves_map_unchanged() {
    let _ = simplelog::SimpleLogger::init(simplelog::LevelFilter::Warn, simplelog::Config::default());
    let mut map: TreeMap<i32, i32, OrdComparator, u16> =
        TreeMap::with_capacity_and_comparator(0, OrdComparator);
    let capacity = i32::from(u16::MAX) - 1;
    for k in 0..capacity {
        assert_eq!(map.try_insert(k, k), Ok(None));
    }
    assert_eq!(map.try_insert(capacity, 0), Err(AllocError::IndexOverflow));
    assert_eq!(map.len(), capacity as usize);
    assert_eq!(map.get(&capacity), None);
    // overwriting needs no new node
    assert_eq!(map.try_insert(0, -1), Ok(Some(0)));
    assert_eq!(map.remove(&1), Some(1));
    assert_eq!(map.try_insert(capacity, 0), Ok(None));
    map.check_all();
}

#[test]
#[should_panic(expected = "maximum number of nodes")]
fn insert_panics_on_index_overflow() {
    let mut map: TreeMap<i32, (), OrdComparator, u16> = TreeMap::default();
    for k in 0..i32::from(u16::MAX) {
        map.insert(k, ());
    }
}

#[test]
fn custom_comparator_orders_keys() {
    let mut map = TreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for k in [3, 1, 4, 1, 5, 9, 2, 6] {
        map.insert(k, ());
    }
    assert_eq!(map.keys_by_handles(), vec![9, 6, 5, 4, 3, 2, 1]);
    // lower bound follows the comparator: first key not before 7 is 6
    assert_eq!(key_of(&map, map.lower_bound(&7)), Some(6));
    map.check_all();
}

#[test]
fn entry_api_inserts_and_modifies() {
    let mut map = TreeMap::new();
    for word in ["b", "a", "c", "a", "b", "a"] {
        *map.entry(word).or_insert(0) += 1;
    }
    assert_eq!(map.get(&"a"), Some(&3));
    assert_eq!(map.get(&"b"), Some(&2));
    assert_eq!(map.get(&"c"), Some(&1));

    map.entry("c").and_modify(|v| *v *= 10).or_default();
    assert_eq!(map.get(&"c"), Some(&10));
    assert_eq!(*map.entry("d").or_insert_with(|| 7), 7);
    assert_eq!(map.entry("d").key(), &"d");

    match map.entry("b") {
        Entry::Occupied(mut entry) => {
            assert_eq!(entry.insert(20), 2);
            assert_eq!(entry.get(), &20);
        }
        Entry::Vacant(_) => unreachable!(),
    }
    if let Entry::Occupied(entry) = map.entry("a") {
        assert_eq!(entry.remove(), 3);
    }
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b", "c", "d"]);
}

#[test]
fn range_from_and_pops() {
    let mut map: TreeMap<i32, ()> = (0..10).map(|k| (k * 10, ())).collect();
    let keys: Vec<_> = map.range_from(&35).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![40, 50, 60, 70, 80, 90]);
    let keys: Vec<_> = map.range_from(&35).rev().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![90, 80, 70, 60, 50, 40]);
    assert_eq!(map.range_from(&91).next(), None);

    assert_eq!(map.pop_first(), Some((0, ())));
    assert_eq!(map.pop_last(), Some((90, ())));
    assert_eq!(map.first_key_value(), Some((&10, &())));
    assert_eq!(map.last_key_value(), Some((&80, &())));
    map.check_all();
}

#[test]
fn into_iter_yields_owned_entries_from_both_ends() {
    let map: TreeMap<i32, String> = (1..=4).map(|k| (k, k.to_string())).collect();
    let mut iter = map.into_iter();
    assert_eq!(iter.next(), Some((1, "1".to_string())));
    assert_eq!(iter.next_back(), Some((4, "4".to_string())));
    assert_eq!(iter.collect::<Vec<_>>(), vec![(2, "2".to_string()), (3, "3".to_string())]);
}

#[test]
fn shuffled_drain_keeps_invariants() {
    let mut rng = StdRng::from_seed([7; 32]);
    let mut keys: Vec<i32> = (0..2000).collect();
    keys.shuffle(&mut rng);
    let mut map = TreeMap::with_capacity(keys.len());
    for k in &keys {
        map.insert(*k, ());
    }
    keys.shuffle(&mut rng);
    for k in &keys {
        assert_eq!(map.remove(k), Some(()));
        if k % 100 == 0 {
            map.check_all();
        }
    }
    assert!(map.is_empty());
    map.check_all();
}

#[test]
fn debug_and_equality() {
    let a: TreeMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    let mut b = TreeMap::new();
    b.insert(1, 'a');
    b.insert(2, 'b');
    assert_eq!(a, b);
    assert_eq!(format!("{a:?}"), "{1: 'a', 2: 'b'}");
    assert_eq!(a[&2], 'b');
    b.insert(3, 'c');
    assert_ne!(a, b);
}
