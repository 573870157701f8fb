use rb_tree_map::TreeMap;

const TEXT: &str = "the quick brown fox jumps over the lazy dog the fox naps";

fn main() {
    let mut counts = TreeMap::new();
    for word in TEXT.split_whitespace() {
        *counts.entry(word).or_insert(0u32) += 1;
    }

    for (word, n) in &counts {
        println!("{word:>6} {n}");
    }

    // everything from "l" onwards
    let tail: Vec<_> = counts.range_from(&"l").map(|(w, _)| *w).collect();
    assert_eq!(tail, ["lazy", "naps", "over", "quick", "the"]);

    // drop the rare words while walking the handles
    let mut cur = counts.min();
    while let Some(x) = cur {
        cur = counts.next(x);
        if counts.value_at(x) == Some(&1) {
            let _ignore = counts.remove_at(x);
        }
    }
    assert_eq!(counts.keys().copied().collect::<Vec<_>>(), ["fox", "the"]);
    assert_eq!(counts[&"the"], 3);
}
