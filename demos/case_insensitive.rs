use std::cmp::Ordering;

use rb_tree_map::{Comparator, ReverseComparator, TreeSet};

/// Orders ASCII strings ignoring case.
#[derive(Debug, Clone, Copy, Default)]
struct CaseInsensitive;

impl Comparator<String> for CaseInsensitive {
    fn compare(&self, a: &String, b: &String) -> Ordering {
        a.bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    }
}

fn main() {
    let mut names = TreeSet::with_comparator(CaseInsensitive);
    for name in ["bob", "Alice", "carol", "ALICE", "Dave", "BOB"] {
        let _ignore = names.insert(name.to_string());
    }
    assert_eq!(names.len(), 4);
    assert!(names.contains(&"CAROL".to_string()));
    assert_eq!(names.lower_bound(&"c".to_string()), Some(&"carol".to_string()));
    println!("{names:?}");

    let mut reversed = TreeSet::with_comparator(ReverseComparator(CaseInsensitive));
    reversed.extend(names);
    let order: Vec<_> = reversed.iter().map(String::as_str).collect();
    assert_eq!(order, ["Dave", "carol", "bob", "Alice"]);
}
