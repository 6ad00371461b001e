//! Very deep reporting chains.
//!
//! No test subscriber here: per-record trace spans would dominate the runtime.

use orgtree::domain::{build_hierarchy, forest_node_count, HierarchyNode, PersonRecord};
use orgtree::util::testing::person;

fn chain(depth: usize) -> Vec<PersonRecord> {
    let mut records = vec![person("0", "root", None)];
    for i in 1..depth {
        records.push(person(&i.to_string(), "n", Some(&(i - 1).to_string())));
    }
    records
}

#[test]
fn given_100k_chain_when_building_and_dropping_forest_then_does_not_overflow() {
    // Arrange
    let depth = 100_000;
    let records = chain(depth);

    // Act
    let forest = build_hierarchy(&records).unwrap();

    // Assert
    assert_eq!(forest.len(), 1);
    assert_eq!(forest_node_count(&forest), depth);
    let deepest = forest[0].iter().last().unwrap();
    assert_eq!(deepest.id(), (depth - 1).to_string());
    assert_eq!(deepest.level, depth - 1);

    drop(forest);
}

#[test]
fn given_deep_subtree_when_dropping_detached_node_then_does_not_overflow() {
    let mut forest = build_hierarchy(&chain(100_000)).unwrap();

    let subtree: HierarchyNode = forest[0].children.pop().unwrap();
    drop(forest);

    assert_eq!(subtree.level, 1);
    drop(subtree);
}
