//! Tests for HierarchyBuilder

use rstest::rstest;
use serde_json::json;

use orgtree::domain::{
    build_hierarchy, flatten, forest_node_count, DomainError, HierarchyBuilder, HierarchyIssue,
    HierarchyNode, PersonRecord,
};
use orgtree::util::testing::{init_test_setup, person, person_with_raw_manager};

fn ids(nodes: &[HierarchyNode]) -> Vec<&str> {
    nodes.iter().map(HierarchyNode::id).collect()
}

fn assert_levels_consistent(forest: &[HierarchyNode]) {
    for root in forest {
        assert_eq!(root.level, 0, "root {} must have level 0", root.id());
    }
    for node in flatten(forest) {
        for child in &node.children {
            assert_eq!(
                child.level,
                node.level + 1,
                "edge {} -> {}",
                node.id(),
                child.id()
            );
        }
    }
}

// ============================================================
// Basic construction
// ============================================================

#[test]
fn given_empty_input_when_building_then_returns_empty_forest() {
    init_test_setup();

    let forest = build_hierarchy(&[]).unwrap();

    assert!(forest.is_empty());
}

#[test]
fn given_ceo_vp_eng_chain_when_building_then_nests_with_levels() {
    // Arrange
    let records = vec![
        person("1", "CEO", None),
        person("2", "VP", Some("1")),
        person("3", "Eng", Some("2")),
    ];

    // Act
    let forest = build_hierarchy(&records).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec!["1"]);
    let ceo = &forest[0];
    assert_eq!(ceo.level, 0);
    assert_eq!(ids(&ceo.children), vec!["2"]);
    let vp = &ceo.children[0];
    assert_eq!(vp.level, 1);
    assert_eq!(ids(&vp.children), vec!["3"]);
    let eng = &vp.children[0];
    assert_eq!(eng.level, 2);
    assert!(eng.children.is_empty());
    assert_eq!(eng.label("name"), "Eng");
}

#[test]
fn given_children_before_managers_when_building_then_levels_follow_tree() {
    // Arrange: deepest record first, root last
    let records = vec![
        person("d", "D", Some("c")),
        person("c", "C", Some("b")),
        person("b", "B", Some("a")),
        person("a", "A", None),
    ];

    // Act
    let forest = build_hierarchy(&records).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec!["a"]);
    let d = forest[0].find("d").unwrap();
    assert_eq!(d.level, 3);
    assert_levels_consistent(&forest);
}

#[test]
fn given_mixed_records_when_building_then_every_record_appears_once() {
    let records = vec![
        person("1", "CEO", None),
        person("2", "CTO", Some("1")),
        person("3", "CFO", Some("1")),
        person("4", "Dev", Some("2")),
        person("5", "Dev", Some("2")),
        person("6", "Contractor", Some("missing")),
        person("7", "Board", None),
    ];

    let forest = build_hierarchy(&records).unwrap();

    assert_eq!(forest_node_count(&forest), records.len());
    let mut seen: Vec<&str> = flatten(&forest).into_iter().map(HierarchyNode::id).collect();
    seen.sort();
    assert_eq!(seen, vec!["1", "2", "3", "4", "5", "6", "7"]);
    assert_levels_consistent(&forest);
}

// ============================================================
// Ordering
// ============================================================

#[test]
fn given_several_roots_when_building_then_root_order_is_first_seen() {
    let records = vec![
        person("b", "B", None),
        person("x", "X", Some("b")),
        person("orphan", "O", Some("nobody")),
        person("a", "A", None),
    ];

    let forest = build_hierarchy(&records).unwrap();

    assert_eq!(ids(&forest), vec!["b", "orphan", "a"]);
}

#[test]
fn given_several_reports_when_building_then_child_order_is_first_seen() {
    let records = vec![
        person("r3", "R3", Some("boss")),
        person("boss", "Boss", None),
        person("r1", "R1", Some("boss")),
        person("r2", "R2", Some("boss")),
    ];

    let forest = build_hierarchy(&records).unwrap();

    assert_eq!(ids(&forest[0].children), vec!["r3", "r1", "r2"]);
}

// ============================================================
// Manager reference shapes
// ============================================================

#[rstest]
#[case::bare_string(json!("1"))]
#[case::embedded_object(json!({"id": "1"}))]
#[case::embedded_with_payload(json!({"id": "1", "name": "CEO"}))]
#[case::numeric(json!(1))]
#[case::embedded_numeric(json!({"id": 1}))]
fn given_manager_shape_when_building_then_resolves_to_same_parent(#[case] manager: serde_json::Value) {
    let records = vec![person("1", "CEO", None), person_with_raw_manager("2", manager)];

    let forest = build_hierarchy(&records).unwrap();

    assert_eq!(ids(&forest), vec!["1"]);
    assert_eq!(ids(&forest[0].children), vec!["2"]);
    assert_eq!(forest[0].children[0].level, 1);
}

#[rstest]
#[case::null(json!(null))]
#[case::empty_string(json!(""))]
#[case::embedded_empty_id(json!({"id": ""}))]
#[case::embedded_null_id(json!({"id": null}))]
fn given_empty_manager_when_building_then_record_is_root_without_issue(
    #[case] manager: serde_json::Value,
) {
    let records = vec![person_with_raw_manager("a", manager)];

    let arena = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(arena.roots().len(), 1);
    assert!(arena.issues().is_empty());
}

#[rstest]
#[case::object_without_id(json!({"name": "CEO"}))]
#[case::array(json!(["1"]))]
#[case::boolean(json!(true))]
fn given_malformed_manager_when_building_then_record_is_root_with_issue(
    #[case] manager: serde_json::Value,
) {
    let records = vec![person("1", "CEO", None), person_with_raw_manager("2", manager)];

    let arena = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(arena.roots().len(), 2);
    assert_eq!(
        arena.issues(),
        &[HierarchyIssue::MalformedManagerReference { id: "2".into() }]
    );
}

#[test]
fn given_unknown_manager_when_building_then_record_becomes_root() {
    // Arrange
    let records = vec![person("1", "CEO", None), person("2", "Lost", Some("99"))];

    // Act
    let arena = HierarchyBuilder::new().build(&records).unwrap();
    let issues = arena.issues().to_vec();
    let forest = arena.into_forest();

    // Assert
    assert_eq!(ids(&forest), vec!["1", "2"]);
    assert!(forest[1].children.is_empty());
    assert_eq!(forest[1].level, 0);
    assert_eq!(
        issues,
        vec![HierarchyIssue::UnresolvedManager {
            id: "2".into(),
            manager: "99".into()
        }]
    );
}

// ============================================================
// Cycles
// ============================================================

#[test]
fn given_two_cycle_when_building_then_errors_with_cycle_path() {
    // Arrange
    let records = vec![person("A", "A", Some("B")), person("B", "B", Some("A"))];

    // Act
    let result = build_hierarchy(&records);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::CyclicHierarchy {
            path: vec!["A".into(), "B".into(), "A".into()]
        }
    );
}

#[test]
fn given_self_reference_when_building_then_errors() {
    let records = vec![person("1", "CEO", None), person("2", "Loop", Some("2"))];

    let result = build_hierarchy(&records);

    assert_eq!(
        result.unwrap_err(),
        DomainError::CyclicHierarchy {
            path: vec!["2".into(), "2".into()]
        }
    );
}

#[test]
fn given_cycle_below_valid_tree_when_building_then_errors_with_loop_only() {
    // x reports into the a -> b -> c -> a loop, r is a healthy root
    let records = vec![
        person("r", "Root", None),
        person("x", "X", Some("a")),
        person("a", "A", Some("b")),
        person("b", "B", Some("c")),
        person("c", "C", Some("a")),
    ];

    let err = build_hierarchy(&records).unwrap_err();

    let DomainError::CyclicHierarchy { path } = err;
    assert_eq!(path, vec!["a", "b", "c", "a"]);
}

#[test]
fn given_cycle_when_formatting_error_then_lists_chain() {
    let records = vec![person("A", "A", Some("B")), person("B", "B", Some("A"))];

    let err = build_hierarchy(&records).unwrap_err();

    assert_eq!(err.to_string(), "cycle detected in hierarchy: A -> B -> A");
}

// ============================================================
// Duplicates and payload
// ============================================================

#[test]
fn given_duplicate_ids_when_building_then_last_record_wins() {
    // Arrange
    let records = vec![
        person("1", "CEO", None),
        person("2", "Old VP", Some("1")),
        person("3", "Eng", Some("2")),
        person("2", "New VP", Some("1")),
    ];

    // Act
    let arena = HierarchyBuilder::new().build(&records).unwrap();
    let issues = arena.issues().to_vec();
    let forest = arena.into_forest();

    // Assert
    assert_eq!(forest_node_count(&forest), 3);
    let vp = forest[0].find("2").unwrap();
    assert_eq!(vp.label("name"), "New VP");
    assert_eq!(ids(&vp.children), vec!["3"]);
    assert_eq!(
        issues,
        vec![HierarchyIssue::DuplicateIdentifier { id: "2".into() }]
    );
}

#[test]
fn given_duplicate_with_new_manager_when_building_then_uses_last_manager() {
    let records = vec![
        person("1", "CEO", None),
        person("9", "Other root", None),
        person("2", "VP", Some("1")),
        person("2", "VP", Some("9")),
    ];

    let forest = build_hierarchy(&records).unwrap();

    assert!(forest[0].children.is_empty());
    assert_eq!(ids(&forest[1].children), vec!["2"]);
}

#[test]
fn given_payload_fields_when_building_then_copies_them_unchanged() {
    let record = PersonRecord::new("1")
        .with_field("name", "Ada")
        .with_field("email", "ada@example.com")
        .with_field("tags", json!(["eng", "lead"]));

    let forest = build_hierarchy(std::slice::from_ref(&record)).unwrap();

    assert_eq!(forest[0].record, record);
}

#[test]
fn given_input_records_when_building_then_input_is_untouched() {
    let records = vec![person("1", "CEO", None), person("2", "VP", Some("1"))];
    let before = records.clone();

    let _ = build_hierarchy(&records).unwrap();

    assert_eq!(records, before);
}

#[test]
fn given_built_forest_when_serializing_then_inlines_record_fields() {
    let records = vec![person("1", "CEO", None), person("2", "VP", Some("1"))];

    let forest = build_hierarchy(&records).unwrap();
    let value = serde_json::to_value(&forest).unwrap();

    assert_eq!(
        value,
        json!([{
            "id": "1",
            "name": "CEO",
            "level": 0,
            "children": [{
                "id": "2",
                "managerRef": "1",
                "name": "VP",
                "level": 1,
                "children": []
            }]
        }])
    );
}

#[test]
fn given_deep_chain_when_building_then_does_not_overflow() {
    let depth = 10_000;
    let mut records = vec![person("0", "root", None)];
    for i in 1..depth {
        records.push(person(&i.to_string(), "n", Some(&(i - 1).to_string())));
    }

    let arena = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(arena.depth(), depth);
    assert_eq!(arena.leaf_nodes(), vec![(depth - 1).to_string()]);
}
