use std::collections::{BTreeSet, HashSet};

use progress_core::graph::{
    build_graph, build_tree, DependencyMap, EdgeKind, GraphBuilder, GraphError, Inconsistency,
    NodeKind, TreeNode,
};
use progress_core::model::{ClassStatus, ClassStatusKind, QualifiedName};

fn status(name: &str, status: ClassStatusKind, methods: usize, size: u64) -> ClassStatus {
    ClassStatus {
        class: QualifiedName::parse(name),
        status,
        method_count: methods,
        total_binary_size: size,
    }
}

fn deps(entries: Vec<(&str, Vec<&str>)>) -> DependencyMap {
    entries
        .into_iter()
        .map(|(class, targets)| {
            (
                QualifiedName::parse(class),
                targets.iter().map(|t| QualifiedName::parse(t)).collect::<BTreeSet<_>>(),
            )
        })
        .collect()
}

fn collect_ids(node: &TreeNode, out: &mut Vec<(usize, String)>) {
    out.push((node.id, node.name.clone()));
    for child in &node.children {
        collect_ids(child, out);
    }
}

#[test]
fn tree_ids_follow_first_encounter_order() {
    let classes = vec![
        status("ksys::a::X", ClassStatusKind::Undecompiled, 0, 0),
        status("ksys::a::Y", ClassStatusKind::Decompiled, 3, 0x90),
    ];
    let tree = build_tree(&classes).expect("tree");

    assert_eq!(tree.id, 0);
    assert_eq!(tree.name, "root");
    assert_eq!(tree.kind, NodeKind::Namespace);
    assert_eq!(tree.children.len(), 1);

    let ksys = &tree.children[0];
    assert_eq!((ksys.id, ksys.name.as_str()), (1, "ksys"));
    assert_eq!(ksys.children.len(), 1);

    let ns = &ksys.children[0];
    assert_eq!((ns.id, ns.name.as_str(), ns.kind), (2, "ksys::a", NodeKind::Namespace));
    assert_eq!(ns.num_methods, None);

    let names: Vec<(usize, &str)> =
        ns.children.iter().map(|c| (c.id, c.name.as_str())).collect();
    assert_eq!(names, [(3, "ksys::a::X"), (4, "ksys::a::Y")]);
    assert_eq!(ns.children[1].kind, NodeKind::Class(ClassStatusKind::Decompiled));
    assert_eq!(ns.children[1].num_methods, Some(3));
    assert_eq!(ns.children[1].total_binary_size, Some(0x90));
}

#[test]
fn tree_counts_match_distinct_prefixes_and_classes() {
    let classes = vec![
        status("ksys::act::Foo", ClassStatusKind::Partial, 2, 8),
        status("ksys::res::Handle", ClassStatusKind::Decompiled, 1, 4),
        status("uking::ui::PauseMenu", ClassStatusKind::Undecompiled, 0, 0),
        status("uking::Qux", ClassStatusKind::Partial, 1, 2),
    ];
    let tree = build_tree(&classes).expect("tree");

    let mut prefixes = HashSet::new();
    for class in &classes {
        for depth in 1..=class.class.len() {
            prefixes.insert(class.class.prefix_string(depth));
        }
    }
    // Distinct prefixes plus the synthetic root.
    assert_eq!(tree.count(), prefixes.len() + 1);
    assert_eq!(tree.class_count(), classes.len());

    let mut ids = Vec::new();
    collect_ids(&tree, &mut ids);
    let unique: HashSet<usize> = ids.iter().map(|(id, _)| *id).collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn class_metadata_only_on_full_name_nodes() {
    let classes = vec![
        status("ksys::act::Foo", ClassStatusKind::Partial, 2, 8),
        status("ksys::act::Bar", ClassStatusKind::Partial, 1, 4),
    ];
    let tree = build_tree(&classes).expect("tree");
    let act = tree.find("ksys::act").expect("namespace node");
    assert_eq!(act.kind, NodeKind::Namespace);
    assert!(act.num_methods.is_none());
    assert!(act.total_binary_size.is_none());
    assert_eq!(tree.find("ksys::act::Bar").and_then(|n| n.num_methods), Some(1));
}

#[test]
fn nested_class_keeps_its_own_status() {
    let classes = vec![
        status("ksys::Outer::Inner", ClassStatusKind::Decompiled, 1, 4),
        status("ksys::Outer", ClassStatusKind::Undecompiled, 0, 0),
    ];
    let tree = build_tree(&classes).expect("tree");
    let outer = tree.find("ksys::Outer").expect("outer");
    assert_eq!(outer.kind, NodeKind::Class(ClassStatusKind::Undecompiled));
    assert_eq!(outer.num_methods, Some(0));
    assert_eq!(outer.children.len(), 1);
    assert_eq!(tree.class_count(), 2);
}

#[test]
fn flat_graph_starts_at_zero_with_parent_to_child_edges() {
    let classes = vec![
        status("ksys::a::X", ClassStatusKind::Undecompiled, 0, 0),
        status("ksys::a::Y", ClassStatusKind::Decompiled, 1, 4),
    ];
    let graph = build_graph(&classes, &DependencyMap::new()).expect("graph");

    let nodes: Vec<(usize, &str, &str)> =
        graph.nodes.iter().map(|n| (n.id, n.name.as_str(), n.kind.as_str())).collect();
    assert_eq!(
        nodes,
        [
            (0, "ksys", "namespace"),
            (1, "ksys::a", "namespace"),
            (2, "ksys::a::X", "undecompiled_class"),
            (3, "ksys::a::Y", "decompiled_class"),
        ]
    );
    let edges: Vec<(usize, usize)> = graph.edges.iter().map(|e| (e.source, e.target)).collect();
    assert_eq!(edges, [(0, 1), (1, 2), (1, 3)]);
}

#[test]
fn every_class_node_has_exactly_one_parent_edge() {
    let classes = vec![
        status("ksys::act::Foo", ClassStatusKind::Partial, 2, 8),
        status("ksys::act::ai::Brain", ClassStatusKind::Partial, 2, 8),
        status("uking::Qux", ClassStatusKind::Partial, 1, 2),
    ];
    let graph = build_graph(&classes, &DependencyMap::new()).expect("graph");
    for node in graph.nodes.iter().filter(|n| n.kind.is_class()) {
        let parents =
            graph.edges_of_kind(EdgeKind::Contains).filter(|e| e.target == node.id).count();
        assert_eq!(parents, 1, "{} should have one parent", node.name);
    }
}

#[test]
fn dependency_edges_only_connect_known_classes() {
    let classes = vec![
        status("ksys::act::Foo", ClassStatusKind::Partial, 2, 8),
        status("ksys::res::Handle", ClassStatusKind::Decompiled, 1, 4),
    ];
    let dependencies = deps(vec![
        (
            "ksys::act::Foo",
            vec!["ksys::res::Handle", "ksys::res", "ksys::res::Missing", "sead::Heap"],
        ),
        ("ksys::res::Unknown", vec!["ksys::act::Foo"]),
    ]);
    let graph = build_graph(&classes, &dependencies).expect("graph");

    let foo = graph.nodes.iter().find(|n| n.name == "ksys::act::Foo").unwrap().id;
    let handle = graph.nodes.iter().find(|n| n.name == "ksys::res::Handle").unwrap().id;
    let dep_edges: Vec<(usize, usize)> =
        graph.edges_of_kind(EdgeKind::DependsOn).map(|e| (e.source, e.target)).collect();
    assert_eq!(dep_edges, [(foo, handle)]);

    // Dependency edges come after the hierarchy edges.
    assert_eq!(graph.edges.last().map(|e| e.kind), Some(EdgeKind::DependsOn));
}

#[test]
fn structurally_different_names_with_same_prefix_are_reported() {
    let classes = vec![
        ClassStatus::undecompiled(QualifiedName::from_segments(["ksys", "a", "B"])),
        ClassStatus::undecompiled(QualifiedName::from_segments(["ksys", "a::B"])),
    ];
    let err = build_tree(&classes).unwrap_err();
    let GraphError::Inconsistent { conflicts } = &err;
    assert_eq!(conflicts.len(), 1);
    match &conflicts[0] {
        Inconsistency::PrefixCollision { prefix, existing, incoming } => {
            assert_eq!(prefix, "ksys::a::B");
            assert_eq!(existing, &classes[0].class);
            assert_eq!(incoming, &classes[1].class);
        }
        other => panic!("unexpected conflict: {other:?}"),
    }
    assert!(err.to_string().contains("ksys::a::B"));
}

#[test]
fn duplicate_class_with_different_metadata_is_reported() {
    let classes = vec![
        status("ksys::Foo", ClassStatusKind::Partial, 2, 8),
        status("ksys::Foo", ClassStatusKind::Decompiled, 2, 8),
    ];
    let err = build_graph(&classes, &DependencyMap::new()).unwrap_err();
    let GraphError::Inconsistent { conflicts } = err;
    assert!(matches!(
        conflicts.as_slice(),
        [Inconsistency::ConflictingDuplicate { existing: ClassStatusKind::Partial, .. }]
    ));
}

#[test]
fn all_conflicts_are_collected() {
    let classes = vec![
        ClassStatus::undecompiled(QualifiedName::from_segments(["a", "b"])),
        ClassStatus::undecompiled(QualifiedName::from_segments(["a::b"])),
        ClassStatus::undecompiled(QualifiedName::from_segments(["c", "d"])),
        ClassStatus::undecompiled(QualifiedName::from_segments(["c::d"])),
    ];
    let GraphError::Inconsistent { conflicts } = build_tree(&classes).unwrap_err();
    assert_eq!(conflicts.len(), 2);
}

#[test]
fn empty_inputs_produce_minimal_output() {
    let tree = build_tree(&[]).expect("tree");
    assert_eq!(tree.count(), 1);
    assert!(tree.children.is_empty());

    let graph = build_graph(&[], &DependencyMap::new()).expect("graph");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn builder_can_be_driven_incrementally() {
    let mut builder = GraphBuilder::tree();
    builder.add_class(&status("uking::Qux", ClassStatusKind::Partial, 1, 2));
    assert_eq!(builder.lookup("uking"), Some(1));
    assert_eq!(builder.lookup("uking::Qux"), Some(2));
    assert_eq!(builder.node_count(), 3);
}

#[test]
fn tree_serializes_to_visualization_shape() {
    let classes = vec![status("ksys::Foo", ClassStatusKind::Partial, 2, 8)];
    let tree = build_tree(&classes).expect("tree");
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["name"], "root");
    assert_eq!(json["type"], "namespace");
    assert!(json.get("numMethods").is_none());
    let foo = &json["children"][0]["children"][0];
    assert_eq!(foo["id"], 2);
    assert_eq!(foo["type"], "partially_decompiled_class");
    assert_eq!(foo["numMethods"], 2);
    assert_eq!(foo["totalBinarySize"], 8);
    assert_eq!(foo["children"], serde_json::json!([]));
}

#[test]
fn flat_graph_serializes_without_edge_kinds() {
    let classes = vec![status("ksys::Foo", ClassStatusKind::Partial, 2, 8)];
    let graph = build_graph(&classes, &DependencyMap::new()).expect("graph");
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["edges"], serde_json::json!([{ "source": 0, "target": 1 }]));
    assert_eq!(
        json["nodes"][1],
        serde_json::json!({ "id": 1, "name": "ksys::Foo", "type": "partially_decompiled_class" })
    );
}
