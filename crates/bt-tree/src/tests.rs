//! Unit tests for bt-tree.

use bt_core::NodeId;

use crate::{
    Destination, Leaf, NodeClass, NodeDocument, NodeKind, NodeSpec, ParseError, Topology,
    TopologyBuilder, TreeDocument, TreeError, load_tree_str,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HAS_JOB_THEN_ASSIGN: &str = r#"{"rootNode":[{"type":2,"name":"SequenceComposite","childs":[
    {"type":1,"name":"HasJobLeaf"},
    {"type":1,"name":"AssignJobLeaf"}
]}]}"#;

fn leaf_doc(leaf: Leaf) -> NodeDocument {
    NodeDocument {
        class:       Some(1.into()),
        name:        Some(leaf.name().to_owned()),
        destination: match leaf {
            Leaf::FindPathTo(d) => Some(d.code().into()),
            _ => None,
        },
        ..NodeDocument::default()
    }
}

fn node_doc(class: i64, name: &str, childs: Vec<NodeDocument>) -> NodeDocument {
    NodeDocument {
        class: Some(class.into()),
        name: Some(name.to_owned()),
        childs,
        ..NodeDocument::default()
    }
}

/// A document using every composite, decorator and leaf kind, plus every
/// destination policy.
fn every_kind_document() -> TreeDocument {
    let mut leaves: Vec<NodeDocument> = Leaf::ALL.iter().map(|&l| leaf_doc(l)).collect();
    leaves.extend(
        Destination::ALL
            .iter()
            .skip(1)
            .map(|&d| leaf_doc(Leaf::FindPathTo(d))),
    );

    let mut repeater = node_doc(4, "RepeaterDecorator", vec![node_doc(2, "SequenceComposite", leaves)]);
    repeater.limit = Some(3.into());

    let root = node_doc(2, "SelectorComposite", vec![
        repeater,
        node_doc(4, "RepeatUntilFailDecorator", vec![leaf_doc(Leaf::HasJob)]),
        node_doc(4, "SucceederDecorator", vec![leaf_doc(Leaf::MoveTo)]),
        node_doc(4, "InverterDecorator", vec![leaf_doc(Leaf::IsDayTime)]),
    ]);
    TreeDocument::with_root(root)
}

fn parse_err(json: &str) -> ParseError {
    match load_tree_str(json) {
        Err(TreeError::Parse(e)) => e,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn parent_and_slot_links() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Selector).unwrap();
        let a = b.add_child(root, NodeSpec::Leaf(Leaf::HasJob)).unwrap();
        let inv = b.add_child(root, NodeSpec::Inverter).unwrap();
        let c = b.add_child(inv, NodeSpec::Leaf(Leaf::IsNightTime)).unwrap();
        let t = b.build().unwrap();

        assert_eq!(t.root(), root);
        assert_eq!(t.parent(root), NodeId::INVALID);
        assert!(t.get(root).unwrap().is_root());
        assert_eq!(t.parent(a), root);
        assert_eq!(t.parent(c), inv);
        assert_eq!(t.get(a).unwrap().slot, 0);
        assert_eq!(t.get(inv).unwrap().slot, 1);
        assert_eq!(t.get(c).unwrap().slot, 0);
        assert_eq!(t.children(root), &[a, inv]);
        assert_eq!(t.children(inv), &[c]);
        assert_eq!(t.depth(), 3);
        assert_eq!(t.leaf_count(), 2);
    }

    #[test]
    fn repeaters_get_dense_counter_slots() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Sequence).unwrap();
        let r0 = b.add_child(root, NodeSpec::Repeater { limit: 2 }).unwrap();
        b.add_child(r0, NodeSpec::Leaf(Leaf::TakeResource)).unwrap();
        let r1 = b.add_child(root, NodeSpec::Repeater { limit: 0 }).unwrap();
        b.add_child(r1, NodeSpec::Leaf(Leaf::PutResource)).unwrap();
        let t = b.build().unwrap();

        assert_eq!(t.repeater_count(), 2);
        let counter = |id: NodeId| match t.get(id).unwrap().kind {
            NodeKind::Repeater { counter, .. } => counter,
            _ => panic!("not a repeater"),
        };
        assert_eq!(counter(r0), 0);
        assert_eq!(counter(r1), 1);
    }

    #[test]
    fn second_root_rejected() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Leaf(Leaf::HasJob)).unwrap();
        assert!(matches!(
            b.add_root(NodeSpec::Sequence),
            Err(TreeError::RootAlreadySet(id)) if id == root
        ));
    }

    #[test]
    fn leaf_rejects_children() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Leaf(Leaf::HasJob)).unwrap();
        assert!(matches!(
            b.add_child(root, NodeSpec::Leaf(Leaf::AssignJob)),
            Err(TreeError::LeafHasNoChildren(_))
        ));
    }

    #[test]
    fn decorator_takes_one_child() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Succeeder).unwrap();
        b.add_child(root, NodeSpec::Leaf(Leaf::HasJob)).unwrap();
        assert!(matches!(
            b.add_child(root, NodeSpec::Leaf(Leaf::AssignJob)),
            Err(TreeError::DecoratorOccupied(_))
        ));
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut b = TopologyBuilder::new();
        assert!(matches!(
            b.add_child(NodeId(5), NodeSpec::Sequence),
            Err(TreeError::NodeNotFound(NodeId(5)))
        ));
    }

    #[test]
    fn build_requires_root() {
        assert!(matches!(TopologyBuilder::new().build(), Err(TreeError::NoRoot)));
    }

    #[test]
    fn build_rejects_incomplete_nodes() {
        let mut b = TopologyBuilder::new();
        let root = b.add_root(NodeSpec::Sequence).unwrap();
        let inv = b.add_child(root, NodeSpec::Inverter).unwrap();
        match b.build() {
            Err(TreeError::Incomplete { node, .. }) => assert_eq!(node, inv),
            other => panic!("unexpected {other:?}"),
        }

        let mut b = TopologyBuilder::new();
        b.add_root(NodeSpec::Selector).unwrap();
        assert!(matches!(b.build(), Err(TreeError::Incomplete { .. })));
    }

    #[test]
    fn set_payload() {
        let mut b = TopologyBuilder::new();
        let rep = b.add_root(NodeSpec::Repeater { limit: 0 }).unwrap();
        let path = b
            .add_child(rep, NodeSpec::Leaf(Leaf::FindPathTo(Destination::Random)))
            .unwrap();
        b.set_limit(rep, 7).unwrap();
        b.set_destination(path, Destination::WorkingPlace).unwrap();
        assert!(matches!(b.set_limit(path, 1), Err(TreeError::NotARepeater(_))));
        assert!(matches!(
            b.set_destination(rep, Destination::Dwelling),
            Err(TreeError::NotAPathLeaf(_))
        ));

        let t = b.build().unwrap();
        assert_eq!(t.get(rep).unwrap().spec(), NodeSpec::Repeater { limit: 7 });
        assert_eq!(
            t.get(path).unwrap().spec(),
            NodeSpec::Leaf(Leaf::FindPathTo(Destination::WorkingPlace))
        );
    }
}

// ── Names ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod names {
    use super::*;

    #[test]
    fn leaf_names_are_unique() {
        let mut names: Vec<&str> = Leaf::ALL.iter().map(|l| l.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 19);
        assert!(names.iter().all(|n| n.ends_with("Leaf")));
    }

    #[test]
    fn class_codes() {
        for class in [NodeClass::Leaf, NodeClass::Composite, NodeClass::Decorator] {
            assert_eq!(NodeClass::from_code(class.code()), Some(class));
        }
        assert_eq!(NodeClass::from_code(3), None);
        assert_eq!(NodeSpec::Inverter.class(), NodeClass::Decorator);
    }

    #[test]
    fn destination_codes() {
        for (i, d) in Destination::ALL.iter().enumerate() {
            assert_eq!(d.code(), i as i64);
            assert_eq!(Destination::from_code(i as i64), Some(*d));
        }
        assert_eq!(Destination::from_code(5), None);
        assert_eq!(Destination::InventoryTaskGiver.to_string(), "InventoryTaskGiver");
    }

    #[test]
    fn spec_display() {
        assert_eq!(NodeSpec::Repeater { limit: 3 }.to_string(), "RepeaterDecorator(limit=3)");
        assert_eq!(
            NodeSpec::Leaf(Leaf::FindPathTo(Destination::Dwelling)).to_string(),
            "FindPathToLeaf(Dwelling)"
        );
        assert_eq!(NodeSpec::Sequence.to_string(), "SequenceComposite");
    }
}

// ── Codec ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use super::*;

    #[test]
    fn loads_sequence_of_leaves() {
        let t = load_tree_str(HAS_JOB_THEN_ASSIGN).unwrap();
        assert_eq!(t.len(), 3);
        let root = t.get(t.root()).unwrap();
        assert_eq!(root.spec(), NodeSpec::Sequence);
        let kids: Vec<NodeSpec> = root
            .children()
            .iter()
            .map(|&c| t.get(c).unwrap().spec())
            .collect();
        assert_eq!(kids, vec![NodeSpec::Leaf(Leaf::HasJob), NodeSpec::Leaf(Leaf::AssignJob)]);
    }

    #[test]
    fn round_trip_every_kind() {
        let doc = every_kind_document();
        let first = Topology::from_document(&doc).unwrap();
        let second = Topology::from_document(&first.to_document()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.repeater_count(), 1);
        assert_eq!(first.leaf_count(), 19 + 4 + 3);
    }

    #[test]
    fn round_trip_through_json_text() {
        let first = Topology::from_document(&every_kind_document()).unwrap();
        let json = crate::to_json_string(&first).unwrap();
        let second = load_tree_str(&json).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn serialized_document_shape() {
        let t = load_tree_str(HAS_JOB_THEN_ASSIGN).unwrap();
        let value = serde_json::to_value(t.to_document()).unwrap();
        let root = &value["rootNode"][0];
        assert_eq!(root["type"], 2);
        assert_eq!(root["name"], "SequenceComposite");
        assert_eq!(root["childs"][1]["name"], "AssignJobLeaf");
        // Leaves carry no empty `childs` array.
        assert!(root["childs"][0].get("childs").is_none());
    }

    #[test]
    fn repeater_limit_defaults_to_unbounded() {
        let t = load_tree_str(
            r#"{"rootNode":[{"type":4,"name":"RepeaterDecorator","childs":[{"type":1,"name":"MoveToLeaf"}]}]}"#,
        )
        .unwrap();
        assert_eq!(t.get(t.root()).unwrap().spec(), NodeSpec::Repeater { limit: 0 });
    }

    #[test]
    fn extra_decorator_children_ignored() {
        let t = load_tree_str(
            r#"{"rootNode":[{"type":4,"name":"InverterDecorator","childs":[
                {"type":1,"name":"HasJobLeaf"},{"type":1,"name":"HasDwellingLeaf"}]}]}"#,
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(NodeId(1)).unwrap().spec(), NodeSpec::Leaf(Leaf::HasJob));
    }

    #[test]
    fn unknown_fields_ignored() {
        let t = load_tree_str(
            r#"{"rootNode":[{"type":1,"name":"HasJobLeaf","x":12.5,"y":4}],"version":2}"#,
        )
        .unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn deep_chain_round_trip() {
        let mut b = TopologyBuilder::new();
        let mut parent = b.add_root(NodeSpec::Inverter).unwrap();
        for _ in 0..99 {
            parent = b.add_child(parent, NodeSpec::Succeeder).unwrap();
        }
        b.add_child(parent, NodeSpec::Leaf(Leaf::HasJob)).unwrap();
        let first = b.build().unwrap();
        assert_eq!(first.depth(), 101);

        let json = crate::to_json_string(&first).unwrap();
        let second = load_tree_str(&json).unwrap();
        assert_eq!(first, second);

        let third = crate::load_tree_reader(json.as_bytes()).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn trailing_content_is_json_error() {
        let json = format!("{HAS_JOB_THEN_ASSIGN} {{}}");
        assert!(matches!(load_tree_str(&json), Err(TreeError::Json(_))));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let first = Topology::from_document(&every_kind_document()).unwrap();
        crate::save_tree_json(&first, &path).unwrap();
        let second = crate::load_tree_json(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = crate::load_tree_json(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(TreeError::Io(_))));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(load_tree_str("{\"rootNode\": ["), Err(TreeError::Json(_))));
    }
}

// ── Parse errors ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod parse_errors {
    use super::*;

    #[test]
    fn missing_root() {
        assert_eq!(parse_err("{}"), ParseError::MissingRoot);
        assert_eq!(parse_err(r#"{"rootNode":[]}"#), ParseError::MissingRoot);
    }

    #[test]
    fn missing_type() {
        let e = parse_err(r#"{"rootNode":[{"name":"HasJobLeaf"}]}"#);
        assert!(matches!(e, ParseError::MissingType { ref node } if node.contains("HasJobLeaf")));
    }

    #[test]
    fn unknown_type() {
        let e = parse_err(r#"{"rootNode":[{"type":3,"name":"HasJobLeaf"}]}"#);
        assert!(matches!(e, ParseError::UnknownType { code: 3, .. }));
    }

    #[test]
    fn name_must_match_type() {
        // A composite name under the leaf type is not a leaf.
        let e = parse_err(r#"{"rootNode":[{"type":1,"name":"SequenceComposite"}]}"#);
        match e {
            ParseError::UnknownName { class, name, node } => {
                assert_eq!(class, NodeClass::Leaf);
                assert_eq!(name, "SequenceComposite");
                assert!(node.contains("\"type\":1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failing_child_fails_whole_load() {
        let e = parse_err(
            r#"{"rootNode":[{"type":2,"name":"SelectorComposite","childs":[
                {"type":1,"name":"HasJobLeaf"},
                {"type":1,"name":"DanceLeaf"}]}]}"#,
        );
        assert!(matches!(e, ParseError::UnknownName { ref name, .. } if name == "DanceLeaf"));
    }

    #[test]
    fn find_path_requires_destination() {
        let e = parse_err(r#"{"rootNode":[{"type":1,"name":"FindPathToLeaf"}]}"#);
        assert!(matches!(e, ParseError::MissingField { field: "destination", .. }));

        let e = parse_err(r#"{"rootNode":[{"type":1,"name":"FindPathToLeaf","destination":9}]}"#);
        assert!(matches!(e, ParseError::InvalidField { field: "destination", value: 9, .. }));
    }

    #[test]
    fn negative_limit_rejected() {
        let e = parse_err(
            r#"{"rootNode":[{"type":4,"name":"RepeaterDecorator","limit":-1,"childs":[{"type":1,"name":"MoveToLeaf"}]}]}"#,
        );
        assert!(matches!(e, ParseError::InvalidField { field: "limit", value: -1, .. }));
    }

    #[test]
    fn wrongly_typed_fields_carry_the_node() {
        let e = parse_err(r#"{"rootNode":[{"type":"2","name":"SequenceComposite"}]}"#);
        assert!(matches!(e, ParseError::NotAnInteger { field: "type", ref node } if node.contains("SequenceComposite")));

        let e = parse_err(
            r#"{"rootNode":[{"type":4,"name":"RepeaterDecorator","limit":3.5,"childs":[{"type":1,"name":"MoveToLeaf"}]}]}"#,
        );
        assert!(matches!(e, ParseError::NotAnInteger { field: "limit", ref node } if node.contains("3.5")));

        let e = parse_err(r#"{"rootNode":[{"type":1,"name":"FindPathToLeaf","destination":[1]}]}"#);
        assert!(matches!(e, ParseError::NotAnInteger { field: "destination", .. }));
    }

    #[test]
    fn null_fields_read_as_absent() {
        let t = load_tree_str(
            r#"{"rootNode":[{"type":4,"name":"RepeaterDecorator","limit":null,"childs":[{"type":1,"name":"MoveToLeaf"}]}]}"#,
        )
        .unwrap();
        assert_eq!(t.get(t.root()).unwrap().spec(), NodeSpec::Repeater { limit: 0 });

        let e = parse_err(r#"{"rootNode":[{"type":null,"name":"HasJobLeaf"}]}"#);
        assert!(matches!(e, ParseError::MissingType { .. }));
    }

    #[test]
    fn missing_name() {
        let e = parse_err(r#"{"rootNode":[{"type":2}]}"#);
        assert!(matches!(e, ParseError::MissingField { field: "name", .. }));
    }

    #[test]
    fn childless_composite_and_decorator() {
        let e = parse_err(r#"{"rootNode":[{"type":2,"name":"SequenceComposite"}]}"#);
        assert!(matches!(e, ParseError::MissingChildren { class: NodeClass::Composite, .. }));

        let e = parse_err(r#"{"rootNode":[{"type":4,"name":"SucceederDecorator","childs":[]}]}"#);
        assert!(matches!(e, ParseError::MissingChildren { class: NodeClass::Decorator, .. }));
    }
}
