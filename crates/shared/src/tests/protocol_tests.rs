use super::*;
use crate::domain::ObjectId;
use serde_json::json;

#[test]
fn payload_slot_serializes_as_content_kind_pair() {
    let slot = PayloadSlot::text("hi");
    assert_eq!(serde_json::to_value(&slot).unwrap(), json!(["hi", "text/plain"]));

    let back: PayloadSlot = serde_json::from_value(json!([42, "text/plain"])).unwrap();
    assert_eq!(back.kind(), "text/plain");
    assert_eq!(back.content(), &json!(42));
}

#[test]
fn deserializes_paginated_sequence_payload() {
    let body = json!({
        "shape": "sequence",
        "label": "Vector",
        "label_short": "[]",
        "object_id": 7,
        "elements": [
            { "value": [1, "text/plain"] },
            { "value": [2, "text/plain"] },
            "more",
        ],
    });
    let node: TreeNode = serde_json::from_value(body).unwrap();

    assert_eq!(node.shape_tag(), "sequence");
    assert_eq!(node.object_id(), Some(ObjectId(7)));
    assert!(node.marker_is_terminal());
    let TreeNode::Sequence { elements, .. } = node else {
        panic!("expected sequence");
    };
    assert_eq!(elements.len(), 3);
    assert!(!elements[0].is_more());
    assert!(elements[2].is_more());
}

#[test]
fn deserializes_pair_without_identity_or_labels() {
    let body = json!({
        "shape": "pair",
        "key": ["a", "text/plain"],
        "value": [1, "text/plain"],
    });
    let node: TreeNode = serde_json::from_value(body).unwrap();
    assert_eq!(node.shape_tag(), "pair");
    assert_eq!(node.object_id(), None);
}

#[test]
fn unrecognized_shape_degrades_to_unknown() {
    let node: TreeNode =
        serde_json::from_value(json!({ "shape": "hypercube", "edges": 32 })).unwrap();
    assert_eq!(node, TreeNode::Unknown);
    assert!(node.marker_is_terminal());
}

#[test]
fn ordered_map_keys_are_payload_slots() {
    let body = json!({
        "shape": "ordered_map",
        "label": "Dict{String, Int64} with 1 entry",
        "label_short": "Dict",
        "object_id": 3,
        "elements": [
            { "key": ["a", "text/plain"], "value": [1, "text/plain"] },
        ],
    });
    let node: TreeNode = serde_json::from_value(body).unwrap();
    let TreeNode::OrderedMap { elements, .. } = node else {
        panic!("expected ordered_map");
    };
    let ListElement::Entry(entry) = &elements[0] else {
        panic!("expected entry");
    };
    assert_eq!(entry.key.content(), &json!("a"));
}

#[test]
fn marker_placement_invariant_rejects_non_terminal_markers() {
    let entry = |n: i64| {
        ListElement::Entry(SeqEntry {
            index: Some(json!(n)),
            value: PayloadSlot::text(n.to_string()),
        })
    };
    let more = ListElement::More(PaginationMarker::More);

    assert!(marker_is_terminal(&[entry(1), entry(2)]));
    assert!(marker_is_terminal(&[entry(1), entry(2), more.clone()]));
    assert!(!marker_is_terminal(&[entry(1), more.clone(), entry(2)]));
    assert!(!marker_is_terminal(&[more.clone(), more]));
}

#[test]
fn table_rows_and_header_share_one_column_cursor() {
    let body: TableBody = serde_json::from_value(json!({
        "object_id": 11,
        "schema": {
            "names": ["x", "y", "more"],
            "types": ["Int64", "Float64", "more"],
        },
        "rows": [
            [1, [[10, "text/plain"], [0.5, "text/plain"], "more"]],
            [2, [[20, "text/plain"], [1.5, "text/plain"], "more"]],
            "more",
        ],
    }))
    .unwrap();

    assert!(body.schema.as_ref().unwrap().has_column_marker());
    assert!(body.row_marker_is_terminal());
    assert!(body.column_cursor_is_consistent());
}

#[test]
fn table_detects_row_truncated_at_a_different_column_cursor() {
    let body: TableBody = serde_json::from_value(json!({
        "object_id": 11,
        "schema": { "names": ["x", "y", "more"], "types": ["Int64", "Float64", "more"] },
        "rows": [
            [1, [[10, "text/plain"], [0.5, "text/plain"]]],
        ],
    }))
    .unwrap();
    assert!(!body.column_cursor_is_consistent());
}

#[test]
fn table_marker_row_must_be_last() {
    let body: TableBody = serde_json::from_value(json!({
        "object_id": 11,
        "rows": [
            "more",
            [1, [[10, "text/plain"]]],
        ],
    }))
    .unwrap();
    assert!(!body.row_marker_is_terminal());
}

#[test]
fn null_cells_parse_as_empty_holes() {
    let row: TableRow = serde_json::from_value(json!([3, [null, [7, "text/plain"]]])).unwrap();
    let TableRow::Row(RowBody(label, cells)) = row else {
        panic!("expected data row");
    };
    assert_eq!(label, json!(3));
    assert_eq!(cells[0], TableCell::Empty(()));
    assert!(matches!(cells[1], TableCell::Slot(_)));
}

#[test]
fn composite_body_carries_style_and_children() {
    let body: CompositeBody = serde_json::from_value(json!({
        "style": "display: flex",
        "classname": "banner",
        "children": [["a", "text/plain"], ["b", "text/plain"]],
    }))
    .unwrap();
    assert_eq!(body.children.len(), 2);
    assert_eq!(body.style.as_deref(), Some("display: flex"));
}

#[test]
fn decode_reports_the_offending_kind() {
    let slot = PayloadSlot::new(TREE_KIND, json!("not an object"));
    let err = slot.decode::<TreeNode>().unwrap_err();
    assert!(err.to_string().contains(TREE_KIND));
}
