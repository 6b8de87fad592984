use std::cell::RefCell;

use super::*;
use shared::domain::{Axis, CellId, ObjectId};
use shared::protocol::TreeNode;

#[derive(Default)]
struct RecordingSink {
    requests: RefCell<Vec<DisclosureRequest>>,
}

impl RevealSink for RecordingSink {
    fn reveal_more(&self, request: DisclosureRequest) {
        self.requests.borrow_mut().push(request);
    }
}

fn request_for(cell: CellId) -> DisclosureRequest {
    DisclosureRequest {
        cell_id: cell,
        object_id: ObjectId(7),
        axis: Axis::Rows,
    }
}

#[test]
fn hidden_node_click_is_a_no_op() {
    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let key = NodeKey::root(cell).child("more");
    let sink = RecordingSink::default();

    let outcome = request_more(&mut state, key, false, request_for(cell), &sink);

    assert_eq!(outcome, RequestOutcome::NodeHidden);
    assert!(sink.requests.borrow().is_empty());
    assert_eq!(state.live_nodes(), 0, "no state left behind");
}

#[test]
fn rapid_double_click_issues_a_single_request() {
    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let key = NodeKey::root(cell).child("more");
    let sink = RecordingSink::default();

    let first = request_more(&mut state, key, true, request_for(cell), &sink);
    let second = request_more(&mut state, key, true, request_for(cell), &sink);

    assert_eq!(first, RequestOutcome::Issued);
    assert_eq!(second, RequestOutcome::AlreadyLoading);
    assert_eq!(sink.requests.borrow().len(), 1);
    assert!(state.node(key).loading);
}

#[test]
fn replacement_payload_re_arms_the_affordance() {
    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let key = NodeKey::root(cell).child("more");
    let sink = RecordingSink::default();

    request_more(&mut state, key, true, request_for(cell), &sink);
    state.cell_updated(cell);
    let outcome = request_more(&mut state, key, true, request_for(cell), &sink);

    assert_eq!(outcome, RequestOutcome::Issued);
    assert_eq!(sink.requests.borrow().len(), 2);
}

#[test]
fn column_axis_request_leaves_the_row_affordance_untouched() {
    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let root = NodeKey::root(cell);
    let col_key = root.child(("more", 2u8));
    let row_key = root.child(("more", 1u8));
    let sink = RecordingSink::default();

    let outcome = request_more(
        &mut state,
        col_key,
        true,
        DisclosureRequest {
            cell_id: cell,
            object_id: ObjectId(11),
            axis: Axis::Columns,
        },
        &sink,
    );

    assert_eq!(outcome, RequestOutcome::Issued);
    assert_eq!(sink.requests.borrow()[0].axis, Axis::Columns);
    assert!(state.node(col_key).loading);
    assert!(state.node_if_live(row_key).is_none());
}

#[test]
fn expanded_sequence_scenario_requests_axis_one_for_object_seven() {
    // Paginated Vector payload from the wire: two entries plus the marker.
    let node: TreeNode = serde_json::from_value(serde_json::json!({
        "shape": "sequence",
        "label": "Vector",
        "label_short": "[]",
        "object_id": 7,
        "elements": [
            { "value": [1, "text/plain"] },
            { "value": [2, "text/plain"] },
            "more",
        ],
    }))
    .unwrap();
    assert!(node.marker_is_terminal());

    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let root = NodeKey::root(cell);
    let sink = RecordingSink::default();

    // First render leaves the node collapsed; a "more" click is a no-op.
    assert!(state.node(root).collapsed);
    let hidden = request_more(
        &mut state,
        root.child(("more", 1u8)),
        false,
        request_for(cell),
        &sink,
    );
    assert_eq!(hidden, RequestOutcome::NodeHidden);

    // Expand, then click "more".
    state.node(root).collapsed = false;
    let outcome = request_more(
        &mut state,
        root.child(("more", 1u8)),
        true,
        request_for(cell),
        &sink,
    );

    assert_eq!(outcome, RequestOutcome::Issued);
    let requests = sink.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].object_id, ObjectId(7));
    assert_eq!(requests[0].axis, Axis::Rows);
    assert_eq!(requests[0].cell_id, cell);
}
