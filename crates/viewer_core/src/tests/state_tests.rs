use super::*;
use shared::domain::CellId;

fn key_for(cell: CellId, part: &str) -> NodeKey {
    NodeKey::root(cell).child(part)
}

#[test]
fn nodes_start_collapsed_and_idle() {
    let mut state = ViewerState::new();
    state.begin_frame();
    let cell = CellId::new();
    let node = state.node(key_for(cell, "a"));
    assert!(node.collapsed);
    assert!(!node.loading);
}

#[test]
fn collapse_state_survives_frames_while_touched() {
    let mut state = ViewerState::new();
    let cell = CellId::new();
    let key = key_for(cell, "a");

    state.begin_frame();
    state.node(key).collapsed = false;
    state.end_frame();

    state.begin_frame();
    assert!(!state.node(key).collapsed);
    state.end_frame();
}

#[test]
fn untouched_state_is_pruned_at_end_of_frame() {
    let mut state = ViewerState::new();
    let cell = CellId::new();
    let stale = key_for(cell, "stale");
    let live = key_for(cell, "live");

    state.begin_frame();
    state.node(stale);
    state.node(live);
    state.end_frame();

    // Next frame only renders `live`; `stale`'s node is gone from the view.
    state.begin_frame();
    state.node(live);
    state.end_frame();

    assert!(state.node_if_live(stale).is_none());
    assert!(state.node_if_live(live).is_some());
}

#[test]
fn touch_if_live_extends_existing_state_but_creates_none() {
    let mut state = ViewerState::new();
    let cell = CellId::new();
    let live = key_for(cell, "live");
    let ghost = key_for(cell, "ghost");

    state.begin_frame();
    state.node(live).loading = true;
    state.end_frame();

    state.begin_frame();
    state.touch_if_live(live);
    state.touch_if_live(ghost);
    state.end_frame();

    assert!(state.node_if_live(live).is_some_and(|n| n.loading));
    assert!(state.node_if_live(ghost).is_none());
}

#[test]
fn cell_update_clears_loading_but_not_collapse() {
    let mut state = ViewerState::new();
    let ours = CellId::new();
    let other = CellId::new();

    state.begin_frame();
    let key = key_for(ours, "a");
    state.node(key).collapsed = false;
    state.node(key).loading = true;
    let other_key = key_for(other, "b");
    state.node(other_key).loading = true;

    state.cell_updated(ours);

    assert!(!state.node(key).loading);
    assert!(!state.node(key).collapsed);
    assert!(state.node(other_key).loading, "other cells are untouched");
}

#[test]
fn table_width_resolution_prefers_applied_then_measured() {
    let mut table = TableUiState::default();
    table.ensure_columns(2);

    assert_eq!(table.resolved_width(0, 80.0), 80.0);

    table.record_content_width(0, 120.0);
    table.record_content_width(0, 90.0);
    table.commit_measurements();
    assert_eq!(table.resolved_width(0, 80.0), 120.0);

    table.widths[0] = Some(55.0);
    assert_eq!(table.resolved_width(0, 80.0), 55.0);
}

#[test]
fn measurements_reset_each_commit() {
    let mut table = TableUiState::default();
    table.ensure_columns(1);
    table.record_content_width(0, 200.0);
    table.commit_measurements();
    assert_eq!(table.measured_content_width(0), 200.0);

    // Nothing recorded this frame; the committed value drops to zero.
    table.commit_measurements();
    assert_eq!(table.measured_content_width(0), 0.0);
}
