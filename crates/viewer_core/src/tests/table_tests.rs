use super::*;
use crate::state::TableUiState;

#[test]
fn drag_applies_the_delta_to_column_and_table() {
    assert_eq!(apply_drag(100.0, 500.0, 30.0), Some((130.0, 530.0)));
    assert_eq!(apply_drag(100.0, 500.0, -60.0), Some((40.0, 440.0)));
}

#[test]
fn drag_never_shrinks_below_the_floor() {
    assert_eq!(apply_drag(100.0, 500.0, -80.0), None);
    assert_eq!(apply_drag(100.0, 500.0, -10_000.0), None);
    assert_eq!(apply_drag(MIN_COL_WIDTH + 1.0, 500.0, -1.0), None);
}

#[test]
fn column_stops_at_the_floor_for_any_delta_sequence() {
    let start = 120.0;
    let table = 600.0;
    let mut applied = (start, table);
    for dx in [-30.0, -500.0, -101.0, 5.0, -99.0, -1e6] {
        // Deltas are always measured from the drag start; unapplied moves
        // leave the previous applied width in place.
        if let Some(next) = apply_drag(start, table, dx) {
            applied = next;
        }
        assert!(applied.0 > MIN_COL_WIDTH);
    }
}

#[test]
fn autofit_of_an_empty_column_is_the_padding_alone() {
    assert_eq!(autofit_width(0.0), AUTOFIT_PADDING);

    let mut st = TableUiState::default();
    st.ensure_columns(1);
    st.commit_measurements();
    autofit_column(&mut st, 0);
    assert_eq!(st.widths[0], Some(AUTOFIT_PADDING));
}

#[test]
fn autofit_is_idempotent_without_content_changes() {
    let mut st = TableUiState::default();
    st.ensure_columns(2);
    st.record_content_width(1, text_content_width(12));
    st.commit_measurements();

    autofit_column(&mut st, 1);
    let first = st.widths[1];

    // Same content measured again next frame.
    st.record_content_width(1, text_content_width(12));
    st.commit_measurements();
    autofit_column(&mut st, 1);

    assert_eq!(st.widths[1], first);
    assert_eq!(first, Some(text_content_width(12) + AUTOFIT_PADDING));
}

#[test]
fn autofit_adjusts_table_width_by_the_column_delta() {
    let mut st = TableUiState::default();
    st.ensure_columns(2);
    st.widths[1] = Some(200.0);
    st.table_width = Some(300.0);
    st.record_content_width(1, 48.0);
    st.commit_measurements();

    autofit_column(&mut st, 1);

    assert_eq!(st.widths[1], Some(48.0 + AUTOFIT_PADDING));
    assert_eq!(st.table_width, Some(300.0 + (48.0 + AUTOFIT_PADDING) - 200.0));
}

#[test]
fn text_width_estimate_scales_with_character_count() {
    assert_eq!(text_content_width(0), 0.0);
    assert_eq!(text_content_width(4), 4.0 * CHAR_WIDTH);
}
