//! Container Renderer (Table): schema header, paginated rows and columns,
//! drag-resizable and double-click auto-fit column widths.
//!
//! Column 0 is the row-label column; visual column `c` for `c > 0` maps to
//! schema/cell index `c - 1`.

use shared::domain::Axis;
use shared::protocol::{
    DisclosureRequest, PayloadSlot, RowBody, TableBody, TableCell, TableRow, DIV_KIND,
    MORE_SENTINEL, TABLE_KIND, TEXT_PLAIN_KIND, TREE_KIND,
};

use crate::disclosure::show_more_button;
use crate::dispatch::render_slot;
use crate::state::{NodeEnv, TableUiState};
use crate::RenderCtx;

/// Columns never shrink below this; drag deltas that would go lower are not
/// applied.
pub const MIN_COL_WIDTH: f32 = 20.0;
/// Approximate width of one character for plain-text cells (0.5rem at the
/// default 16px root font).
pub const CHAR_WIDTH: f32 = 8.0;
/// Fixed padding added by auto-fit (2rem).
pub const AUTOFIT_PADDING: f32 = 32.0;
pub const DEFAULT_COL_WIDTH: f32 = 80.0;

/// Drag geometry: the dragged column takes `start + dx` and the table grows
/// by the same `dx`, but only while the result stays above the floor.
pub fn apply_drag(start_col_width: f32, start_table_width: f32, dx: f32) -> Option<(f32, f32)> {
    let width = start_col_width + dx;
    (width > MIN_COL_WIDTH).then_some((width, start_table_width + dx))
}

/// Heuristic width of a plain-text cell, from its character count.
pub fn text_content_width(char_count: usize) -> f32 {
    char_count as f32 * CHAR_WIDTH
}

/// Auto-fit result for a column whose widest content measures
/// `max_content_width`. Zero rows degrade to the padding term alone.
pub fn autofit_width(max_content_width: f32) -> f32 {
    max_content_width + AUTOFIT_PADDING
}

pub(crate) fn show_table(ui: &mut egui::Ui, body: &TableBody, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    if env.ancestor_collapsed {
        // Hidden, not gone: geometry and pending-disclosure state survive
        // until the table actually leaves the view.
        ctx.state.touch_if_live(env.key);
        ctx.state.touch_if_live(env.key.child(("more", u8::from(Axis::Rows))));
        ctx.state.touch_if_live(env.key.child(("more", u8::from(Axis::Columns))));
        ui.weak("Table");
        return;
    }
    if !body.row_marker_is_terminal() || !body.column_cursor_is_consistent() {
        tracing::warn!(
            object_id = body.object_id.0,
            "table pagination markers are inconsistent; rendering as delivered"
        );
    }

    let key = env.key;
    let data_cols = match &body.schema {
        Some(schema) => schema.names.len(),
        None => body
            .rows
            .iter()
            .map(|row| match row {
                TableRow::Row(RowBody(_, cells)) => cells.len(),
                TableRow::More(_) => 0,
            })
            .max()
            .unwrap_or(0),
    };
    let ncols = 1 + data_cols;

    let widths: Vec<f32> = {
        let st = ctx.state.table(key);
        st.ensure_columns(ncols);
        let widths: Vec<f32> = (0..ncols)
            .map(|c| st.resolved_width(c, DEFAULT_COL_WIDTH).max(MIN_COL_WIDTH))
            .collect();
        if st.drag.is_none() {
            st.table_width = Some(widths.iter().sum());
        }
        widths
    };
    let mut measured = vec![0.0f32; ncols];

    if let Some(schema) = &body.schema {
        show_header(ui, body, schema, &widths, &mut measured, ctx, env);
    }
    show_body(ui, body, &widths, &mut measured, ctx, env);

    let st = ctx.state.table(key);
    for (col, width) in measured.into_iter().enumerate() {
        st.record_content_width(col, width);
    }
    st.commit_measurements();
}

fn show_header(
    ui: &mut egui::Ui,
    body: &TableBody,
    schema: &shared::protocol::TableSchema,
    widths: &[f32],
    measured: &mut [f32],
    ctx: &mut RenderCtx<'_>,
    env: NodeEnv,
) {
    let key = env.key;

    // Schema names row; every cell carries a resize handle on its right edge.
    ui.horizontal_top(|ui| {
        for (col, width) in widths.iter().enumerate() {
            let name = (col > 0).then(|| schema.names.get(col - 1)).flatten();
            let (rect, _) = bounded_cell(ui, *width, |ui| match name {
                Some(n) if n == MORE_SENTINEL => {
                    show_more_button(
                        ui,
                        ctx.state,
                        key.child(("more", u8::from(Axis::Columns))),
                        true,
                        DisclosureRequest {
                            cell_id: ctx.cell,
                            object_id: body.object_id,
                            axis: Axis::Columns,
                        },
                        ctx.sink,
                    );
                }
                Some(n) => {
                    ui.strong(n);
                }
                None => {}
            });
            if let Some(n) = name {
                if n != MORE_SENTINEL {
                    measured[col] = measured[col].max(text_content_width(n.chars().count()));
                }
            }

            let handle_rect = egui::Rect::from_min_max(
                egui::pos2(rect.right() - 2.0, rect.top()),
                egui::pos2(rect.right() + 2.0, rect.bottom()),
            );
            let response = ui
                .interact(
                    handle_rect,
                    key.id.with(("col_resize", col)),
                    egui::Sense::click_and_drag(),
                )
                .on_hover_cursor(egui::CursorIcon::ResizeHorizontal);
            let st = ctx.state.table(key);
            handle_resize(st, col, &response, widths);
            if response.double_clicked() {
                autofit_column(st, col);
            }
        }
    });

    // Schema types row: plain labels, empty at the marker position.
    ui.horizontal_top(|ui| {
        for (col, width) in widths.iter().enumerate() {
            let ty = (col > 0).then(|| schema.types.get(col - 1)).flatten();
            bounded_cell(ui, *width, |ui| {
                if let Some(t) = ty {
                    if t != MORE_SENTINEL {
                        ui.weak(t);
                    }
                }
            });
            if let Some(t) = ty {
                if t != MORE_SENTINEL {
                    measured[col] = measured[col].max(text_content_width(t.chars().count()));
                }
            }
        }
    });
    ui.separator();
}

fn show_body(
    ui: &mut egui::Ui,
    body: &TableBody,
    widths: &[f32],
    measured: &mut [f32],
    ctx: &mut RenderCtx<'_>,
    env: NodeEnv,
) {
    let key = env.key;
    for (ri, row) in body.rows.iter().enumerate() {
        match row {
            TableRow::More(_) => {
                // Trailing marker row, spanning all columns.
                show_more_button(
                    ui,
                    ctx.state,
                    key.child(("more", u8::from(Axis::Rows))),
                    true,
                    DisclosureRequest {
                        cell_id: ctx.cell,
                        object_id: body.object_id,
                        axis: Axis::Rows,
                    },
                    ctx.sink,
                );
            }
            TableRow::Row(RowBody(label, cells)) => {
                ui.horizontal_top(|ui| {
                    let label_text = format_label(label);
                    bounded_cell(ui, widths[0], |ui| {
                        ui.strong(&label_text);
                    });
                    measured[0] = measured[0].max(text_content_width(label_text.chars().count()));

                    for ci in 0..widths.len() - 1 {
                        let cell = cells.get(ci);
                        let (_, used) = bounded_cell(ui, widths[ci + 1], |ui| {
                            if let Some(TableCell::Slot(slot)) = cell {
                                render_slot(ui, slot, ctx, env.child(("cell", ri, ci)));
                            }
                            // Marker/null cells beyond the column cursor
                            // render as empty, never as an error.
                        });
                        if let Some(TableCell::Slot(slot)) = cell {
                            measured[ci + 1] = measured[ci + 1].max(cell_content_width(slot, used));
                        }
                    }
                });
            }
        }
    }
}

/// Content width for auto-fit: recursive-structure cells use their rendered
/// box width directly; plain text is approximated from character count.
fn cell_content_width(slot: &PayloadSlot, rendered_width: f32) -> f32 {
    match slot.kind() {
        TREE_KIND | TABLE_KIND | DIV_KIND => rendered_width,
        TEXT_PLAIN_KIND => match slot.content() {
            serde_json::Value::String(s) => text_content_width(s.chars().count()),
            other => text_content_width(other.to_string().chars().count()),
        },
        _ => rendered_width,
    }
}

fn handle_resize(st: &mut TableUiState, col: usize, response: &egui::Response, widths: &[f32]) {
    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            // Press solidifies every column at its currently rendered width.
            for (i, width) in widths.iter().enumerate() {
                st.widths[i] = Some(*width);
            }
            st.drag = Some(crate::state::ColumnDrag {
                col,
                start_x: pos.x,
                start_width: widths[col],
                start_table_width: st.table_width.unwrap_or_else(|| widths.iter().sum()),
            });
        }
    }
    if response.dragged() {
        if let (Some(drag), Some(pos)) = (st.drag, response.interact_pointer_pos()) {
            if drag.col == col {
                let dx = pos.x - drag.start_x;
                if let Some((width, table_width)) =
                    apply_drag(drag.start_width, drag.start_table_width, dx)
                {
                    st.widths[col] = Some(width);
                    st.table_width = Some(table_width);
                }
            }
        }
    }
    if response.drag_stopped() {
        // The gesture scope ends here no matter how the drag ended.
        st.drag = None;
    }
}

fn autofit_column(st: &mut TableUiState, col: usize) {
    let current = st.resolved_width(col, DEFAULT_COL_WIDTH);
    let fitted = autofit_width(st.measured_content_width(col));
    if let Some(slot) = st.widths.get_mut(col) {
        *slot = Some(fitted);
    }
    if let Some(table_width) = st.table_width.as_mut() {
        *table_width += fitted - current;
    }
}

/// Fixed-width cell with horizontal clipping; returns the allocated rect and
/// the natural content width.
fn bounded_cell(
    ui: &mut egui::Ui,
    width: f32,
    add: impl FnOnce(&mut egui::Ui),
) -> (egui::Rect, f32) {
    let inner = ui.allocate_ui_with_layout(
        egui::vec2(width, 0.0),
        egui::Layout::top_down(egui::Align::Min),
        |ui| {
            ui.set_min_width(width);
            ui.set_max_width(width);
            let mut clip = ui.clip_rect();
            clip.max.x = clip.max.x.min(ui.max_rect().left() + width);
            ui.set_clip_rect(clip);
            add(ui);
            ui.min_rect().width()
        },
    );
    (inner.response.rect, inner.inner)
}

fn format_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
