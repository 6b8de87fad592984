//! Per-node UI state, owned by an arena keyed on stable node identity.
//!
//! A node's key is its owning cell plus the structural path from the payload
//! root, so state survives re-renders of a value that mutates underneath the
//! view, and dies with the node: entries not touched during a frame are
//! pruned at `end_frame`.

use std::collections::HashMap;
use std::hash::Hash;

use shared::domain::CellId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub cell: CellId,
    pub id: egui::Id,
}

impl NodeKey {
    pub fn root(cell: CellId) -> Self {
        Self {
            cell,
            id: egui::Id::new(("cellview", cell)),
        }
    }

    pub fn child(self, part: impl Hash) -> Self {
        Self {
            cell: self.cell,
            id: self.id.with(part),
        }
    }
}

/// Structural position of the node being rendered: its state key plus
/// whether any strict ancestor container is collapsed (a collapsed ancestor
/// swallows descendant interaction).
#[derive(Debug, Clone, Copy)]
pub struct NodeEnv {
    pub key: NodeKey,
    pub ancestor_collapsed: bool,
}

impl NodeEnv {
    pub fn root(cell: CellId) -> Self {
        Self {
            key: NodeKey::root(cell),
            ancestor_collapsed: false,
        }
    }

    pub fn child(self, part: impl Hash) -> Self {
        Self {
            key: self.key.child(part),
            ancestor_collapsed: self.ancestor_collapsed,
        }
    }

    /// Environment for children of a collapsed container.
    pub fn under_collapsed(self) -> Self {
        Self {
            ancestor_collapsed: true,
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeUiState {
    /// Every container starts collapsed; `pair` never allocates state.
    pub collapsed: bool,
    /// One in-flight disclosure request per node. Never reset locally; only
    /// a replacement payload for the owning cell clears it.
    pub loading: bool,
    touched: u64,
}

impl NodeUiState {
    fn new(frame: u64) -> Self {
        Self {
            collapsed: true,
            loading: false,
            touched: frame,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDrag {
    pub col: usize,
    pub start_x: f32,
    pub start_width: f32,
    pub start_table_width: f32,
}

/// Column geometry state for one rendered table.
#[derive(Debug, Clone, Default)]
pub struct TableUiState {
    /// Applied widths (drag/auto-fit results); `None` means natural width.
    pub widths: Vec<Option<f32>>,
    pub table_width: Option<f32>,
    pub drag: Option<ColumnDrag>,
    /// Per-column max content width committed at the end of the last frame.
    measured: Vec<f32>,
    measuring: Vec<f32>,
    touched: u64,
}

impl TableUiState {
    pub fn ensure_columns(&mut self, count: usize) {
        self.widths.resize(count, None);
        self.measured.resize(count, 0.0);
        self.measuring.resize(count, 0.0);
    }

    pub fn record_content_width(&mut self, col: usize, width: f32) {
        if let Some(slot) = self.measuring.get_mut(col) {
            *slot = slot.max(width);
        }
    }

    pub fn measured_content_width(&self, col: usize) -> f32 {
        self.measured.get(col).copied().unwrap_or(0.0)
    }

    pub fn commit_measurements(&mut self) {
        std::mem::swap(&mut self.measured, &mut self.measuring);
        self.measuring.iter_mut().for_each(|w| *w = 0.0);
    }

    pub fn resolved_width(&self, col: usize, fallback: f32) -> f32 {
        if let Some(Some(applied)) = self.widths.get(col) {
            return *applied;
        }
        let measured = self.measured_content_width(col);
        if measured > 0.0 {
            measured
        } else {
            fallback
        }
    }
}

/// Arena of all per-node UI state owned by one embedding host.
#[derive(Debug, Default)]
pub struct ViewerState {
    nodes: HashMap<NodeKey, NodeUiState>,
    tables: HashMap<NodeKey, TableUiState>,
    frame: u64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Drop state for nodes that were not rendered this frame; their
    /// DOM-equivalent is gone, and so is their state.
    pub fn end_frame(&mut self) {
        let frame = self.frame;
        self.nodes.retain(|_, s| s.touched == frame);
        self.tables.retain(|_, s| s.touched == frame);
    }

    pub fn node(&mut self, key: NodeKey) -> &mut NodeUiState {
        let frame = self.frame;
        let state = self
            .nodes
            .entry(key)
            .or_insert_with(|| NodeUiState::new(frame));
        state.touched = frame;
        state
    }

    pub fn node_if_live(&self, key: NodeKey) -> Option<&NodeUiState> {
        self.nodes.get(&key)
    }

    /// Keep an existing entry alive through a frame where its widget renders
    /// in a hidden or inert form (e.g. inside a collapsed container). Never
    /// creates state; a node that truly left the view still gets pruned.
    pub fn touch_if_live(&mut self, key: NodeKey) {
        let frame = self.frame;
        if let Some(state) = self.nodes.get_mut(&key) {
            state.touched = frame;
        }
        if let Some(table) = self.tables.get_mut(&key) {
            table.touched = frame;
        }
    }

    pub fn table(&mut self, key: NodeKey) -> &mut TableUiState {
        let frame = self.frame;
        let state = self.tables.entry(key).or_default();
        state.touched = frame;
        state
    }

    /// A replacement payload arrived for `cell`: the components it re-renders
    /// supersede the old ones, which clears their pending-disclosure flags.
    /// Collapse state intentionally survives the replacement.
    pub fn cell_updated(&mut self, cell: CellId) {
        for (key, state) in self.nodes.iter_mut() {
            if key.cell == cell {
                state.loading = false;
            }
        }
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
