//! Recursive, lazily-disclosed renderer for structured value payloads.
//!
//! The embedding host owns a [`ViewerState`] arena and calls
//! [`render_output`] once per payload per frame. Everything the renderer
//! needs from the host comes in through [`RenderCtx`]: the owning cell
//! identity, the disclosure sink, and the leaf collaborators. Nothing is
//! recovered by walking rendered output.

use chrono::{DateTime, Utc};
use shared::domain::CellId;

pub mod composite;
pub mod dispatch;
pub mod disclosure;
pub mod state;
pub mod table;
pub mod tree;

pub use disclosure::{RequestOutcome, RevealSink};
pub use state::{NodeEnv, NodeKey, ViewerState};

/// Host collaborator for leaf payloads the core does not render itself:
/// images and every content kind without a reserved renderer. Unknown-kind
/// handling is this collaborator's concern, not the dispatcher's.
pub trait LeafRenderer {
    fn render_leaf(
        &mut self,
        ui: &mut egui::Ui,
        kind: &str,
        content: &serde_json::Value,
        cell: CellId,
        persist_ui_state: bool,
        last_run_timestamp: Option<DateTime<Utc>>,
    );

    fn render_image(&mut self, ui: &mut egui::Ui, kind: &str, content: &serde_json::Value);
}

/// Everything threaded through one recursive render pass.
pub struct RenderCtx<'a> {
    pub cell: CellId,
    pub persist_ui_state: bool,
    pub state: &'a mut ViewerState,
    pub sink: &'a dyn RevealSink,
    pub leaves: &'a mut dyn LeafRenderer,
}

/// Entry point: render one payload into the given `ui`.
pub fn render_output(ui: &mut egui::Ui, slot: &shared::protocol::PayloadSlot, ctx: &mut RenderCtx<'_>) {
    let env = NodeEnv::root(ctx.cell);
    dispatch::render_slot(ui, slot, ctx, env);
}
