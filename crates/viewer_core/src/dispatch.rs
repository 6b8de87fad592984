//! Leaf dispatcher: selects a rendering strategy from the declared content
//! kind. Pure routing; every kind ends up somewhere, nothing is silently
//! dropped.

use shared::protocol::{
    CompositeBody, PayloadSlot, TableBody, TreeNode, DIV_KIND, IMAGE_KINDS, TABLE_KIND,
    TEXT_PLAIN_KIND, TREE_KIND,
};

use crate::state::NodeEnv;
use crate::{composite, table, tree, RenderCtx};

pub(crate) fn render_slot(
    ui: &mut egui::Ui,
    slot: &PayloadSlot,
    ctx: &mut RenderCtx<'_>,
    env: NodeEnv,
) {
    match slot.kind() {
        kind if IMAGE_KINDS.contains(&kind) => {
            ctx.leaves.render_image(ui, kind, slot.content());
        }
        TEXT_PLAIN_KIND => render_text_plain(ui, slot.content()),
        TREE_KIND => match slot.decode::<TreeNode>() {
            Ok(node) => tree::show_node(ui, &node, ctx, env),
            Err(err) => render_undecodable(ui, &err),
        },
        TABLE_KIND => match slot.decode::<TableBody>() {
            Ok(body) => table::show_table(ui, &body, ctx, env),
            Err(err) => render_undecodable(ui, &err),
        },
        DIV_KIND => match slot.decode::<CompositeBody>() {
            Ok(body) => composite::show_composite(ui, &body, ctx, env),
            Err(err) => render_undecodable(ui, &err),
        },
        other => {
            // Generic collaborator path; always a fresh sub-render, so it
            // never carries freshness metadata.
            ctx.leaves.render_leaf(
                ui,
                other,
                slot.content(),
                ctx.cell,
                ctx.persist_ui_state,
                None,
            );
        }
    }
}

/// Verbatim text: inline, preformatted, no block chrome.
fn render_text_plain(ui: &mut egui::Ui, content: &serde_json::Value) {
    let text = match content {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ui.add(
        egui::Label::new(egui::RichText::new(text).monospace())
            .wrap_mode(egui::TextWrapMode::Extend),
    );
}

/// A malformed container payload degrades locally; siblings keep rendering.
fn render_undecodable(ui: &mut egui::Ui, err: &shared::error::ProtocolError) {
    tracing::warn!(error = %err, "payload failed to decode; rendering placeholder");
    ui.weak("⟨unrenderable value⟩");
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
