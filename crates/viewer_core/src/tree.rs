//! Container Renderer (Tree): recursive rendering of the container shapes
//! with per-node collapse state and the row-axis "more" affordance.

use shared::domain::{Axis, ObjectId};
use shared::protocol::{
    DisclosureRequest, FieldEntry, ListElement, MapEntry, PayloadSlot, SeqEntry, TreeNode,
};

use crate::disclosure::show_more_button;
use crate::dispatch::render_slot;
use crate::state::NodeEnv;
use crate::RenderCtx;

/// What a click effectively landed on, from the perspective of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The node itself or one of its direct label/prefix adornments.
    NodeOrPrefix,
    /// Something deeper inside the node's body.
    Descendant,
}

/// The toggle acceptance rule: accept only when the target resolves to self
/// (or its prefix), or self is collapsed; and never under a collapsed
/// ancestor, which swallows clicks meant for descendants.
pub fn accepts_toggle(target: ClickTarget, self_collapsed: bool, ancestor_collapsed: bool) -> bool {
    if ancestor_collapsed {
        return false;
    }
    target == ClickTarget::NodeOrPrefix || self_collapsed
}

pub(crate) fn show_node(ui: &mut egui::Ui, node: &TreeNode, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    if !node.marker_is_terminal() {
        tracing::warn!(
            shape = node.shape_tag(),
            "pagination marker out of terminal position"
        );
    }
    match node {
        TreeNode::Pair { key, value } => show_pair(ui, key, value, ctx, env),
        TreeNode::Circular => {
            ui.weak(egui::RichText::new("circular reference").italics());
        }
        TreeNode::Sequence {
            object_id,
            label,
            label_short,
            elements,
        } => show_container(
            ui,
            &ContainerParts {
                object_id: Some(*object_id),
                label,
                label_short,
                elements: ElementsView::Items {
                    items: elements,
                    show_index: true,
                },
            },
            ctx,
            env,
        ),
        TreeNode::Set {
            object_id,
            label,
            label_short,
            elements,
        } => show_container(
            ui,
            &ContainerParts {
                object_id: Some(*object_id),
                label,
                label_short,
                elements: ElementsView::Items {
                    items: elements,
                    show_index: false,
                },
            },
            ctx,
            env,
        ),
        TreeNode::OrderedMap {
            object_id,
            label,
            label_short,
            elements,
        } => show_container(
            ui,
            &ContainerParts {
                object_id: Some(*object_id),
                label,
                label_short,
                elements: ElementsView::Entries(elements),
            },
            ctx,
            env,
        ),
        TreeNode::NamedTuple {
            object_id,
            label,
            label_short,
            elements,
        }
        | TreeNode::Record {
            object_id,
            label,
            label_short,
            elements,
        } => show_container(
            ui,
            &ContainerParts {
                object_id: Some(*object_id),
                label,
                label_short,
                elements: ElementsView::Fields(elements),
            },
            ctx,
            env,
        ),
        // Unknown shape: empty body inside the collapsible wrapper, so one
        // malformed node cannot abort its siblings.
        TreeNode::Unknown => show_container(
            ui,
            &ContainerParts {
                object_id: None,
                label: "?",
                label_short: "?",
                elements: ElementsView::Empty,
            },
            ctx,
            env,
        ),
    }
}

struct ContainerParts<'a> {
    object_id: Option<ObjectId>,
    label: &'a str,
    label_short: &'a str,
    elements: ElementsView<'a>,
}

enum ElementsView<'a> {
    Items {
        items: &'a [ListElement<SeqEntry>],
        show_index: bool,
    },
    Entries(&'a [ListElement<MapEntry>]),
    Fields(&'a [ListElement<FieldEntry>]),
    Empty,
}

/// `pair` always renders both sides, with no collapse chrome and no state.
fn show_pair(
    ui: &mut egui::Ui,
    key: &PayloadSlot,
    value: &PayloadSlot,
    ctx: &mut RenderCtx<'_>,
    env: NodeEnv,
) {
    ui.horizontal(|ui| {
        render_slot(ui, key, ctx, env.child("pair_key"));
        ui.weak("=>");
        render_slot(ui, value, ctx, env.child("pair_value"));
    });
}

fn show_container(ui: &mut egui::Ui, parts: &ContainerParts<'_>, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    let more_key = env.key.child(("more", u8::from(Axis::Rows)));
    if env.ancestor_collapsed {
        // Inert: a collapsed ancestor owns all interaction in this subtree.
        // The node is hidden, not gone; its state survives the frame.
        ctx.state.touch_if_live(env.key);
        ctx.state.touch_if_live(more_key);
        compact_row(ui, parts, ctx, env);
        return;
    }

    let collapsed = ctx.state.node(env.key).collapsed;
    if collapsed {
        // Same for the hidden "more" affordance: an in-flight disclosure
        // stays pending across collapse and re-expand.
        ctx.state.touch_if_live(more_key);
        let inner = ui.scope(|ui| compact_row(ui, parts, ctx, env));
        let response = ui
            .interact(
                inner.response.rect,
                env.key.id.with("node"),
                egui::Sense::click(),
            )
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() && accepts_toggle(ClickTarget::NodeOrPrefix, true, false) {
            ctx.state.node(env.key).collapsed = false;
        }
    } else {
        expanded_body(ui, parts, ctx, env);
    }
}

/// Single-line rendering used for collapsed nodes and for every descendant
/// of a collapsed node. Children render without interaction of their own.
fn compact_row(ui: &mut egui::Ui, parts: &ContainerParts<'_>, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    let inert = env.under_collapsed();
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        ui.label(egui::RichText::new(parts.label_short).strong());
        match parts.elements {
            ElementsView::Items { items, .. } => {
                for (i, element) in items.iter().enumerate() {
                    compact_separator(ui, i);
                    match element {
                        ListElement::More(_) => {
                            ui.weak("more");
                        }
                        ListElement::Entry(entry) => {
                            render_slot(ui, &entry.value, ctx, inert.child(("item", i)));
                        }
                    }
                }
            }
            ElementsView::Entries(entries) => {
                for (i, element) in entries.iter().enumerate() {
                    compact_separator(ui, i);
                    match element {
                        ListElement::More(_) => {
                            ui.weak("more");
                        }
                        ListElement::Entry(entry) => {
                            render_slot(ui, &entry.key, ctx, inert.child(("key", i)));
                            ui.weak("=>");
                            render_slot(ui, &entry.value, ctx, inert.child(("value", i)));
                        }
                    }
                }
            }
            ElementsView::Fields(fields) => {
                for (i, element) in fields.iter().enumerate() {
                    compact_separator(ui, i);
                    match element {
                        ListElement::More(_) => {
                            ui.weak("more");
                        }
                        ListElement::Entry(entry) => {
                            ui.weak(format!("{}=", entry.name));
                            render_slot(ui, &entry.value, ctx, inert.child(("field", i)));
                        }
                    }
                }
            }
            ElementsView::Empty => {}
        }
    });
}

fn compact_separator(ui: &mut egui::Ui, index: usize) {
    if index > 0 {
        ui.weak(",");
    }
}

fn expanded_body(ui: &mut egui::Ui, parts: &ContainerParts<'_>, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    let prefix = ui
        .add(
            egui::Label::new(egui::RichText::new(parts.label).strong())
                .sense(egui::Sense::click()),
        )
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if prefix.clicked() && accepts_toggle(ClickTarget::NodeOrPrefix, false, env.ancestor_collapsed) {
        ctx.state.node(env.key).collapsed = true;
    }

    ui.indent(env.key.id.with("body"), |ui| match parts.elements {
        ElementsView::Items { items, show_index } => {
            for (i, element) in items.iter().enumerate() {
                match element {
                    ListElement::More(_) => more_row(ui, parts, ctx, env),
                    ListElement::Entry(entry) => {
                        ui.horizontal(|ui| {
                            if show_index {
                                if let Some(index) = &entry.index {
                                    ui.weak(format_key(index));
                                }
                            }
                            render_slot(ui, &entry.value, ctx, env.child(("item", i)));
                        });
                    }
                }
            }
        }
        ElementsView::Entries(entries) => {
            for (i, element) in entries.iter().enumerate() {
                match element {
                    ListElement::More(_) => more_row(ui, parts, ctx, env),
                    ListElement::Entry(entry) => {
                        ui.horizontal(|ui| {
                            render_slot(ui, &entry.key, ctx, env.child(("key", i)));
                            ui.weak("=>");
                            render_slot(ui, &entry.value, ctx, env.child(("value", i)));
                        });
                    }
                }
            }
        }
        ElementsView::Fields(fields) => {
            for (i, element) in fields.iter().enumerate() {
                match element {
                    ListElement::More(_) => more_row(ui, parts, ctx, env),
                    ListElement::Entry(entry) => {
                        ui.horizontal(|ui| {
                            ui.weak(format!("{} =", entry.name));
                            render_slot(ui, &entry.value, ctx, env.child(("field", i)));
                        });
                    }
                }
            }
        }
        ElementsView::Empty => {}
    });
}

fn more_row(ui: &mut egui::Ui, parts: &ContainerParts<'_>, ctx: &mut RenderCtx<'_>, env: NodeEnv) {
    let Some(object_id) = parts.object_id else {
        ui.weak("more");
        return;
    };
    show_more_button(
        ui,
        ctx.state,
        env.key.child(("more", u8::from(Axis::Rows))),
        !env.ancestor_collapsed,
        DisclosureRequest {
            cell_id: ctx.cell,
            object_id,
            axis: Axis::Rows,
        },
        ctx.sink,
    );
}

fn format_key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
