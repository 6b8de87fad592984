//! Composite container: a stateless styled wrapper around a fixed list of
//! child payload slots. No pagination, no collapse, no recursion control.
//!
//! The `style`/`classname` attributes are pass-throughs for HTML hosts; this
//! egui host keeps them on the wire but renders a plain frame.

use shared::protocol::CompositeBody;

use crate::dispatch::render_slot;
use crate::state::NodeEnv;
use crate::RenderCtx;

pub(crate) fn show_composite(
    ui: &mut egui::Ui,
    body: &CompositeBody,
    ctx: &mut RenderCtx<'_>,
    env: NodeEnv,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical(|ui| {
            for (i, child) in body.children.iter().enumerate() {
                render_slot(ui, child, ctx, env.child(("div", i)));
            }
        });
    });
}
