//! Disclosure protocol client: the "more" affordance and its idempotency
//! rules.
//!
//! Requests are fire-and-forget. No response handle is tracked; the next
//! payload delivered for the value is assumed to reflect the expansion. The
//! per-node `loading` flag is the only backpressure: it bounds in-flight
//! requests per node to one and is cleared by payload replacement, never
//! locally.

use shared::protocol::DisclosureRequest;

use crate::state::{NodeKey, ViewerState};

/// Outbound half of the protocol, implemented by the host (e.g. a bounded
/// channel into the evaluator worker).
pub trait RevealSink {
    fn reveal_more(&self, request: DisclosureRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Issued,
    /// A request for this node is already in flight; the click is ignored.
    AlreadyLoading,
    /// The owning node is collapsed or absent; the click is a no-op and
    /// leaves no state behind.
    NodeHidden,
}

/// Click handler for a "more" affordance. `node_disclosed` is false when the
/// owning container is collapsed or under a collapsed ancestor.
pub fn request_more(
    state: &mut ViewerState,
    key: NodeKey,
    node_disclosed: bool,
    request: DisclosureRequest,
    sink: &dyn RevealSink,
) -> RequestOutcome {
    if !node_disclosed {
        return RequestOutcome::NodeHidden;
    }
    let node = state.node(key);
    if node.loading {
        return RequestOutcome::AlreadyLoading;
    }
    node.loading = true;
    tracing::debug!(
        cell = %request.cell_id.0,
        object_id = request.object_id.0,
        axis = u8::from(request.axis),
        "issuing disclosure request"
    );
    sink.reveal_more(request);
    RequestOutcome::Issued
}

/// Render the "more" control and run the click through [`request_more`].
pub(crate) fn show_more_button(
    ui: &mut egui::Ui,
    state: &mut ViewerState,
    key: NodeKey,
    node_disclosed: bool,
    request: DisclosureRequest,
    sink: &dyn RevealSink,
) {
    if !node_disclosed {
        // Inert marker inside a collapsed subtree.
        ui.weak("more");
        return;
    }
    let loading = state.node(key).loading;
    if loading {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().size(10.0));
            ui.weak("more");
        });
        return;
    }
    let response = ui
        .link("more")
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        request_more(state, key, node_disclosed, request, sink);
    }
}

#[cfg(test)]
#[path = "tests/disclosure_tests.rs"]
mod tests;
