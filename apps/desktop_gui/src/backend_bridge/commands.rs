//! Backend commands queued from UI to the evaluator worker.

use shared::protocol::DisclosureRequest;

pub enum BackendCommand {
    /// Widen one pagination window and re-deliver the owning cell.
    RevealMore(DisclosureRequest),
    /// Re-deliver every cell's current payload.
    RefreshAll,
}
