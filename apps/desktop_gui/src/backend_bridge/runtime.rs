//! Backend worker thread between the UI command queue and the demo evaluator.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::evaluator::Evaluator;

/// Spawns the backend worker. Commands are processed strictly in order, so a
/// reveal for a cell is always answered by a snapshot that includes it.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    reveal_latency: Duration,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                tracing::error!(error = %err, "failed to build backend runtime");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let mut evaluator = Evaluator::with_samples();

            push_all_snapshots(&evaluator, &ui_tx);
            let _ = ui_tx.try_send(UiEvent::Info("evaluator ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::RevealMore(request) => {
                        // Simulated evaluation latency so the pending spinner
                        // is visible in the demo.
                        tokio::time::sleep(reveal_latency).await;
                        match evaluator.reveal_more(&request) {
                            Ok(update) => {
                                let title = evaluator.cell_title(update.cell_id);
                                push_event(&ui_tx, UiEvent::CellUpdated { title, update });
                            }
                            Err(err) => {
                                tracing::error!(
                                    cell_id = ?request.cell_id,
                                    object_id = ?request.object_id,
                                    code = ?err.code,
                                    error = %err,
                                    "disclosure request rejected"
                                );
                                push_event(
                                    &ui_tx,
                                    UiEvent::Error(UiError::from_eval(
                                        UiErrorContext::Disclosure,
                                        err,
                                    )),
                                );
                            }
                        }
                    }
                    BackendCommand::RefreshAll => push_all_snapshots(&evaluator, &ui_tx),
                }
            }
            tracing::debug!("command queue closed; backend worker exiting");
        });
    });
}

fn push_all_snapshots(evaluator: &Evaluator, ui_tx: &Sender<UiEvent>) {
    for cell_id in evaluator.cell_ids() {
        match evaluator.snapshot(cell_id) {
            Ok(update) => {
                let title = evaluator.cell_title(cell_id);
                push_event(ui_tx, UiEvent::CellUpdated { title, update });
            }
            Err(err) => {
                tracing::error!(cell_id = ?cell_id, code = ?err.code, error = %err, "failed to serialize cell");
                push_event(
                    ui_tx,
                    UiEvent::Error(UiError::from_eval(UiErrorContext::General, err)),
                );
            }
        }
    }
}

fn push_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.try_send(event).is_err() {
        tracing::warn!("ui event queue full or disconnected; dropping event");
    }
}
