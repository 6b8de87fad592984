//! eframe application hosting the viewer over the demo evaluator.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local, Utc};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::CellId;
use shared::protocol::{DisclosureRequest, PayloadSlot};
use viewer_core::{LeafRenderer, RenderCtx, RevealSink, ViewerState};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

struct CellView {
    title: String,
    slot: PayloadSlot,
    delivered_at: DateTime<Utc>,
}

/// [`RevealSink`] over the UI->backend command queue. Dispatch failures are
/// parked here and drained into the status line after the render pass, since
/// the sink is shared immutably across the whole recursive render.
struct CommandSink {
    cmd_tx: Sender<BackendCommand>,
    failure: RefCell<Option<String>>,
}

impl RevealSink for CommandSink {
    fn reveal_more(&self, request: DisclosureRequest) {
        let mut status = String::new();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::RevealMore(request),
            &mut status,
        );
        if !status.is_empty() {
            *self.failure.borrow_mut() = Some(status);
        }
    }
}

/// Leaf collaborators: image payloads decode into cached textures, every
/// other unreserved kind falls back to a labeled monospace dump.
#[derive(Default)]
struct HostLeaves {
    // None caches a failed decode so it is not retried every frame.
    textures: HashMap<u64, Option<egui::TextureHandle>>,
}

impl LeafRenderer for HostLeaves {
    fn render_leaf(
        &mut self,
        ui: &mut egui::Ui,
        kind: &str,
        content: &serde_json::Value,
        _cell: CellId,
        _persist_ui_state: bool,
        last_run_timestamp: Option<DateTime<Utc>>,
    ) {
        let body = match content {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
        ui.vertical(|ui| {
            ui.weak(kind);
            let label = ui.label(egui::RichText::new(body).monospace());
            if let Some(ts) = last_run_timestamp {
                label.on_hover_text(format!("delivered {}", ts.format("%Y-%m-%d %H:%M:%S")));
            }
        });
    }

    fn render_image(&mut self, ui: &mut egui::Ui, kind: &str, content: &serde_json::Value) {
        let Some(encoded) = content.as_str() else {
            ui.weak("⟨image payload is not a string⟩");
            return;
        };
        let hash = {
            let mut hasher = DefaultHasher::new();
            encoded.hash(&mut hasher);
            hasher.finish()
        };
        let texture = self.textures.entry(hash).or_insert_with(|| {
            match decode_image(encoded) {
                Ok(color) => Some(ui.ctx().load_texture(
                    format!("cell-image-{hash:016x}"),
                    color,
                    egui::TextureOptions::LINEAR,
                )),
                Err(err) => {
                    tracing::warn!(kind, error = %err, "failed to decode image payload");
                    None
                }
            }
        });
        match texture {
            Some(texture) => {
                ui.image(&*texture);
            }
            None => {
                ui.weak("⟨undecodable image⟩");
            }
        }
    }
}

fn decode_image(encoded: &str) -> anyhow::Result<egui::ColorImage> {
    use base64::Engine as _;

    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    let decoded = image::load_from_memory(&bytes)?;
    let size = [decoded.width() as usize, decoded.height() as usize];
    let rgba = decoded.to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

pub struct ViewerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    cells: BTreeMap<CellId, CellView>,
    state: ViewerState,
    leaves: HostLeaves,
    status: Option<String>,
    persist_ui_state: bool,
}

impl ViewerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            cells: BTreeMap::new(),
            state: ViewerState::new(),
            leaves: HostLeaves::default(),
            status: None,
            persist_ui_state: true,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => tracing::info!("{message}"),
                UiEvent::CellUpdated { title, update } => {
                    // Replacement payload: pending disclosures for this cell
                    // are answered; collapse state survives on purpose.
                    self.state.cell_updated(update.cell_id);
                    self.cells.insert(
                        update.cell_id,
                        CellView {
                            title,
                            slot: update.slot,
                            delivered_at: update.delivered_at,
                        },
                    );
                }
                UiEvent::Error(err) => {
                    tracing::error!(
                        category = ?err.category(),
                        context = ?err.context(),
                        message = err.message(),
                        "backend error"
                    );
                    self.status = Some(err.message().to_string());
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Refresh all").clicked() {
                    let mut status = String::new();
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::RefreshAll, &mut status);
                    if !status.is_empty() {
                        self.status = Some(status);
                    }
                }
                ui.checkbox(&mut self.persist_ui_state, "Keep widget state across updates");
            });
        });

        if let Some(status) = self.status.clone() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui.visuals().error_fg_color, status);
                    if ui.button("Dismiss").clicked() {
                        self.status = None;
                    }
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let sink = CommandSink {
                        cmd_tx: self.cmd_tx.clone(),
                        failure: RefCell::new(None),
                    };
                    self.state.begin_frame();
                    for (cell_id, view) in &self.cells {
                        ui.horizontal(|ui| {
                            ui.heading(&view.title);
                            ui.weak(
                                view.delivered_at
                                    .with_timezone(&Local)
                                    .format("%H:%M:%S")
                                    .to_string(),
                            );
                        });
                        let mut render_ctx = RenderCtx {
                            cell: *cell_id,
                            persist_ui_state: self.persist_ui_state,
                            state: &mut self.state,
                            sink: &sink,
                            leaves: &mut self.leaves,
                        };
                        viewer_core::render_output(ui, &view.slot, &mut render_ctx);
                        ui.separator();
                    }
                    self.state.end_frame();
                    if let Some(failure) = sink.failure.into_inner() {
                        self.status = Some(failure);
                    }
                });
        });
    }
}
