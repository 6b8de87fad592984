use std::time::Duration;

use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod evaluator;
mod ui;

/// Desktop host for the structured value viewer, backed by an in-process
/// demo evaluator.
#[derive(Parser)]
#[command(name = "cellview")]
struct Cli {
    /// Tracing filter, e.g. `info` or `desktop_gui=debug`.
    #[arg(long, default_value = "info")]
    log_filter: String,
    /// Simulated evaluation latency for disclosure requests, in milliseconds.
    #[arg(long, default_value_t = 150)]
    reveal_latency_ms: u64,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter))
        .init();

    let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(256);
    let (ui_tx, ui_rx) = crossbeam_channel::bounded(2048);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        Duration::from_millis(cli.reveal_latency_ms),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cell Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::ViewerApp::new(cmd_tx, ui_rx)))),
    )
}
