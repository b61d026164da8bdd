mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use anyhow::Context;
use app::UncertaintyViewerApp;
use clap::Parser;
use config::Config;
use data::dynamo::DynamoTable;
use data::loader;
use data::source::RecordSource;
use eframe::egui;
use pipeline::Selection;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();
    log::debug!("{config:?}");

    let source: Box<dyn RecordSource> = match &config.file {
        Some(path) => Box::new(loader::open_export(path, config.page_size)?),
        None => Box::new(
            DynamoTable::connect(&config.table, config.region.clone())
                .context("connecting to DynamoDB")?,
        ),
    };

    let today = chrono::Local::now().date_naive();
    let state = AppState::new(
        source,
        Selection::starting_at(today),
        config.on_invalid,
        config.page_size,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Uncertainty Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(UncertaintyViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
