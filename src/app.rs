use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct UncertaintyViewerApp {
    pub state: AppState,
}

impl UncertaintyViewerApp {
    /// Runs the pipeline once so the first frame already has data.
    pub fn new(mut state: AppState) -> Self {
        state.refresh();
        Self { state }
    }
}

impl eframe::App for UncertaintyViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: records + chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.state.source.title());
            ui.separator();

            if let Some(outcome) = &self.state.outcome {
                if !outcome.filtered.is_empty() {
                    table::records_table(ui, &outcome.filtered, &self.state.label_colors);
                    ui.separator();
                }
            }

            plot::confidence_plot(ui, &self.state);
        });
    }
}
