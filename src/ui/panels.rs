use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::loader;
use crate::data::resample::BucketSize;
use crate::pipeline::PredictionChoice;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Any change re-runs the pipeline.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut changed = false;
    let sel = &mut state.selection;

    ui.strong("Threshold");
    let slider = ui.add(
        egui::Slider::new(&mut sel.threshold, 0.0..=1.0)
            .step_by(0.01)
            .fixed_decimals(2),
    );
    changed |= committed(slider.changed(), slider.dragged(), slider.drag_stopped());
    ui.add_space(6.0);

    ui.strong("Start Date");
    changed |= ui
        .add(DatePickerButton::new(&mut sel.start).id_salt("start_date"))
        .changed();
    ui.add_space(6.0);

    ui.strong("End Date");
    changed |= ui
        .add(DatePickerButton::new(&mut sel.end).id_salt("end_date"))
        .changed();
    ui.add_space(6.0);

    ui.strong("Prediction Type");
    egui::ComboBox::from_id_salt("prediction_type")
        .selected_text(sel.prediction.label())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in PredictionChoice::ALL {
                changed |= ui
                    .selectable_value(&mut sel.prediction, choice, choice.label())
                    .changed();
            }
        });
    ui.add_space(6.0);

    ui.strong("Aggregate Time Frame");
    egui::ComboBox::from_id_salt("time_frame")
        .selected_text(sel.time_frame.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for size in BucketSize::ALL {
                changed |= ui
                    .selectable_value(&mut sel.time_frame, size, size.to_string())
                    .changed();
            }
        });

    if changed {
        state.refresh();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
/// A slider only commits once the drag ends; clicks and keyboard steps commit
/// immediately.
fn committed(changed: bool, dragged: bool, drag_stopped: bool) -> bool {
    drag_stopped || (changed && !dragged)
}

pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open export…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui.button("Reload").clicked() {
            state.refresh();
        }

        ui.separator();

        if let Some(outcome) = &state.outcome {
            ui.label(format!(
                "{} records loaded, {} shown",
                outcome.loaded_rows,
                outcome.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open table export")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::open_export(&path, state.export_page_size) {
            Ok(table) => state.set_source(Box::new(table)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::committed;

    #[test]
    fn slider_commits_when_drag_ends() {
        // mid-drag frames
        assert!(!committed(true, true, false));
        assert!(!committed(false, true, false));
        // release
        assert!(committed(false, false, true));
        assert!(committed(true, false, true));
    }

    #[test]
    fn click_or_key_commits_immediately() {
        assert!(committed(true, false, false));
        assert!(!committed(false, false, false));
    }
}
