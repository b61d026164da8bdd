use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::LabelColors;
use crate::data::model::Table;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scrollable grid of the filtered records: the typed columns first, then
/// every other attribute the items carry.
pub fn records_table(ui: &mut Ui, table: &Table, colors: &LabelColors) {
    let extra = table.extra_columns();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(260.0)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .columns(Column::auto().at_least(60.0), extra.len())
        .header(20.0, |mut header| {
            for name in ["timestamp", "confidence", "prediction"]
                .into_iter()
                .chain(extra.iter().map(String::as_str))
            {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let record = &table.records[row.index()];
                row.col(|ui| {
                    ui.label(record.timestamp.format(TIMESTAMP_FORMAT).to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", record.confidence));
                });
                row.col(|ui| {
                    let label = record.prediction.as_deref();
                    ui.label(
                        RichText::new(label.unwrap_or("<none>"))
                            .color(colors.color_for(label)),
                    );
                });
                for name in &extra {
                    row.col(|ui| {
                        let text = record
                            .extra
                            .get(name)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        ui.label(text);
                    });
                }
            });
        });
}
