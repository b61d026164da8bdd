use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints, Points};

use crate::data::resample::{Aggregation, ChartArtifact};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Confidence plot (central panel)
// ---------------------------------------------------------------------------

/// Render the chart for the last pipeline run, or the matching "no data" note.
pub fn confidence_plot(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };

    match &outcome.aggregation {
        None => {
            ui.label("No data available.");
        }
        Some(Aggregation::NoData) => {
            ui.label("No data to plot.");
        }
        Some(Aggregation::Chart(chart)) => draw_chart(ui, chart),
    }
}

fn draw_chart(ui: &mut Ui, chart: &ChartArtifact) {
    ui.strong(&chart.title);

    let points: Vec<[f64; 2]> = chart
        .points
        .iter()
        .map(|(start, mean)| [to_plot_x(*start), *mean])
        .collect();
    let bounds = plot_bounds(&points, chart.y_range);
    let format = chart.bucket_size.label_format();

    Plot::new("confidence_plot")
        .legend(Legend::default())
        .x_axis_label("Time")
        .y_axis_label("Mean Confidence")
        .x_axis_formatter(move |mark, _range| format_x(mark.value, format))
        .label_formatter(move |_name, value| {
            format!("{}\n{:.3}", format_x(value.x, format), value.y)
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(bounds);
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("mean confidence")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(Color32::LIGHT_BLUE)
                    .radius(3.5),
            );
            plot_ui.hline(
                HLine::new(chart.threshold)
                    .name("threshold")
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

/// Plot x coordinate: seconds since the epoch.
fn to_plot_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn format_x(x: f64, format: &str) -> String {
    DateTime::from_timestamp(x.round() as i64, 0)
        .map(|dt| dt.naive_utc().format(format).to_string())
        .unwrap_or_default()
}

/// x spans the series with 5% padding (half a day minimum); y is fixed.
fn plot_bounds(points: &[[f64; 2]], y_range: (f64, f64)) -> PlotBounds {
    let (min_x, max_x) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[0]), hi.max(p[0]))
        });
    let pad = ((max_x - min_x) * 0.05).max(43_200.0);
    PlotBounds::from_min_max([min_x - pad, y_range.0], [max_x + pad, y_range.1])
}
