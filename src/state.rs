use crate::color::LabelColors;
use crate::data::coerce::InvalidRecords;
use crate::data::source::RecordSource;
use crate::pipeline::{self, PipelineOutcome, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where records come from (DynamoDB or an opened export).
    pub source: Box<dyn RecordSource>,

    /// Sidebar selections.
    pub selection: Selection,

    /// Policy for items that fail coercion.
    pub on_invalid: InvalidRecords,

    /// Scan page size used for exports opened from the UI.
    pub export_page_size: usize,

    /// Result of the last pipeline run (None until the first run, or after an
    /// aborted one).
    pub outcome: Option<PipelineOutcome>,

    /// Colours for the prediction labels of the current result.
    pub label_colors: LabelColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        source: Box<dyn RecordSource>,
        selection: Selection,
        on_invalid: InvalidRecords,
        export_page_size: usize,
    ) -> Self {
        Self {
            source,
            selection,
            on_invalid,
            export_page_size,
            outcome: None,
            label_colors: LabelColors::default(),
            status_message: None,
        }
    }

    /// Swap the table source and reload.
    pub fn set_source(&mut self, source: Box<dyn RecordSource>) {
        log::info!("Switched source to '{}'", source.name());
        self.source = source;
        self.refresh();
    }

    /// Run the whole pipeline for the current selection.
    pub fn refresh(&mut self) {
        match pipeline::run(self.source.as_ref(), &self.selection, self.on_invalid) {
            Ok(outcome) => {
                self.label_colors = LabelColors::new(&outcome.filtered.prediction_labels());
                self.status_message = outcome.notice.clone().or_else(|| {
                    (outcome.skipped_rows > 0)
                        .then(|| format!("Skipped {} invalid records", outcome.skipped_rows))
                });
                self.outcome = Some(outcome);
            }
            Err(e) => {
                log::error!("Failed to process data: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.outcome = None;
            }
        }
    }
}
