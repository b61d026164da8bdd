use chrono::{Days, NaiveDate};

use crate::data::coerce::{coerce, InvalidRecords, ParseError};
use crate::data::filter::{filter, CategoryFilter, DateRange};
use crate::data::model::Table;
use crate::data::resample::{aggregate_and_render, Aggregation, BucketSize};
use crate::data::source::RecordSource;

// ---------------------------------------------------------------------------
// User selection
// ---------------------------------------------------------------------------

/// Prediction types offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionChoice {
    #[default]
    All,
    Positive,
    Negative,
}

impl PredictionChoice {
    pub const ALL: [PredictionChoice; 3] = [
        PredictionChoice::All,
        PredictionChoice::Positive,
        PredictionChoice::Negative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PredictionChoice::All => "All",
            PredictionChoice::Positive => "Positive",
            PredictionChoice::Negative => "Negative",
        }
    }

    /// Labels in the table are lower case.
    pub fn category(self) -> CategoryFilter {
        CategoryFilter::from_choice(&self.label().to_lowercase())
    }
}

/// Everything the sidebar controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub threshold: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub prediction: PredictionChoice,
    pub time_frame: BucketSize,
}

impl Selection {
    /// Defaults relative to `today`: the last 366 days, threshold 0.5.
    pub fn starting_at(today: NaiveDate) -> Self {
        Selection {
            threshold: 0.5,
            start: today.checked_sub_days(Days::new(366)).unwrap_or(today),
            end: today,
            prediction: PredictionChoice::All,
            time_frame: BucketSize::Hourly,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// What one interaction produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutcome {
    /// User-facing message when the load failed.
    pub notice: Option<String>,
    /// Items delivered by the table before coercion.
    pub loaded_rows: usize,
    /// Items dropped by the coercion policy.
    pub skipped_rows: usize,
    pub filtered: Table,
    /// `None` when the table itself was empty and nothing was aggregated.
    pub aggregation: Option<Aggregation>,
}

/// Load → coerce → filter → aggregate, once.
///
/// Load failures are absorbed into `notice` and treated as an empty table.
/// Parse failures under [`InvalidRecords::Abort`] abort the run.
pub fn run(
    source: &dyn RecordSource,
    selection: &Selection,
    policy: InvalidRecords,
) -> Result<PipelineOutcome, ParseError> {
    let (items, notice) = match source.fetch_all() {
        Ok(items) => (items, None),
        Err(e) => {
            log::error!("Failed to fetch data from '{}': {e}", source.name());
            (Vec::new(), Some(format!("Failed to fetch data: {e}")))
        }
    };

    let loaded_rows = items.len();
    if items.is_empty() {
        return Ok(PipelineOutcome {
            notice,
            ..Default::default()
        });
    }

    let coerced = coerce(items, policy)?;
    let filtered = filter(&coerced.table, &selection.range(), &selection.prediction.category());
    log::info!(
        "{} of {loaded_rows} records match {}..={} / {}",
        filtered.len(),
        selection.start,
        selection.end,
        selection.prediction.label()
    );
    let aggregation = aggregate_and_render(&filtered, selection.time_frame, selection.threshold);

    Ok(PipelineOutcome {
        notice,
        loaded_rows,
        skipped_rows: coerced.skipped,
        filtered,
        aggregation: Some(aggregation),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::data::model::{RawItem, RawValue};
    use crate::data::resample::ChartArtifact;
    use crate::data::source::{InMemoryTable, LoadError};

    fn item(ts: &str, confidence: &str, prediction: &str) -> RawItem {
        RawItem::from([
            ("timestamp".to_string(), RawValue::Text(ts.into())),
            ("confidence".to_string(), RawValue::Number(confidence.into())),
            ("prediction".to_string(), RawValue::Text(prediction.into())),
        ])
    }

    fn source() -> InMemoryTable {
        InMemoryTable::new(
            "uncertainty",
            vec![
                item("2024-01-01T01:00:00", "0.8", "positive"),
                item("2024-01-01T02:00:00", "0.4", "negative"),
                item("2024-06-01T00:00:00", "0.9", "positive"),
            ],
            2,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn selection(prediction: PredictionChoice, start: NaiveDate, end: NaiveDate) -> Selection {
        Selection {
            threshold: 0.6,
            start,
            end,
            prediction,
            time_frame: BucketSize::Daily,
        }
    }

    fn chart(outcome: &PipelineOutcome) -> &ChartArtifact {
        match &outcome.aggregation {
            Some(Aggregation::Chart(c)) => c,
            other => panic!("expected a chart, got {other:?}"),
        }
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn all_predictions_daily() {
        let sel = selection(PredictionChoice::All, date(2024, 1, 1), date(2024, 1, 2));
        let out = run(&source(), &sel, InvalidRecords::Abort).unwrap();
        assert_eq!(out.loaded_rows, 3);
        assert_eq!(out.filtered.len(), 2);
        let c = chart(&out);
        assert_eq!(c.points.len(), 1);
        assert_eq!(c.points[0].0, midnight(2024, 1, 1));
        assert!((c.points[0].1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn positive_only_daily() {
        let sel = selection(PredictionChoice::Positive, date(2024, 1, 1), date(2024, 1, 2));
        let out = run(&source(), &sel, InvalidRecords::Abort).unwrap();
        assert_eq!(out.filtered.len(), 1);
        assert_eq!(chart(&out).points, vec![(midnight(2024, 1, 1), 0.8)]);
    }

    #[test]
    fn range_without_records_is_no_data() {
        let sel = selection(PredictionChoice::All, date(2022, 1, 1), date(2022, 2, 1));
        let out = run(&source(), &sel, InvalidRecords::Abort).unwrap();
        assert!(out.filtered.is_empty());
        assert_eq!(out.aggregation, Some(Aggregation::NoData));
    }

    #[test]
    fn empty_table_skips_aggregation() {
        let empty = InMemoryTable::new("uncertainty", Vec::new(), 10);
        let sel = selection(PredictionChoice::All, date(2024, 1, 1), date(2024, 1, 2));
        let out = run(&empty, &sel, InvalidRecords::Abort).unwrap();
        assert_eq!(out, PipelineOutcome::default());
    }

    struct Unreachable;

    impl RecordSource for Unreachable {
        fn name(&self) -> &str {
            "uncertainty"
        }

        fn fetch_all(&self) -> Result<Vec<RawItem>, LoadError> {
            Err(LoadError::Scan {
                table: "uncertainty".into(),
                message: "AccessDeniedException".into(),
            })
        }
    }

    #[test]
    fn load_failure_becomes_notice_and_empty_table() {
        let sel = selection(PredictionChoice::All, date(2024, 1, 1), date(2024, 1, 2));
        let out = run(&Unreachable, &sel, InvalidRecords::Abort).unwrap();
        let notice = out.notice.unwrap();
        assert!(notice.starts_with("Failed to fetch data:"));
        assert!(notice.contains("AccessDeniedException"));
        assert!(out.filtered.is_empty());
        assert_eq!(out.aggregation, None);
    }

    #[test]
    fn parse_failure_follows_policy() {
        let mut items = vec![item("garbage", "0.5", "positive")];
        items.push(item("2024-01-01T03:00:00", "0.2", "negative"));
        let table = InMemoryTable::new("uncertainty", items, 1);
        let sel = selection(PredictionChoice::All, date(2024, 1, 1), date(2024, 1, 1));

        assert!(run(&table, &sel, InvalidRecords::Abort).is_err());

        let out = run(&table, &sel, InvalidRecords::Skip).unwrap();
        assert_eq!(out.loaded_rows, 2);
        assert_eq!(out.skipped_rows, 1);
        assert_eq!(out.filtered.len(), 1);
    }

    #[test]
    fn prediction_choices_lower_case_their_label() {
        assert_eq!(PredictionChoice::All.category(), CategoryFilter::All);
        assert_eq!(
            PredictionChoice::Negative.category(),
            CategoryFilter::Only("negative".into())
        );
    }

    #[test]
    fn default_selection_spans_366_days() {
        let sel = Selection::starting_at(date(2024, 3, 1));
        assert_eq!(sel.start, date(2023, 3, 1));
        assert_eq!(sel.end, date(2024, 3, 1));
        assert_eq!(sel.threshold, 0.5);
        assert_eq!(sel.time_frame, BucketSize::Hourly);
    }
}
