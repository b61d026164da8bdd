use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Calendar-date range. Both ends are inclusive: every moment of the `end`
/// day is kept, the first moment of the following day is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Whether `ts` lies in `[start 00:00, end + 1 day 00:00)`.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let from = self.start.and_time(NaiveTime::MIN);
        // `end` at the last representable date has no next day; nothing is later.
        match self.end.checked_add_days(Days::new(1)) {
            Some(next) => from <= *ts && *ts < next.and_time(NaiveTime::MIN),
            None => from <= *ts,
        }
    }
}

/// Category predicate on the `prediction` label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category constraint.
    #[default]
    All,
    /// Exact, case-sensitive match on the label.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a selector value: `"all"` is the sentinel, anything else a label.
    pub fn from_choice(choice: &str) -> Self {
        if choice == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(choice.to_string())
        }
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(label) => record.prediction.as_deref() == Some(label.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter stage
// ---------------------------------------------------------------------------

/// Return a new table with the records that fall in `range` and match
/// `category`, in their original order. The input is left untouched.
pub fn filter(table: &Table, range: &DateRange, category: &CategoryFilter) -> Table {
    let records = table
        .records
        .iter()
        .filter(|r| range.contains(&r.timestamp) && category.matches(r))
        .cloned()
        .collect();
    Table::new(records)
}
