use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

/// Attribute carrying the observation time.
pub const TIMESTAMP: &str = "timestamp";
/// Attribute carrying the model confidence.
pub const CONFIDENCE: &str = "confidence";
/// Attribute carrying the predicted label.
pub const PREDICTION: &str = "prediction";

// ---------------------------------------------------------------------------
// RawValue – a single untyped cell as delivered by the table
// ---------------------------------------------------------------------------

/// An untyped attribute value. Key-value stores hand numbers back as text,
/// so `Number` keeps the textual form until coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(String),
    Bool(bool),
    Null,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) | RawValue::Number(s) => write!(f, "{s}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => write!(f, "<null>"),
        }
    }
}

impl RawValue {
    /// Textual content of the cell, if it has any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) | RawValue::Number(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// One flat item of the remote table: attribute name → value.
pub type RawItem = BTreeMap<String, RawValue>;

// ---------------------------------------------------------------------------
// Record – one typed observation
// ---------------------------------------------------------------------------

/// A single observation after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub confidence: f64,
    /// Missing when the item carries no `prediction` attribute.
    pub prediction: Option<String>,
    /// Remaining attributes, kept verbatim for display.
    pub extra: BTreeMap<String, RawValue>,
}

// ---------------------------------------------------------------------------
// Table – ordered collection of records
// ---------------------------------------------------------------------------

/// The typed table handed between pipeline stages. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted union of the extra attribute names across all records.
    pub fn extra_columns(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .flat_map(|r| r.extra.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Distinct prediction labels, sorted.
    pub fn prediction_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.prediction.clone())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
