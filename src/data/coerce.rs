use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{RawItem, RawValue, Record, Table, CONFIDENCE, PREDICTION, TIMESTAMP};

// ---------------------------------------------------------------------------
// Errors and policy
// ---------------------------------------------------------------------------

/// An item whose required attributes cannot be turned into a [`Record`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("row {row}: missing '{field}' attribute")]
    Missing { row: usize, field: &'static str },

    #[error("row {row}: '{value}' is not a valid timestamp")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: '{value}' is not a valid confidence")]
    Confidence { row: usize, value: String },
}

/// What to do with an item that fails coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InvalidRecords {
    /// Fail the whole load on the first bad item.
    #[default]
    Abort,
    /// Drop bad items and carry on.
    Skip,
}

/// Result of coercing a batch of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coerced {
    pub table: Table,
    /// Items dropped under [`InvalidRecords::Skip`].
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Turn raw table items into typed records, applying `policy` to bad items.
pub fn coerce(items: Vec<RawItem>, policy: InvalidRecords) -> Result<Coerced, ParseError> {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (row, item) in items.into_iter().enumerate() {
        match coerce_item(row, item) {
            Ok(record) => records.push(record),
            Err(e) if policy == InvalidRecords::Skip => {
                log::warn!("Skipping invalid record: {e}");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Coerced {
        table: Table::new(records),
        skipped,
    })
}

fn coerce_item(row: usize, mut item: RawItem) -> Result<Record, ParseError> {
    let raw_ts = take_required(&mut item, row, TIMESTAMP)?;
    let timestamp = raw_ts
        .as_text()
        .and_then(parse_timestamp)
        .ok_or_else(|| ParseError::Timestamp {
            row,
            value: raw_ts.to_string(),
        })?;

    let raw_conf = take_required(&mut item, row, CONFIDENCE)?;
    let confidence = raw_conf
        .as_text()
        .and_then(parse_confidence)
        .ok_or_else(|| ParseError::Confidence {
            row,
            value: raw_conf.to_string(),
        })?;

    let prediction = match item.remove(PREDICTION) {
        Some(RawValue::Null) | None => None,
        Some(v) => Some(v.to_string()),
    };

    Ok(Record {
        timestamp,
        confidence,
        prediction,
        extra: item,
    })
}

fn take_required(item: &mut RawItem, row: usize, field: &'static str) -> Result<RawValue, ParseError> {
    match item.remove(field) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(ParseError::Missing { row, field }),
    }
}

/// Parse the timestamp forms found in the table.
///
/// Accepted:
/// * RFC 3339 with an offset (`2024-01-01T01:00:00+02:00`) – converted to UTC
/// * `2024-01-01T01:00:00[.fff]` or with a space instead of `T`
/// * `2024-01-01T01:00` / `2024-01-01 01:00`
/// * `2024-01-01` – midnight
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Finite real numbers only; `NaN` and infinities are rejected.
pub fn parse_confidence(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(fields: &[(&str, RawValue)]) -> RawItem {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    fn num(s: &str) -> RawValue {
        RawValue::Number(s.to_string())
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-01T01:00:00"), Some(dt(2024, 1, 1, 1, 0, 0)));
        assert_eq!(parse_timestamp("2024-01-01 01:02:03"), Some(dt(2024, 1, 1, 1, 2, 3)));
        assert_eq!(parse_timestamp("2024-01-01 01:02"), Some(dt(2024, 1, 1, 1, 2, 0)));
        assert_eq!(parse_timestamp(" 2024-06-01 "), Some(dt(2024, 6, 1, 0, 0, 0)));
        assert_eq!(
            parse_timestamp("2024-01-01T03:00:00+02:00"),
            Some(dt(2024, 1, 1, 1, 0, 0))
        );
        assert_eq!(parse_timestamp("2024-01-01T01:00:00Z"), Some(dt(2024, 1, 1, 1, 0, 0)));

        let with_fraction = parse_timestamp("2024-01-01T01:00:00.250").unwrap();
        assert_eq!(with_fraction.and_utc().timestamp_subsec_millis(), 250);

        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn confidence_must_be_finite() {
        assert_eq!(parse_confidence(" 0.75 "), Some(0.75));
        assert_eq!(parse_confidence("1"), Some(1.0));
        assert_eq!(parse_confidence("NaN"), None);
        assert_eq!(parse_confidence("inf"), None);
        assert_eq!(parse_confidence("high"), None);
    }

    #[test]
    fn coerces_required_and_keeps_extra_attributes() {
        let items = vec![item(&[
            ("timestamp", text("2024-01-01T01:00:00")),
            ("confidence", num("0.8")),
            ("prediction", text("positive")),
            ("id", text("abc")),
        ])];
        let out = coerce(items, InvalidRecords::Abort).unwrap();
        assert_eq!(out.skipped, 0);
        let rec = &out.table.records[0];
        assert_eq!(rec.timestamp, dt(2024, 1, 1, 1, 0, 0));
        assert_eq!(rec.confidence, 0.8);
        assert_eq!(rec.prediction.as_deref(), Some("positive"));
        assert_eq!(rec.extra.len(), 1);
        assert_eq!(rec.extra["id"], text("abc"));
    }

    #[test]
    fn missing_or_null_prediction_is_unlabelled() {
        let items = vec![
            item(&[("timestamp", text("2024-01-01")), ("confidence", num("0.1"))]),
            item(&[
                ("timestamp", text("2024-01-01")),
                ("confidence", num("0.1")),
                ("prediction", RawValue::Null),
            ]),
        ];
        let out = coerce(items, InvalidRecords::Abort).unwrap();
        assert!(out.table.records.iter().all(|r| r.prediction.is_none()));
    }

    #[test]
    fn abort_policy_fails_on_first_bad_item() {
        let items = vec![
            item(&[("timestamp", text("2024-01-01")), ("confidence", num("0.5"))]),
            item(&[("timestamp", text("not a date")), ("confidence", num("0.5"))]),
            item(&[("timestamp", text("2024-01-01")), ("confidence", text("oops"))]),
        ];
        let err = coerce(items, InvalidRecords::Abort).unwrap_err();
        assert_eq!(
            err,
            ParseError::Timestamp {
                row: 1,
                value: "not a date".into()
            }
        );
    }

    #[test]
    fn skip_policy_drops_and_counts_bad_items() {
        let items = vec![
            item(&[("timestamp", text("2024-01-01")), ("confidence", num("0.5"))]),
            item(&[("timestamp", text("not a date")), ("confidence", num("0.5"))]),
            item(&[("timestamp", text("2024-01-02")), ("confidence", text("oops"))]),
            item(&[("confidence", num("0.5"))]),
        ];
        let out = coerce(items, InvalidRecords::Skip).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.skipped, 3);
    }

    #[test]
    fn missing_confidence_is_reported() {
        let items = vec![item(&[("timestamp", text("2024-01-01"))])];
        assert_eq!(
            coerce(items, InvalidRecords::Abort).unwrap_err(),
            ParseError::Missing {
                row: 0,
                field: "confidence"
            }
        );
    }

    #[test]
    fn boolean_confidence_is_rejected() {
        let items = vec![item(&[
            ("timestamp", text("2024-01-01")),
            ("confidence", RawValue::Bool(true)),
        ])];
        assert!(matches!(
            coerce(items, InvalidRecords::Abort),
            Err(ParseError::Confidence { row: 0, .. })
        ));
    }
}
