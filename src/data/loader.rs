use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawItem, RawValue};
use super::source::InMemoryTable;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table export from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one row per item, scalar columns
/// * `.json`    – `[{ "timestamp": "...", "confidence": "0.8", ... }, ...]`
/// * `.csv`     – header row with attribute names, one item per row
pub fn load_file(path: &Path) -> Result<Vec<RawItem>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load an export and serve it as a paginated table named after the file.
pub fn open_export(path: &Path, page_size: usize) -> Result<InMemoryTable> {
    let items = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let table = InMemoryTable::new(name, items, page_size);
    log::info!("Loaded {} items from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by a table dump):
///
/// ```json
/// [
///   { "timestamp": "2024-01-01T01:00:00", "confidence": "0.8", "prediction": "positive" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawItem>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<RawItem>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawItem> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_raw(val)))
                .collect())
        })
        .collect()
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::Text(s.clone()),
        JsonValue::Number(n) => RawValue::Number(n.to_string()),
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Null => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with attribute names, every cell kept as text.
/// Empty cells become nulls.
fn load_csv(path: &Path) -> Result<Vec<RawItem>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawItem>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut items = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let item: RawItem = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| {
                let value = if value.is_empty() {
                    RawValue::Null
                } else {
                    RawValue::Text(value.to_string())
                };
                (name.clone(), value)
            })
            .collect();

        items.push(item);
    }

    Ok(items)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export. Every column becomes an attribute; strings stay
/// text, numbers (decimals included) become numeric text and timestamp
/// columns are rendered as ISO-8601 so they coerce like any other timestamp.
/// Remaining types (dates, views, ...) use Arrow's display format.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawItem>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut items = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let item: RawItem = schema
                .fields()
                .iter()
                .enumerate()
                .map(|(col_idx, field)| {
                    extract_raw_value(batch.column(col_idx), row)
                        .map(|value| (field.name().clone(), value))
                })
                .collect::<Result<_>>()
                .with_context(|| format!("Row {row}"))?;
            items.push(item);
        }
    }

    Ok(items)
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single attribute value from an Arrow column at a given row.
fn extract_raw_value(col: &Arc<dyn Array>, row: usize) -> Result<RawValue> {
    if col.is_null(row) {
        return Ok(RawValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => RawValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => RawValue::Number(downcast::<Int32Array>(col)?.value(row).to_string()),
        DataType::Int64 => RawValue::Number(downcast::<Int64Array>(col)?.value(row).to_string()),
        DataType::Float32 => {
            RawValue::Number(downcast::<Float32Array>(col)?.value(row).to_string())
        }
        DataType::Float64 => {
            RawValue::Number(downcast::<Float64Array>(col)?.value(row).to_string())
        }
        DataType::Boolean => RawValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Timestamp(unit, _) => {
            let ts = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(col)?.value_as_datetime(row),
                TimeUnit::Millisecond => {
                    downcast::<TimestampMillisecondArray>(col)?.value_as_datetime(row)
                }
                TimeUnit::Microsecond => {
                    downcast::<TimestampMicrosecondArray>(col)?.value_as_datetime(row)
                }
                TimeUnit::Nanosecond => {
                    downcast::<TimestampNanosecondArray>(col)?.value_as_datetime(row)
                }
            };
            match ts {
                Some(dt) => RawValue::Text(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
                None => RawValue::Null,
            }
        }
        // DynamoDB numbers dumped through pandas arrive as decimals.
        DataType::Decimal128(..) | DataType::Decimal256(..) => {
            RawValue::Number(format_cell(col, row)?)
        }
        _ => RawValue::Text(format_cell(col, row)?),
    };
    Ok(value)
}

/// Render any other cell with Arrow's own display formatting.
fn format_cell(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())
        .with_context(|| format!("no display format for {:?}", col.data_type()))?;
    Ok(formatter.value(row).to_string())
}
