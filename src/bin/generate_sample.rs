use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDateTime, Timelike};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const RECORDS: usize = 2_000;
/// Spread the samples over this many days before now.
const SPAN_DAYS: i64 = 400;

/// One item as it sits in the table: every attribute is text.
#[derive(Debug, Serialize)]
struct SampleItem {
    id: String,
    timestamp: String,
    confidence: String,
    prediction: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate(now: NaiveDateTime, rng: &mut SimpleRng) -> Vec<(NaiveDateTime, f64, &'static str)> {
    let span_secs = (SPAN_DAYS * 86_400) as f64;
    let mut rows: Vec<_> = (0..RECORDS)
        .map(|_| {
            let ts = now - Duration::seconds((rng.next_f64() * span_secs) as i64);
            let positive = rng.next_f64() < 0.6;
            // Positives are predicted more confidently than negatives.
            let mean = if positive { 0.75 } else { 0.55 };
            let confidence = rng.gauss(mean, 0.12).clamp(0.0, 1.0);
            let label = if positive { "positive" } else { "negative" };
            (ts.with_nanosecond(0).unwrap_or(ts), confidence, label)
        })
        .collect();
    rows.sort_by_key(|r| r.0);
    rows
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let now = chrono::Local::now().naive_local();
    let rows = generate(now, &mut rng);

    let items: Vec<SampleItem> = rows
        .iter()
        .enumerate()
        .map(|(i, (ts, confidence, label))| SampleItem {
            id: format!("rec-{i:05}"),
            timestamp: ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
            confidence: format!("{confidence:.4}"),
            prediction: *label,
        })
        .collect();

    // JSON: a dump of the table items
    let json_path = "sample_uncertainty.json";
    let file = std::fs::File::create(json_path).context("creating JSON output")?;
    serde_json::to_writer_pretty(file, &items).context("writing JSON")?;

    // CSV
    let csv_path = "sample_uncertainty.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    for item in &items {
        writer.serialize(item).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    // Parquet: confidence stored as a real column
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("timestamp", DataType::Utf8, false),
        Field::new("confidence", DataType::Float64, false),
        Field::new("prediction", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(items.iter().map(|i| i.id.as_str()))),
            Arc::new(StringArray::from_iter_values(
                items.iter().map(|i| i.timestamp.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.1))),
            Arc::new(StringArray::from_iter_values(items.iter().map(|i| i.prediction))),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_uncertainty.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} items to {json_path}, {csv_path} and {parquet_path}", items.len());
    Ok(())
}
