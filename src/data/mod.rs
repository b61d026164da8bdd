/// Data layer: table access, coercion, filtering and resampling.
///
/// Architecture:
/// ```text
///  DynamoDB table / .json / .csv / .parquet export
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  paginated scan → Vec<RawItem>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  coerce   │  text → Record (timestamp, confidence, prediction)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + prediction label → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resample  │  calendar buckets → mean confidence series
///   └──────────┘
/// ```

pub mod coerce;
pub mod dynamo;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resample;
pub mod source;
