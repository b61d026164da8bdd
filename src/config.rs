use std::path::PathBuf;

use clap::Parser;

use crate::data::coerce::InvalidRecords;

/// Command line options. Everything else is chosen in the UI.
#[derive(Parser, Debug, Clone)]
#[command(name = "uncertainty-viewer", version, about)]
pub struct Config {
    /// DynamoDB table to scan
    #[arg(long, env = "UNCERTAINTY_TABLE", default_value = "uncertainty")]
    pub table: String,

    /// AWS region (defaults to the SDK's own resolution)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Read a .json/.csv/.parquet export instead of DynamoDB
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Items per scan page when reading an export
    #[arg(long, default_value_t = 100)]
    pub page_size: usize,

    /// What to do with items whose timestamp or confidence cannot be parsed
    #[arg(long, value_enum, default_value_t = InvalidRecords::Abort)]
    pub on_invalid: InvalidRecords,
}
