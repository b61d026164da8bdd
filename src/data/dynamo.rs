use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tokio::runtime::Runtime;

use super::model::{RawItem, RawValue};
use super::source::{LoadError, ScanPage, ScanTable};

// ---------------------------------------------------------------------------
// DynamoDB-backed table
// ---------------------------------------------------------------------------

/// A DynamoDB table scanned through the AWS SDK.
///
/// The SDK is async; a private current-thread runtime blocks on each call so
/// the rest of the viewer stays synchronous.
pub struct DynamoTable {
    runtime: Runtime,
    client: Client,
    table_name: String,
}

impl DynamoTable {
    /// Resolve credentials and region the usual AWS way (env, profile, IMDS).
    /// `region` overrides whatever the environment provides.
    pub fn connect(table_name: &str, region: Option<String>) -> Result<Self, LoadError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let config = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(Region::new(region));
            }
            loader.load().await
        });

        log::info!(
            "Using DynamoDB table '{table_name}' in region {}",
            config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "<unset>".into())
        );

        Ok(DynamoTable {
            runtime,
            client: Client::new(&config),
            table_name: table_name.to_string(),
        })
    }
}

impl ScanTable for DynamoTable {
    /// `LastEvaluatedKey` of the previous page.
    type Token = HashMap<String, AttributeValue>;

    fn name(&self) -> &str {
        &self.table_name
    }

    fn title(&self) -> String {
        dynamo_title(&self.table_name)
    }

    fn scan(&self, start: Option<&Self::Token>) -> Result<ScanPage<Self::Token>, LoadError> {
        let request = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start.cloned());

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| LoadError::Scan {
                table: self.table_name.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(ScanPage {
            items: output.items().iter().map(item_from_attributes).collect(),
            next: output.last_evaluated_key().cloned(),
        })
    }
}

/// `uncertainty` → "DynamoDB Data Viewer for Uncertainty Table".
fn dynamo_title(table_name: &str) -> String {
    let mut chars = table_name.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("DynamoDB Data Viewer for {capitalized} Table")
}

fn item_from_attributes(attrs: &HashMap<String, AttributeValue>) -> RawItem {
    attrs
        .iter()
        .map(|(k, v)| (k.clone(), attribute_to_raw(v)))
        .collect()
}

fn attribute_to_raw(value: &AttributeValue) -> RawValue {
    match value {
        AttributeValue::S(s) => RawValue::Text(s.clone()),
        AttributeValue::N(n) => RawValue::Number(n.clone()),
        AttributeValue::Bool(b) => RawValue::Bool(*b),
        AttributeValue::Null(_) => RawValue::Null,
        other => RawValue::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_map_to_raw_values() {
        let attrs = HashMap::from([
            ("timestamp".to_string(), AttributeValue::S("2024-01-01T01:00:00".into())),
            ("confidence".to_string(), AttributeValue::N("0.8".into())),
            ("flagged".to_string(), AttributeValue::Bool(false)),
            ("note".to_string(), AttributeValue::Null(true)),
        ]);
        let item = item_from_attributes(&attrs);
        assert_eq!(item["timestamp"], RawValue::Text("2024-01-01T01:00:00".into()));
        assert_eq!(item["confidence"], RawValue::Number("0.8".into()));
        assert_eq!(item["flagged"], RawValue::Bool(false));
        assert_eq!(item["note"], RawValue::Null);
    }

    #[test]
    fn title_names_the_table() {
        assert_eq!(
            dynamo_title("uncertainty"),
            "DynamoDB Data Viewer for Uncertainty Table"
        );
        assert_eq!(dynamo_title("scores"), "DynamoDB Data Viewer for Scores Table");
    }

    #[test]
    fn nested_attributes_fall_back_to_debug_text() {
        let raw = attribute_to_raw(&AttributeValue::Ss(vec!["a".into()]));
        assert!(matches!(raw, RawValue::Text(s) if s.contains('a')));
    }
}
