//! Reading input records from disk.
//!
//! Accepts either a JSON array of items or JSON lines (one item per line).
//! Non-object items are wrapped under the configured input field.

use std::path::Path;

use anyhow::Context;
use intentflow_core::Record;
use serde_json::Value;

pub fn read_records(path: &Path, input_field: &str) -> anyhow::Result<Vec<Record>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_records(&data, input_field).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_records(data: &str, input_field: &str) -> anyhow::Result<Vec<Record>> {
    let trimmed = data.trim_start();
    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).context("input is not a valid JSON array")?
    } else {
        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str::<Value>(line).with_context(|| format!("line {}", n + 1))
            })
            .collect::<anyhow::Result<_>>()?
    };

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, v)| Record::from_value(i, v, input_field))
        .collect())
}
