//! Decoding of chunked columnar responses
//!
//! Payload shape:
//!
//! ```json
//! {"header": {"column_names": ["a", "b"], "column_types": ["Int64", "String"]},
//!  "data": [[[1, 2], ["x", "y"]], [[3], ["z"]]],
//!  "time": 3.5}
//! ```
//!
//! `data` is a list of chunks; each chunk holds one value list per column.
//! Columns are built by concatenating the chunks in order.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value as Json;

use super::{Column, ColumnData, ColumnType, ResultTable};
use crate::error::{Result, TuringError};

/// Decode a query response payload into a typed table
pub fn decode(payload: &Json) -> Result<ResultTable> {
    let header = payload
        .get("header")
        .ok_or_else(|| malformed("missing 'header'"))?;

    let names = string_list(header.get("column_names"), "header.column_names")?;
    let types = string_list(header.get("column_types"), "header.column_types")?;

    if names.len() != types.len() {
        return Err(malformed(format!(
            "{} column names but {} column types",
            names.len(),
            types.len()
        )));
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(*name) {
            return Err(malformed(format!("duplicate column name '{}'", name)));
        }
    }

    let mut columns: Vec<Column> = names
        .iter()
        .zip(&types)
        .map(|(name, tag)| Column::new(*name, ColumnType::from_tag(tag)))
        .collect();

    let chunks = payload
        .get("data")
        .and_then(Json::as_array)
        .ok_or_else(|| malformed("'data' must be a list of chunks"))?;

    for (chunk_index, chunk) in chunks.iter().enumerate() {
        let chunk = chunk
            .as_array()
            .ok_or_else(|| malformed(format!("chunk {} is not a list", chunk_index)))?;

        if chunk.len() > columns.len() {
            return Err(malformed(format!(
                "chunk {} has {} columns, header declares {}",
                chunk_index,
                chunk.len(),
                columns.len()
            )));
        }

        for (column, values) in columns.iter_mut().zip(chunk) {
            let values = values.as_array().ok_or_else(|| {
                malformed(format!(
                    "chunk {} column '{}' is not a list",
                    chunk_index,
                    column.name()
                ))
            })?;
            append_values(column, values)?;
        }
    }

    if let Some(first) = columns.first() {
        let rows = first.len();
        if let Some(ragged) = columns.iter().find(|c| c.len() != rows) {
            return Err(malformed(format!(
                "column '{}' has {} rows, expected {}",
                ragged.name(),
                ragged.len(),
                rows
            )));
        }
    }

    Ok(ResultTable::from_columns(columns))
}

/// Server-reported execution time (`time`, in milliseconds), if present
pub fn execution_time(payload: &Json) -> Option<Duration> {
    payload
        .get("time")
        .and_then(Json::as_f64)
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| Duration::from_nanos((ms * 1_000_000.0).round() as u64))
}

fn append_values(column: &mut Column, values: &[Json]) -> Result<()> {
    let name = column.name().to_string();
    let tag = column.column_type().tag().to_string();
    let mismatch = |v: &Json| malformed(format!("column '{}' ({}) got value {}", name, tag, v));

    match column.data_mut() {
        ColumnData::String(out) => out.extend(values.iter().map(string_cell)),
        ColumnData::Int64(out) => {
            out.reserve(values.len());
            for v in values {
                out.push(v.as_i64().ok_or_else(|| mismatch(v))?);
            }
        }
        ColumnData::UInt64(out) => {
            out.reserve(values.len());
            for v in values {
                out.push(v.as_u64().ok_or_else(|| mismatch(v))?);
            }
        }
        ColumnData::Double(out) => {
            out.reserve(values.len());
            for v in values {
                out.push(v.as_f64().ok_or_else(|| mismatch(v))?);
            }
        }
        ColumnData::Boolean(out) => {
            out.reserve(values.len());
            for v in values {
                out.push(v.as_bool().ok_or_else(|| mismatch(v))?);
            }
        }
        ColumnData::Object(out) => out.extend(values.iter().cloned()),
    }

    Ok(())
}

/// `null` stays missing, other non-strings keep their JSON rendering
fn string_cell(value: &Json) -> Option<String> {
    match value {
        Json::Null => None,
        Json::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn string_list<'a>(value: Option<&'a Json>, field: &str) -> Result<Vec<&'a str>> {
    let items = value
        .and_then(Json::as_array)
        .ok_or_else(|| malformed(format!("'{}' must be a list", field)))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| malformed(format!("'{}' must only contain strings", field)))
        })
        .collect()
}

fn malformed(reason: impl Into<String>) -> TuringError {
    TuringError::MalformedResponse(reason.into())
}
