//! Typed, column-oriented query results
//!
//! Every column keeps the element type the server declared for it, so an
//! `Int64` column is backed by a `Vec<i64>` and never degrades to generic
//! JSON. String columns are nullable. Type tags the client does not know are
//! kept as raw JSON values.

mod decode;

pub use decode::{decode, execution_time};

use std::fmt;

/// Declared type of a result column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int64,
    UInt64,
    Double,
    Boolean,
    /// Unrecognised tag, values kept untyped
    Other(String),
}

impl ColumnType {
    /// Map a server type tag to a column type
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "String" => ColumnType::String,
            "Int64" => ColumnType::Int64,
            "UInt64" => ColumnType::UInt64,
            "Double" => ColumnType::Double,
            "Boolean" => ColumnType::Boolean,
            other => ColumnType::Other(other.to_string()),
        }
    }

    /// The server type tag
    pub fn tag(&self) -> &str {
        match self {
            ColumnType::String => "String",
            ColumnType::Int64 => "Int64",
            ColumnType::UInt64 => "UInt64",
            ColumnType::Double => "Double",
            ColumnType::Boolean => "Boolean",
            ColumnType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Homogeneous backing storage for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// `None` where the server sent `null`
    String(Vec<Option<String>>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
    Object(Vec<serde_json::Value>),
}

impl ColumnData {
    /// Empty container matching a column type
    pub fn for_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::String => ColumnData::String(Vec::new()),
            ColumnType::Int64 => ColumnData::Int64(Vec::new()),
            ColumnType::UInt64 => ColumnData::UInt64(Vec::new()),
            ColumnType::Double => ColumnData::Double(Vec::new()),
            ColumnType::Boolean => ColumnData::Boolean(Vec::new()),
            ColumnType::Other(_) => ColumnData::Object(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::String(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::UInt64(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row`
    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        match self {
            ColumnData::String(v) => v.get(row).map(|s| match s {
                Some(s) => Value::String(s),
                None => Value::Null,
            }),
            ColumnData::Int64(v) => v.get(row).map(|n| Value::Int64(*n)),
            ColumnData::UInt64(v) => v.get(row).map(|n| Value::UInt64(*n)),
            ColumnData::Double(v) => v.get(row).map(|n| Value::Double(*n)),
            ColumnData::Boolean(v) => v.get(row).map(|b| Value::Boolean(*b)),
            ColumnData::Object(v) => v.get(row).map(Value::Object),
        }
    }

    pub fn as_strings(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnData::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<&[u64]> {
        match self {
            ColumnData::UInt64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match self {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

/// Borrowed view of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    String(&'a str),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Boolean(bool),
    Object(&'a serde_json::Value),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Int64(n) => write!(f, "{}", n),
            Value::UInt64(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Object(v) => write!(f, "{}", v),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        let data = ColumnData::for_type(&column_type);
        Self {
            name: name.into(),
            column_type,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        self.data.get(row)
    }
}

/// Ordered columns sharing one row count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<Column>,
}

impl ResultTable {
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look a column up by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// All cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<Value<'_>>> {
        if index >= self.num_rows() {
            return None;
        }
        self.columns.iter().map(|c| c.get(index)).collect()
    }

    /// First cell of the first column, as returned by single-value commands
    pub fn first_value(&self) -> Option<Value<'_>> {
        self.columns.first().and_then(|c| c.get(0))
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
