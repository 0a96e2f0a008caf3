//! Telemetry content model.
//!
//! Every file read produces a [`Content`]: a scalar (optionally carrying a
//! unit), an array of scalars, or a dictionary. The same vocabulary is the
//! input of the aggregation engine. `Display` renders the canonical
//! human-readable form consumed by filesystem adapters and tests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value returned by file read operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    /// Value is not available.
    Absent,
    Bool(bool),
    U64(u64),
    I64(i64),
    F64(f64),
    String(String),
}

/// Scalar with an attached unit (useful for numeric values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarWithUnit {
    pub value: Scalar,
    pub unit: String,
}

/// Array of scalars returned by file read operations.
pub type Array = Vec<Scalar>;

/// Dictionary returned by file read operations. Keys are unique and iterate
/// in sorted order.
pub type Dict = BTreeMap<String, DictValue>;

/// Value stored under a dictionary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictValue {
    Absent,
    Scalar(Scalar),
    ScalarWithUnit(ScalarWithUnit),
    Array(Array),
}

/// Output of a file read operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Scalar(Scalar),
    ScalarWithUnit(ScalarWithUnit),
    Array(Array),
    Dict(Dict),
}

impl ScalarWithUnit {
    pub fn new(value: impl Into<Scalar>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::U64(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<Scalar> for Content {
    fn from(v: Scalar) -> Self {
        Content::Scalar(v)
    }
}

impl From<ScalarWithUnit> for Content {
    fn from(v: ScalarWithUnit) -> Self {
        Content::ScalarWithUnit(v)
    }
}

impl From<Array> for Content {
    fn from(v: Array) -> Self {
        Content::Array(v)
    }
}

impl From<Dict> for Content {
    fn from(v: Dict) -> Self {
        Content::Dict(v)
    }
}

impl From<Scalar> for DictValue {
    fn from(v: Scalar) -> Self {
        DictValue::Scalar(v)
    }
}

impl From<ScalarWithUnit> for DictValue {
    fn from(v: ScalarWithUnit) -> Self {
        DictValue::ScalarWithUnit(v)
    }
}

impl From<Array> for DictValue {
    fn from(v: Array) -> Self {
        DictValue::Array(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Absent => f.write_str("<N/A>"),
            Scalar::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v:.2}"),
            Scalar::String(v) => f.write_str(v),
        }
    }
}

impl fmt::Display for ScalarWithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.unit)
    }
}

fn fmt_array(array: &Array, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, elem) in array.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{elem}")?;
    }
    f.write_str("]")
}

impl fmt::Display for DictValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictValue::Absent => f.write_str("<N/A>"),
            DictValue::Scalar(v) => write!(f, "{v}"),
            DictValue::ScalarWithUnit(v) => write!(f, "{v}"),
            DictValue::Array(v) => fmt_array(v, f),
        }
    }
}

// One `key: value` line per entry, values column-aligned to the longest key.
fn fmt_dict(dict: &Dict, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let max_key_len = dict.keys().map(String::len).max().unwrap_or(0);

    for (i, (key, value)) in dict.iter().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        let pad = max_key_len - key.len() + 1;
        write!(f, "{key}:{:pad$}{value}", "")?;
    }

    Ok(())
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Scalar(v) => write!(f, "{v}"),
            Content::ScalarWithUnit(v) => write!(f, "{v}"),
            Content::Array(v) => fmt_array(v, f),
            Content::Dict(v) => fmt_dict(v, f),
        }
    }
}
