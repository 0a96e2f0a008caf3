//! Aggregation over telemetry content.
//!
//! An [`AggOperation`] declares how many contents reduce to one: a method
//! tag, an optional source field to extract from dictionary inputs, and an
//! optional result field to wrap the output under. Configured method
//! instances are stateless across calls; the reduction semantics live in
//! [`method`], the pattern-matching fan-in in [`file`].

mod file;
mod method;

pub(crate) use file::build_aggregated_ops;
pub use method::AggMethod;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatreeError};

/// Supported aggregation methods.
///
/// Numeric methods (`Avg`, `Sum`, `Min`, `Max`) accept scalar content of one
/// numeric alternative (u64, i64, f64), optionally unit-qualified; `Avg`
/// always produces a double. `Join` accepts scalars of any alternative, or
/// arrays, and concatenates them into one array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggMethodType {
    Avg,
    Sum,
    Min,
    Max,
    Join,
}

impl AggMethodType {
    /// Tag string used in external configuration and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AggMethodType::Avg => "avg",
            AggMethodType::Sum => "sum",
            AggMethodType::Min => "min",
            AggMethodType::Max => "max",
            AggMethodType::Join => "join",
        }
    }
}

impl fmt::Display for AggMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggMethodType {
    type Err = StatreeError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "avg" => Ok(AggMethodType::Avg),
            "sum" => Ok(AggMethodType::Sum),
            "min" => Ok(AggMethodType::Min),
            "max" => Ok(AggMethodType::Max),
            "join" => Ok(AggMethodType::Join),
            _ => Err(StatreeError::InvalidMethod(format!(
                "unrecognized aggregation method tag '{tag}'"
            ))),
        }
    }
}

/// One configured aggregation operation.
///
/// With no `field`, the operation applies directly to whatever content a
/// source file returns (which must not be a dictionary). With a `field`, the
/// value under that key is extracted from each source's dictionary. The
/// output is stored under `result` in the aggregated dictionary; an empty
/// `result` defaults to `field`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggOperation {
    pub method: AggMethodType,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

impl AggOperation {
    /// Operation over the source content itself.
    pub fn new(method: AggMethodType) -> Self {
        Self {
            method,
            field: None,
            result: None,
        }
    }

    /// Operation extracting `field` from each source dictionary and storing
    /// the output under `result`.
    pub fn with_field(
        method: AggMethodType,
        field: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            method,
            field: Some(field.into()),
            result: Some(result.into()),
        }
    }
}

// Empty strings coming from external configuration mean "unset".
pub(crate) fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate an operation set: either no operation names a source field (then
/// exactly one operation is allowed), or all of them do.
pub(crate) fn validate_operations(operations: &[AggOperation]) -> Result<()> {
    let with_field = operations
        .iter()
        .any(|op| normalized(&op.field).is_some());
    let without_field = operations
        .iter()
        .any(|op| normalized(&op.field).is_none());

    if with_field && without_field {
        return Err(StatreeError::InvalidConfiguration(
            "inconsistent operation set: some operations specify a source field \
             while others do not"
                .to_string(),
        ));
    }

    if without_field && operations.len() > 1 {
        return Err(StatreeError::InvalidConfiguration(
            "operations without a source field permit only a single operation"
                .to_string(),
        ));
    }

    Ok(())
}
