//! Reduction semantics of the aggregation methods.

use crate::content::{Array, Content, Dict, DictValue, Scalar, ScalarWithUnit};
use crate::error::{Result, StatreeError};

use super::{normalized, AggMethodType, AggOperation};

/// A configured aggregation method instance.
///
/// Stateless across calls; the only configuration is the `(field, result)`
/// pair fixed at construction.
pub struct AggMethod {
    kind: AggMethodType,
    field: Option<String>,
    result: Option<String>,
}

impl AggMethod {
    /// Configure a method instance from a declarative operation.
    pub fn new(operation: &AggOperation) -> Self {
        let field = normalized(&operation.field).map(str::to_string);
        let result = normalized(&operation.result)
            .map(str::to_string)
            .or_else(|| field.clone());
        Self {
            kind: operation.method,
            field,
            result,
        }
    }

    /// Reduce `contents` to a single content value.
    pub fn aggregate(&self, contents: &[Content]) -> Result<Content> {
        let values = contents
            .iter()
            .map(|content| self.extract(content))
            .collect::<Result<Vec<_>>>()?;

        let output = match self.kind {
            AggMethodType::Sum => fold_numeric(&values, NumericOp::Sum, false)?,
            AggMethodType::Avg => fold_numeric(&values, NumericOp::Sum, true)?,
            AggMethodType::Min => fold_numeric(&values, NumericOp::Min, false)?,
            AggMethodType::Max => fold_numeric(&values, NumericOp::Max, false)?,
            AggMethodType::Join => join(&values)?,
        };

        Ok(self.wrap(output))
    }

    // Extraction step shared by all methods: a configured field requires
    // dictionary content carrying that key; without a field the content must
    // not be a dictionary.
    fn extract(&self, content: &Content) -> Result<DictValue> {
        match (content, &self.field) {
            (Content::Dict(dict), Some(key)) => dict.get(key).cloned().ok_or_else(|| {
                StatreeError::MissingField(format!("'{key}' is not present in the source dictionary"))
            }),
            (Content::Dict(_), None) => Err(StatreeError::TypeMismatch(
                "dictionary content requires a configured source field".to_string(),
            )),
            (_, Some(key)) => Err(StatreeError::MissingField(format!(
                "'{key}' is configured but the content is not a dictionary"
            ))),
            (Content::Scalar(scalar), None) => Ok(DictValue::Scalar(scalar.clone())),
            (Content::ScalarWithUnit(scalar), None) => {
                Ok(DictValue::ScalarWithUnit(scalar.clone()))
            }
            (Content::Array(array), None) => Ok(DictValue::Array(array.clone())),
        }
    }

    fn wrap(&self, output: DictValue) -> Content {
        match &self.result {
            Some(key) => {
                let mut dict = Dict::new();
                dict.insert(key.clone(), output);
                Content::Dict(dict)
            }
            None => match output {
                DictValue::Absent => Content::Scalar(Scalar::Absent),
                DictValue::Scalar(scalar) => Content::Scalar(scalar),
                DictValue::ScalarWithUnit(scalar) => Content::ScalarWithUnit(scalar),
                DictValue::Array(array) => Content::Array(array),
            },
        }
    }
}

#[derive(Clone, Copy)]
enum NumericOp {
    Sum,
    Min,
    Max,
}

// Running accumulator over one numeric alternative. Mixing alternatives
// across an input set is a type mismatch, never a coercion.
#[derive(Clone, Copy)]
enum Numeric {
    U64(u64),
    I64(i64),
    F64(f64),
}

impl Numeric {
    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        match scalar {
            Scalar::U64(v) => Ok(Numeric::U64(*v)),
            Scalar::I64(v) => Ok(Numeric::I64(*v)),
            Scalar::F64(v) => Ok(Numeric::F64(*v)),
            _ => Err(StatreeError::TypeMismatch(format!(
                "invalid scalar alternative '{scalar}' for numeric aggregation"
            ))),
        }
    }

    fn apply(self, other: Numeric, op: NumericOp) -> Result<Self> {
        match (self, other) {
            (Numeric::U64(a), Numeric::U64(b)) => Ok(Numeric::U64(match op {
                NumericOp::Sum => a.wrapping_add(b),
                NumericOp::Min => a.min(b),
                NumericOp::Max => a.max(b),
            })),
            (Numeric::I64(a), Numeric::I64(b)) => Ok(Numeric::I64(match op {
                NumericOp::Sum => a.wrapping_add(b),
                NumericOp::Min => a.min(b),
                NumericOp::Max => a.max(b),
            })),
            (Numeric::F64(a), Numeric::F64(b)) => Ok(Numeric::F64(match op {
                NumericOp::Sum => a + b,
                NumericOp::Min => a.min(b),
                NumericOp::Max => a.max(b),
            })),
            _ => Err(StatreeError::TypeMismatch(
                "numeric aggregation inputs do not share one scalar alternative".to_string(),
            )),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::U64(v) => v as f64,
            Numeric::I64(v) => v as f64,
            Numeric::F64(v) => v,
        }
    }

    fn into_scalar(self) -> Scalar {
        match self {
            Numeric::U64(v) => Scalar::U64(v),
            Numeric::I64(v) => Scalar::I64(v),
            Numeric::F64(v) => Scalar::F64(v),
        }
    }
}

// Split a numeric input set into its scalars and the shared unit, enforcing
// that every value holds the same top alternative (all plain scalars, or all
// unit-qualified with one unit).
fn split_numeric(values: &[DictValue]) -> Result<(Vec<&Scalar>, Option<&str>)> {
    let mut scalars = Vec::with_capacity(values.len());

    match &values[0] {
        DictValue::Scalar(_) => {
            for value in values {
                match value {
                    DictValue::Scalar(scalar) => scalars.push(scalar),
                    _ => {
                        return Err(StatreeError::TypeMismatch(
                            "aggregation inputs do not share one content alternative".to_string(),
                        ))
                    }
                }
            }
            Ok((scalars, None))
        }
        DictValue::ScalarWithUnit(first) => {
            for value in values {
                match value {
                    DictValue::ScalarWithUnit(scalar) => {
                        if scalar.unit != first.unit {
                            return Err(StatreeError::TypeMismatch(format!(
                                "aggregation inputs mix units '{}' and '{}'",
                                first.unit, scalar.unit
                            )));
                        }
                        scalars.push(&scalar.value);
                    }
                    _ => {
                        return Err(StatreeError::TypeMismatch(
                            "aggregation inputs do not share one content alternative".to_string(),
                        ))
                    }
                }
            }
            Ok((scalars, Some(first.unit.as_str())))
        }
        _ => Err(StatreeError::TypeMismatch(
            "numeric aggregation expects scalar content".to_string(),
        )),
    }
}

// Sum/Min/Max share one fold; Avg is the Sum fold divided by the input
// count, always as a double. An empty input set produces an absent scalar.
fn fold_numeric(values: &[DictValue], op: NumericOp, average: bool) -> Result<DictValue> {
    if values.is_empty() {
        return Ok(DictValue::Scalar(Scalar::Absent));
    }

    let (scalars, unit) = split_numeric(values)?;

    let mut accumulator = Numeric::from_scalar(scalars[0])?;
    for scalar in &scalars[1..] {
        accumulator = accumulator.apply(Numeric::from_scalar(scalar)?, op)?;
    }

    let scalar = if average {
        Scalar::F64(accumulator.as_f64() / scalars.len() as f64)
    } else {
        accumulator.into_scalar()
    };

    Ok(match unit {
        Some(unit) => DictValue::ScalarWithUnit(ScalarWithUnit {
            value: scalar,
            unit: unit.to_string(),
        }),
        None => DictValue::Scalar(scalar),
    })
}

// Concatenate scalars or array elements, in input order, into one array.
// Inputs must be uniformly scalars or uniformly arrays, and every element
// must hold the same scalar alternative (any alternative is allowed,
// including bool, string, and absent).
fn join(values: &[DictValue]) -> Result<DictValue> {
    let mut output = Array::new();

    match values.first() {
        None => return Ok(DictValue::Array(output)),
        Some(DictValue::Scalar(_)) => {
            for value in values {
                match value {
                    DictValue::Scalar(scalar) => output.push(scalar.clone()),
                    _ => {
                        return Err(StatreeError::TypeMismatch(
                            "join inputs do not share one content alternative".to_string(),
                        ))
                    }
                }
            }
        }
        Some(DictValue::Array(_)) => {
            for value in values {
                match value {
                    DictValue::Array(array) => output.extend(array.iter().cloned()),
                    _ => {
                        return Err(StatreeError::TypeMismatch(
                            "join inputs do not share one content alternative".to_string(),
                        ))
                    }
                }
            }
        }
        Some(_) => {
            return Err(StatreeError::TypeMismatch(
                "join aggregation expects scalar or array content".to_string(),
            ))
        }
    }

    if let Some(first) = output.first() {
        let reference = std::mem::discriminant(first);
        if output
            .iter()
            .any(|scalar| std::mem::discriminant(scalar) != reference)
        {
            return Err(StatreeError::TypeMismatch(
                "join elements do not share one scalar alternative".to_string(),
            ));
        }
    }

    Ok(DictValue::Array(output))
}
