//! Typed results flowing through an expression tree.

use crate::access::{parse_timestamp, DataType, Value};
use crate::expression::{FilterError, FilterResult};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// A tagged value produced by evaluating one node.
///
/// The payload is either `Value::Null` or a value whose kind equals the tag.
/// A null result keeps the tag of the column or literal it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionResult {
    data_type: DataType,
    value: Value,
}

impl ExpressionResult {
    /// Result tagged with the value's own type
    pub fn new(value: Value) -> Self {
        Self {
            data_type: value.data_type(),
            value,
        }
    }

    /// Result with an explicit tag. The value must be null or of that type.
    pub fn typed(data_type: DataType, value: Value) -> FilterResult<Self> {
        if !value.is_compatible_with(data_type) {
            return Err(FilterError::TypeMismatch {
                expected: data_type,
                actual: value.data_type(),
            });
        }
        Ok(Self { data_type, value })
    }

    pub fn null(data_type: DataType) -> Self {
        Self {
            data_type,
            value: Value::Null,
        }
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(Value::Boolean(b))
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Overwrite the payload and retag to the new value's type in one step.
    pub fn set(&mut self, value: Value) {
        self.data_type = value.data_type();
        self.value = value;
    }

    // Strict accessors: the tag must match and the value must not be null.

    pub fn get_boolean(&self) -> FilterResult<bool> {
        match &self.value {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.access_error(DataType::Boolean, "get_boolean")),
        }
    }

    pub fn get_int(&self) -> FilterResult<i32> {
        match &self.value {
            Value::Integer(n) => Ok(*n),
            _ => Err(self.access_error(DataType::Integer, "get_int")),
        }
    }

    pub fn get_long(&self) -> FilterResult<i64> {
        match &self.value {
            Value::Long(n) => Ok(*n),
            _ => Err(self.access_error(DataType::Long, "get_long")),
        }
    }

    pub fn get_double(&self) -> FilterResult<f64> {
        match &self.value {
            Value::Double(d) => Ok(*d),
            _ => Err(self.access_error(DataType::Double, "get_double")),
        }
    }

    pub fn get_decimal(&self) -> FilterResult<&BigDecimal> {
        match &self.value {
            Value::Decimal(d) => Ok(d),
            _ => Err(self.access_error(DataType::Decimal, "get_decimal")),
        }
    }

    pub fn get_string(&self) -> FilterResult<&str> {
        match &self.value {
            Value::String(s) => Ok(s),
            _ => Err(self.access_error(DataType::String, "get_string")),
        }
    }

    pub fn get_time(&self) -> FilterResult<DateTime<Utc>> {
        match &self.value {
            Value::Timestamp(ts) => Ok(*ts),
            _ => Err(self.access_error(DataType::Timestamp, "get_time")),
        }
    }

    fn access_error(&self, expected: DataType, accessor: &str) -> FilterError {
        if self.is_null() {
            FilterError::UnexpectedNull {
                context: accessor.to_string(),
            }
        } else {
            FilterError::TypeMismatch {
                expected,
                actual: self.data_type,
            }
        }
    }

    // Frame reads: read this result through a type of equal or higher
    // precedence. Nothing is converted in place and nothing narrows.

    pub fn read_string(&self) -> FilterResult<Cow<'_, str>> {
        match &self.value {
            Value::String(s) => Ok(Cow::Borrowed(s)),
            Value::Boolean(b) => Ok(Cow::Owned(b.to_string())),
            _ => Err(self.frame_error(DataType::String)),
        }
    }

    pub fn read_timestamp(&self) -> FilterResult<DateTime<Utc>> {
        match &self.value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::String(s) => {
                parse_timestamp(s.trim()).ok_or_else(|| self.parse_error(DataType::Timestamp))
            }
            _ => Err(self.frame_error(DataType::Timestamp)),
        }
    }

    pub fn read_int(&self) -> FilterResult<i32> {
        match &self.value {
            Value::Integer(n) => Ok(*n),
            Value::String(s) => s.trim().parse().map_err(|_| self.parse_error(DataType::Integer)),
            _ => Err(self.frame_error(DataType::Integer)),
        }
    }

    pub fn read_long(&self) -> FilterResult<i64> {
        match &self.value {
            Value::Integer(n) => Ok(i64::from(*n)),
            Value::Long(n) => Ok(*n),
            Value::Timestamp(ts) => Ok(ts.timestamp_millis()),
            Value::String(s) => s.trim().parse().map_err(|_| self.parse_error(DataType::Long)),
            _ => Err(self.frame_error(DataType::Long)),
        }
    }

    pub fn read_double(&self) -> FilterResult<f64> {
        match &self.value {
            Value::Integer(n) => Ok(f64::from(*n)),
            Value::Long(n) => Ok(*n as f64),
            Value::Double(d) => Ok(*d),
            Value::Timestamp(ts) => Ok(ts.timestamp_millis() as f64),
            Value::String(s) => s.trim().parse().map_err(|_| self.parse_error(DataType::Double)),
            _ => Err(self.frame_error(DataType::Double)),
        }
    }

    pub fn read_decimal(&self) -> FilterResult<Cow<'_, BigDecimal>> {
        match &self.value {
            Value::Decimal(d) => Ok(Cow::Borrowed(d)),
            Value::Integer(n) => Ok(Cow::Owned(BigDecimal::from(*n))),
            Value::Long(n) => Ok(Cow::Owned(BigDecimal::from(*n))),
            // Shortest round-trip text, so 0.1 reads as 0.1 and not its
            // binary expansion
            Value::Double(d) if d.is_finite() => BigDecimal::from_str(&d.to_string())
                .map(Cow::Owned)
                .map_err(|_| self.parse_error(DataType::Decimal)),
            Value::Double(_) => Err(self.parse_error(DataType::Decimal)),
            Value::Timestamp(ts) => Ok(Cow::Owned(BigDecimal::from(ts.timestamp_millis()))),
            Value::String(s) => BigDecimal::from_str(s.trim())
                .map(Cow::Owned)
                .map_err(|_| self.parse_error(DataType::Decimal)),
            _ => Err(self.frame_error(DataType::Decimal)),
        }
    }

    fn frame_error(&self, frame: DataType) -> FilterError {
        FilterError::unsupported(
            "coercion",
            format!("cannot read {} as {}", self.data_type, frame),
        )
    }

    fn parse_error(&self, frame: DataType) -> FilterError {
        FilterError::unsupported(
            "coercion",
            format!("cannot convert {} to {}", self.value, frame),
        )
    }
}

impl From<Value> for ExpressionResult {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
