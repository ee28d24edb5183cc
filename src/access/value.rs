use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data types a filter expression can produce or read from a row
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null = 0,
    Boolean = 1,
    String = 2,
    Timestamp = 3,
    Integer = 4,
    Long = 5,
    Double = 6,
    Decimal = 7,
}

impl DataType {
    /// Every data type, in precedence order
    pub const ALL: [DataType; 8] = [
        DataType::Null,
        DataType::Boolean,
        DataType::String,
        DataType::Timestamp,
        DataType::Integer,
        DataType::Long,
        DataType::Double,
        DataType::Decimal,
    ];

    /// Coercion rank. When two operands disagree on type, both are read
    /// through the higher-ranked one.
    pub const fn precedence(self) -> u8 {
        match self {
            DataType::Null => 0,
            DataType::Boolean => 1,
            DataType::String => 2,
            DataType::Timestamp => 3,
            DataType::Integer => 4,
            DataType::Long => 5,
            DataType::Double => 6,
            DataType::Decimal => 7,
        }
    }

    /// Pick the type both operands of a binary operator are read through.
    ///
    /// The right type is chosen only when it ranks strictly higher, so ties
    /// resolve to the left operand.
    pub const fn comparison_frame(left: DataType, right: DataType) -> DataType {
        if right.precedence() > left.precedence() {
            right
        } else {
            left
        }
    }

    /// Whether a value of this type can be read through `frame` without
    /// narrowing. String sources additionally need to parse at runtime.
    pub const fn can_read_as(self, frame: DataType) -> bool {
        use DataType::*;
        match (self, frame) {
            (Null, _) => true,
            (source, frame) if source as u8 == frame as u8 => true,
            (Boolean, String) => true,
            (String, Timestamp | Integer | Long | Double | Decimal) => true,
            (Integer, Long | Double | Decimal) => true,
            (Long, Double | Decimal) => true,
            (Double, Decimal) => true,
            (Timestamp, Long | Double | Decimal) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Timestamp => "timestamp",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Decimal => "decimal",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(DataType::Null),
            "bool" | "boolean" => Ok(DataType::Boolean),
            "string" | "varchar" | "text" => Ok(DataType::String),
            "timestamp" => Ok(DataType::Timestamp),
            "int" | "integer" => Ok(DataType::Integer),
            "long" | "bigint" => Ok(DataType::Long),
            "double" => Ok(DataType::Double),
            "decimal" => Ok(DataType::Decimal),
            other => Err(format!("Unknown data type: {}", other)),
        }
    }
}

/// Raw column values handed out by a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    Decimal(#[serde(with = "decimal_text")] BigDecimal),
    String(String),
    Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>),
}

impl Value {
    /// Get the data type of this value. `Null` maps to `DataType::Null`.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Long(_) => DataType::Long,
            Value::Double(_) => DataType::Double,
            Value::Decimal(_) => DataType::Decimal,
            Value::String(_) => DataType::String,
            Value::Timestamp(_) => DataType::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value may be stored in a slot declared as `data_type`
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        match self {
            Value::Null => true, // NULL is compatible with any type
            other => other.data_type() == data_type,
        }
    }

    /// Parse a text field into a value of the given type.
    ///
    /// An empty field or the token `NULL` yields `Value::Null`.
    pub fn parse_as(text: &str, data_type: DataType) -> Result<Value, String> {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }
        let bad = |e: &dyn fmt::Display| format!("Cannot parse '{}' as {}: {}", text, data_type, e);
        match data_type {
            DataType::Null => Err(format!("Cannot parse '{}' as null", text)),
            DataType::Boolean => text.parse().map(Value::Boolean).map_err(|e| bad(&e)),
            DataType::Integer => text.parse().map(Value::Integer).map_err(|e| bad(&e)),
            DataType::Long => text.parse().map(Value::Long).map_err(|e| bad(&e)),
            DataType::Double => text.parse().map(Value::Double).map_err(|e| bad(&e)),
            DataType::Decimal => BigDecimal::from_str(text)
                .map(Value::Decimal)
                .map_err(|e| bad(&e)),
            DataType::String => Ok(Value::String(text.to_string())),
            DataType::Timestamp => parse_timestamp(text)
                .map(Value::Timestamp)
                .ok_or_else(|| bad(&"unrecognized timestamp format")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    use chrono::{NaiveDate, NaiveDateTime};

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

mod decimal_text {
    use bigdecimal::BigDecimal;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigDecimal::from_str(&text).map_err(D::Error::custom)
    }
}
