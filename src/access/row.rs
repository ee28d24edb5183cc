use crate::access::value::{DataType, Value};
use crate::expression::{FilterError, FilterResult};

/// Per-row source that column references pull values from.
///
/// Implementations are owned by the row source, never by the expression
/// tree. The planner is trusted to have validated column indices and types.
pub trait RowAccessor {
    /// Value stored at `index`
    fn get(&self, index: usize) -> FilterResult<&Value>;

    /// Number of columns in this row
    fn width(&self) -> usize;
}

/// A fully materialized row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Split a delimited line into fields and parse each against `schema`.
    pub fn parse_delimited(line: &str, delimiter: char, schema: &[DataType]) -> FilterResult<Self> {
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != schema.len() {
            return Err(FilterError::MalformedRow {
                reason: format!(
                    "expected {} fields but found {}",
                    schema.len(),
                    fields.len()
                ),
            });
        }

        let values = fields
            .iter()
            .zip(schema)
            .map(|(field, data_type)| {
                Value::parse_as(field, *data_type).map_err(|reason| FilterError::MalformedRow { reason })
            })
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(Self { values })
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl RowAccessor for Row {
    fn get(&self, index: usize) -> FilterResult<&Value> {
        RowAccessor::get(self.values.as_slice(), index)
    }

    fn width(&self) -> usize {
        self.values.len()
    }
}

impl RowAccessor for [Value] {
    fn get(&self, index: usize) -> FilterResult<&Value> {
        <[Value]>::get(self, index).ok_or(FilterError::ColumnIndexOutOfBounds {
            index,
            row_width: self.len(),
        })
    }

    fn width(&self) -> usize {
        self.len()
    }
}
