//! Static type checking for filter trees.
//!
//! Lets a planner reject a tree before the first row is read. A tree that
//! passes can still fail at runtime when a string operand does not parse in
//! its comparison frame.

use crate::access::DataType;
use crate::expression::{Expression, FilterError, FilterResult};

/// Type checker for expressions
pub struct TypeChecker<'a> {
    /// Schema defining the types of input columns
    schema: &'a [DataType],
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker with the given schema
    pub fn new(schema: &'a [DataType]) -> Self {
        Self { schema }
    }

    /// Type check an expression and return its output type
    pub fn check(&self, expr: &Expression) -> FilterResult<DataType> {
        match expr {
            Expression::Literal(lit) => Ok(lit.result.data_type()),

            Expression::Column(col) => {
                let actual = *self.schema.get(col.index).ok_or(
                    FilterError::ColumnIndexOutOfBounds {
                        index: col.index,
                        row_width: self.schema.len(),
                    },
                )?;
                if actual != col.data_type {
                    return Err(FilterError::ColumnTypeMismatch {
                        index: col.index,
                        declared: col.data_type,
                        actual,
                    });
                }
                Ok(actual)
            }

            Expression::Unary { operand, .. } => {
                self.check(operand)?;
                Ok(DataType::Boolean)
            }

            Expression::Comparison { left, right, .. } => {
                let left_type = self.check(left)?;
                let right_type = self.check(right)?;
                self.check_comparable(expr, left_type, right_type)?;
                Ok(DataType::Boolean)
            }

            Expression::InList { expr: probe, list, .. } => {
                if list.is_empty() {
                    return Err(FilterError::MalformedTree {
                        reason: format!("{} requires at least one list item", expr.kind()),
                    });
                }
                let probe_type = self.check(probe)?;
                for item in list {
                    let item_type = self.check(item)?;
                    self.check_comparable(expr, probe_type, item_type)?;
                }
                Ok(DataType::Boolean)
            }

            Expression::Logical { left, right, .. } => {
                self.check_boolean(expr, left)?;
                self.check_boolean(expr, right)?;
                Ok(DataType::Boolean)
            }

            Expression::Not(operand) => {
                self.check_boolean(expr, operand)?;
                Ok(DataType::Boolean)
            }
        }
    }

    /// Check if an expression is valid for use as a filter predicate
    pub fn check_filter_predicate(&self, expr: &Expression) -> FilterResult<()> {
        match self.check(expr)? {
            DataType::Boolean | DataType::Null => Ok(()),
            other => Err(FilterError::TypeCheckFailed {
                expression: expr.describe(),
                reason: format!("filter predicate must be boolean, got {}", other),
            }),
        }
    }

    fn check_comparable(
        &self,
        expr: &Expression,
        left: DataType,
        right: DataType,
    ) -> FilterResult<()> {
        let frame = DataType::comparison_frame(left, right);
        if left.can_read_as(frame) && right.can_read_as(frame) {
            Ok(())
        } else {
            Err(FilterError::TypeCheckFailed {
                expression: expr.describe(),
                reason: format!("cannot compare {} with {}", left, right),
            })
        }
    }

    fn check_boolean(&self, parent: &Expression, operand: &Expression) -> FilterResult<()> {
        match self.check(operand)? {
            DataType::Boolean | DataType::Null => Ok(()),
            other => Err(FilterError::TypeCheckFailed {
                expression: parent.describe(),
                reason: format!("{} expects boolean operands, got {}", parent.kind(), other),
            }),
        }
    }
}

/// Helper function to type check an expression
pub fn type_check_expression(expr: &Expression, schema: &[DataType]) -> FilterResult<DataType> {
    TypeChecker::new(schema).check(expr)
}

/// Helper function to validate a filter predicate
pub fn validate_filter_predicate(expr: &Expression, schema: &[DataType]) -> FilterResult<()> {
    TypeChecker::new(schema).check_filter_predicate(expr)
}
