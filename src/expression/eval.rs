//! Expression evaluation: a synchronous recursive walk over the tree.
//!
//! The walk never mutates the tree. Every `ExpressionResult` it touches is
//! created within the current call, so one tree can be evaluated by many
//! threads at once without locking.

use crate::access::{RowAccessor, Value};
use crate::expression::{
    ColumnReference, Expression, ExpressionResult, FilterError, FilterResult, UnaryOperator,
};

/// Evaluator bound to a single row
pub struct ExpressionEvaluator<'a, R: RowAccessor + ?Sized> {
    row: &'a R,
}

impl<'a, R: RowAccessor + ?Sized> ExpressionEvaluator<'a, R> {
    pub fn new(row: &'a R) -> Self {
        Self { row }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expression) -> FilterResult<ExpressionResult> {
        match expr {
            Expression::Literal(lit) => Ok(lit.result.clone()),

            Expression::Column(col) => self.evaluate_column(col),

            Expression::Unary { op, operand } => {
                let operand_result = self.evaluate(operand)?;
                Ok(self.evaluate_null_test(*op, operand_result))
            }

            Expression::Comparison { op, left, right } => {
                self.evaluate_comparison(*op, left, right)
            }

            Expression::InList {
                expr,
                list,
                negated,
            } => self.evaluate_in_list(expr, list, *negated),

            Expression::Logical { op, left, right } => self.evaluate_logical(*op, left, right),

            Expression::Not(operand) => self.evaluate_not(operand),
        }
    }

    /// Evaluate a column reference into a fresh result tagged with the
    /// column's declared type
    fn evaluate_column(&self, col: &ColumnReference) -> FilterResult<ExpressionResult> {
        let value = self.row.get(col.index)?;
        if !value.is_compatible_with(col.data_type) {
            return Err(FilterError::ColumnTypeMismatch {
                index: col.index,
                declared: col.data_type,
                actual: value.data_type(),
            });
        }
        ExpressionResult::typed(col.data_type, value.clone())
    }

    fn evaluate_null_test(&self, op: UnaryOperator, mut operand: ExpressionResult) -> ExpressionResult {
        let is_null = operand.is_null();
        let outcome = match op {
            UnaryOperator::IsNull => is_null,
            UnaryOperator::IsNotNull => !is_null,
        };
        operand.set(Value::Boolean(outcome));
        operand
    }
}

impl Expression {
    /// Evaluate this tree against one row
    pub fn evaluate<R: RowAccessor + ?Sized>(&self, row: &R) -> FilterResult<ExpressionResult> {
        ExpressionEvaluator::new(row).evaluate(self)
    }
}

/// Helper function to evaluate an expression against a row
pub fn evaluate_expression<R: RowAccessor + ?Sized>(
    expr: &Expression,
    row: &R,
) -> FilterResult<ExpressionResult> {
    ExpressionEvaluator::new(row).evaluate(expr)
}
