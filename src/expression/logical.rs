//! AND / OR / NOT.
//!
//! Both children of AND and OR are always evaluated, left first. Every
//! non-NULL operand must be boolean, even when the other side is NULL. After
//! that, a NULL operand makes the result false, matching the comparison
//! operators.

use crate::access::{RowAccessor, Value};
use crate::expression::eval::ExpressionEvaluator;
use crate::expression::{
    Expression, ExpressionKind, ExpressionResult, FilterError, FilterResult, LogicalOperator,
};

impl<'a, R: RowAccessor + ?Sized> ExpressionEvaluator<'a, R> {
    pub(crate) fn evaluate_logical(
        &self,
        op: LogicalOperator,
        left: &Expression,
        right: &Expression,
    ) -> FilterResult<ExpressionResult> {
        let mut left_result = self.evaluate(left)?;
        let right_result = self.evaluate(right)?;

        let outcome = match (
            boolean_operand(op.kind(), &left_result)?,
            boolean_operand(op.kind(), &right_result)?,
        ) {
            (Some(l), Some(r)) => op.apply(l, r),
            _ => false,
        };
        left_result.set(Value::Boolean(outcome));
        Ok(left_result)
    }

    pub(crate) fn evaluate_not(&self, operand: &Expression) -> FilterResult<ExpressionResult> {
        let mut result = self.evaluate(operand)?;
        let outcome = match boolean_operand(ExpressionKind::Not, &result)? {
            Some(b) => !b,
            None => false,
        };
        result.set(Value::Boolean(outcome));
        Ok(result)
    }
}

/// `None` for NULL, otherwise the boolean payload
fn boolean_operand(kind: ExpressionKind, result: &ExpressionResult) -> FilterResult<Option<bool>> {
    if result.is_null() {
        return Ok(None);
    }
    result.get_boolean().map(Some).map_err(|_| {
        FilterError::unsupported(
            kind.as_str(),
            format!("expected a boolean operand, got {}", result.data_type()),
        )
    })
}
