//! Relational comparisons and IN lists.
//!
//! Every comparator runs the same protocol:
//!
//! 1. evaluate the left child, then the right child
//! 2. if either result is NULL the comparison is false
//! 3. pick the comparison frame, the operand type with the higher precedence
//! 4. read both operands through that frame and order them
//!
//! The comparator only decides which orderings satisfy it. Frames without an
//! ordering (Boolean, Null) make every comparator false.

use crate::access::{DataType, RowAccessor, Value};
use crate::expression::eval::ExpressionEvaluator;
use crate::expression::{
    Comparator, Expression, ExpressionKind, ExpressionResult, FilterError, FilterResult,
};

impl<'a, R: RowAccessor + ?Sized> ExpressionEvaluator<'a, R> {
    pub(crate) fn evaluate_comparison(
        &self,
        op: Comparator,
        left: &Expression,
        right: &Expression,
    ) -> FilterResult<ExpressionResult> {
        let mut left_result = self.evaluate(left)?;
        let right_result = self.evaluate(right)?;

        let outcome = compare_results(op, &left_result, &right_result)?;
        left_result.set(Value::Boolean(outcome));
        Ok(left_result)
    }

    /// Evaluate `expr [NOT] IN (list)`.
    ///
    /// All list items are evaluated, in order. NULL items never match; any
    /// NULL item makes `NOT IN` false.
    pub(crate) fn evaluate_in_list(
        &self,
        expr: &Expression,
        list: &[Expression],
        negated: bool,
    ) -> FilterResult<ExpressionResult> {
        let kind = if negated {
            ExpressionKind::NotIn
        } else {
            ExpressionKind::In
        };
        if list.is_empty() {
            return Err(FilterError::MalformedTree {
                reason: format!("{} requires at least one list item", kind),
            });
        }

        let mut probe = self.evaluate(expr)?;
        let mut matched = false;
        let mut saw_null = false;
        for item in list {
            let candidate = self.evaluate(item)?;
            if candidate.is_null() {
                saw_null = true;
            } else if !matched {
                matched = compare_as(kind, Comparator::Equals, &probe, &candidate)?;
            }
        }

        let outcome = if probe.is_null() {
            false
        } else if negated {
            !saw_null && !matched
        } else {
            matched
        };
        probe.set(Value::Boolean(outcome));
        Ok(probe)
    }
}

/// Compare two evaluated operands.
///
/// NULL on either side is false for every comparator. Operands of different
/// types are both read through the higher-precedence type; a pair that
/// cannot be read that way is an unsupported filter.
pub fn compare_results(
    op: Comparator,
    left: &ExpressionResult,
    right: &ExpressionResult,
) -> FilterResult<bool> {
    compare_as(op.kind(), op, left, right)
}

fn compare_as(
    kind: ExpressionKind,
    op: Comparator,
    left: &ExpressionResult,
    right: &ExpressionResult,
) -> FilterResult<bool> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }

    let frame = DataType::comparison_frame(left.data_type(), right.data_type());
    compare_in_frame(op, frame, left, right).map_err(|e| match e {
        FilterError::UnsupportedFilter { reason, .. } => {
            FilterError::unsupported(kind.as_str(), reason)
        }
        other => other,
    })
}

fn compare_in_frame(
    op: Comparator,
    frame: DataType,
    left: &ExpressionResult,
    right: &ExpressionResult,
) -> FilterResult<bool> {
    let ordering = match frame {
        DataType::String => Some(left.read_string()?.cmp(&right.read_string()?)),
        DataType::Double => left.read_double()?.partial_cmp(&right.read_double()?),
        DataType::Integer => Some(left.read_int()?.cmp(&right.read_int()?)),
        DataType::Long => Some(left.read_long()?.cmp(&right.read_long()?)),
        DataType::Timestamp => Some(left.read_timestamp()?.cmp(&right.read_timestamp()?)),
        DataType::Decimal => Some(left.read_decimal()?.cmp(&right.read_decimal()?)),
        DataType::Boolean | DataType::Null => {
            log::trace!("no ordering for frame {}, {} is false", frame, op.name());
            return Ok(false);
        }
    };
    Ok(op.holds(ordering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Row;
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn eval_bool(expr: &Expression) -> bool {
        expr.evaluate(&Row::default())
            .unwrap()
            .get_boolean()
            .unwrap()
    }

    fn decimal(text: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn test_null_operand_is_false_for_every_comparator() {
        let comparators = [
            Comparator::Equals,
            Comparator::NotEquals,
            Comparator::GreaterThan,
            Comparator::GreaterThanEquals,
            Comparator::LessThan,
            Comparator::LessThanEquals,
        ];
        for op in comparators {
            let left_null = Expression::compare(op, Expression::null(DataType::Integer), Expression::literal(5));
            let right_null = Expression::compare(op, Expression::literal(5), Expression::null(DataType::Integer));
            let both_null = Expression::compare(
                op,
                Expression::null(DataType::Integer),
                Expression::null(DataType::Integer),
            );
            assert!(!eval_bool(&left_null), "{:?}", op);
            assert!(!eval_bool(&right_null), "{:?}", op);
            assert!(!eval_bool(&both_null), "{:?}", op);
        }
    }

    #[test]
    fn test_mixed_types_use_higher_frame() {
        let gt = Expression::gt(Expression::literal(10), Expression::literal(10.5));
        assert!(!eval_bool(&gt));

        let lt = Expression::lt(Expression::literal(10), Expression::literal(10.5));
        assert!(eval_bool(&lt));

        // Integer vs Long reads both as i64
        let eq = Expression::eq(Expression::literal(7), Expression::literal(7i64));
        assert!(eval_bool(&eq));

        let big = Expression::gt(Expression::literal(i64::from(i32::MAX) + 1), Expression::literal(i32::MAX));
        assert!(eval_bool(&big));

        // Long vs Decimal reads both exactly
        let ge = Expression::ge(Expression::literal(3i64), Expression::literal(decimal("2.99")));
        assert!(eval_bool(&ge));
    }

    #[test]
    fn test_string_comparison_is_lexicographic() {
        assert!(eval_bool(&Expression::gt(Expression::literal("b"), Expression::literal("a"))));
        assert!(eval_bool(&Expression::lt(Expression::literal("abc"), Expression::literal("abd"))));
        assert!(eval_bool(&Expression::lt(Expression::literal("10"), Expression::literal("9"))));
        assert!(eval_bool(&Expression::eq(Expression::literal("x"), Expression::literal("x"))));
    }

    #[test]
    fn test_string_read_through_numeric_frame() {
        // The numeric operand outranks the string, so "9" is read as an integer
        assert!(eval_bool(&Expression::lt(Expression::literal("9"), Expression::literal(10))));

        let err = Expression::gt(Expression::literal("nine"), Expression::literal(10))
            .evaluate(&Row::default())
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(matches!(
            err,
            FilterError::UnsupportedFilter { ref operator, .. } if operator == "GREATERTHAN"
        ));
    }

    #[test]
    fn test_decimal_comparison_is_exact() {
        let sum = BigDecimal::from_str("0.1").unwrap() + BigDecimal::from_str("0.2").unwrap();
        let expr = Expression::gt(Expression::literal(decimal("0.30")), Expression::literal(sum.clone()));
        assert!(!eval_bool(&expr));

        let expr = Expression::eq(Expression::literal(decimal("0.30")), Expression::literal(sum));
        assert!(eval_bool(&expr));

        // The same sum in floating point is not 0.3
        assert!(0.1_f64 + 0.2_f64 > 0.3_f64);
    }

    #[test]
    fn test_double_nan_is_unordered() {
        let nan = || Expression::literal(f64::NAN);
        assert!(!eval_bool(&Expression::eq(nan(), nan())));
        assert!(eval_bool(&Expression::ne(nan(), nan())));
        assert!(!eval_bool(&Expression::ge(nan(), Expression::literal(1.0))));
    }

    #[test]
    fn test_timestamp_comparison() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert!(eval_bool(&Expression::lt(Expression::literal(early), Expression::literal(late))));
        assert!(eval_bool(&Expression::ge(Expression::literal(late), Expression::literal(late))));

        // Strings are read as timestamps against a timestamp operand
        let expr = Expression::gt(Expression::literal(late), Expression::literal("2024-03-15"));
        assert!(eval_bool(&expr));
    }

    #[test]
    fn test_boolean_frame_is_false_for_every_comparator() {
        let comparators = [
            Comparator::Equals,
            Comparator::NotEquals,
            Comparator::GreaterThan,
            Comparator::GreaterThanEquals,
            Comparator::LessThan,
            Comparator::LessThanEquals,
        ];
        for op in comparators {
            for (a, b) in [(true, false), (false, true), (true, true)] {
                let expr = Expression::compare(op, Expression::literal(a), Expression::literal(b));
                assert!(!eval_bool(&expr), "{:?}({}, {})", op, a, b);
            }
        }

        // Boolean columns land in the same frame
        let row = Row::new(vec![Value::Boolean(true)]);
        let expr = Expression::eq(Expression::column(0, DataType::Boolean), Expression::literal(true));
        assert!(!expr.evaluate(&row).unwrap().get_boolean().unwrap());

        // A numeric operand outranks the boolean, which cannot be read as a number
        let err = Expression::eq(Expression::literal(true), Expression::literal(1))
            .evaluate(&Row::default())
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_double_against_decimal_is_exact() {
        let eq = Expression::eq(Expression::literal(0.1), Expression::literal(decimal("0.1")));
        assert!(eval_bool(&eq));

        let gt = Expression::gt(Expression::literal(0.1), Expression::literal(decimal("0.1")));
        assert!(!eval_bool(&gt));

        let lt = Expression::lt(Expression::literal(decimal("0.1")), Expression::literal(0.10000001));
        assert!(eval_bool(&lt));
    }

    #[test]
    fn test_comparison_reuses_left_result() {
        let expr = Expression::le(Expression::literal("a"), Expression::literal("b"));
        let result = expr.evaluate(&Row::default()).unwrap();
        assert_eq!(result.data_type(), DataType::Boolean);
        assert!(result.get_boolean().unwrap());
    }

    #[test]
    fn test_in_list() {
        let row = Row::new(vec![Value::Integer(2), Value::Null]);
        let col = || Expression::column(0, DataType::Integer);
        let null_col = || Expression::column(1, DataType::Integer);
        let eval = |expr: Expression| expr.evaluate(&row).unwrap().get_boolean().unwrap();

        assert!(eval(Expression::in_list(col(), vec![Expression::literal(1), Expression::literal(2)])));
        assert!(!eval(Expression::in_list(col(), vec![Expression::literal(3)])));
        // Mixed types go through the comparison frame
        assert!(eval(Expression::in_list(col(), vec![Expression::literal(2.0)])));
        // NULL never matches
        assert!(!eval(Expression::in_list(null_col(), vec![Expression::literal(1)])));
        assert!(eval(Expression::in_list(
            col(),
            vec![Expression::null(DataType::Integer), Expression::literal(2)]
        )));
    }

    #[test]
    fn test_not_in_list() {
        let row = Row::new(vec![Value::Integer(2), Value::Null]);
        let col = || Expression::column(0, DataType::Integer);
        let eval = |expr: Expression| expr.evaluate(&row).unwrap().get_boolean().unwrap();

        assert!(eval(Expression::not_in_list(col(), vec![Expression::literal(3), Expression::literal(4)])));
        assert!(!eval(Expression::not_in_list(col(), vec![Expression::literal(2)])));
        assert!(!eval(Expression::not_in_list(
            col(),
            vec![Expression::literal(3), Expression::null(DataType::Integer)]
        )));
        assert!(!eval(Expression::not_in_list(
            Expression::column(1, DataType::Integer),
            vec![Expression::literal(3)]
        )));
    }

    #[test]
    fn test_empty_in_list_is_malformed() {
        let expr = Expression::in_list(Expression::literal(1), vec![]);
        assert!(matches!(
            expr.evaluate(&Row::default()),
            Err(FilterError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_in_list_unsupported_pair_names_operator() {
        let expr = Expression::not_in_list(Expression::literal(true), vec![Expression::literal(1)]);
        match expr.evaluate(&Row::default()) {
            Err(FilterError::UnsupportedFilter { operator, .. }) => assert_eq!(operator, "NOT_IN"),
            other => panic!("expected unsupported filter, got {:?}", other),
        }
    }
}
