//! Row filtering on top of an expression tree.
//!
//! A `FilterPredicate` is what a scan loop holds: it owns the root of the
//! tree and turns each evaluation into a keep/skip decision.

use crate::access::{DataType, RowAccessor, Value};
use crate::expression::{Expression, FilterError, FilterResult, TypeChecker};

/// Keep/skip decision for rows, backed by a filter expression
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    /// Root of the filter tree
    expr: Expression,
}

impl FilterPredicate {
    /// Wrap an expression the planner has already validated
    pub fn new(expr: Expression) -> Self {
        Self { expr }
    }

    /// Type check the expression against `schema` before wrapping it
    pub fn with_schema(expr: Expression, schema: &[DataType]) -> FilterResult<Self> {
        TypeChecker::new(schema).check_filter_predicate(&expr)?;
        Ok(Self { expr })
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    /// Evaluate the predicate against one row.
    ///
    /// NULL is a non-match. A root that yields anything other than a boolean
    /// is an unsupported filter.
    pub fn matches<R: RowAccessor + ?Sized>(&self, row: &R) -> FilterResult<bool> {
        let result = self.expr.evaluate(row)?;
        match result.value() {
            Value::Boolean(b) => Ok(*b),
            Value::Null => Ok(false),
            _ => Err(FilterError::unsupported(
                self.expr.kind().as_str(),
                format!("filter evaluated to {}, not boolean", result.data_type()),
            )),
        }
    }

    /// Indices of the rows that satisfy the predicate, in input order.
    ///
    /// Stops at the first failing row and returns its error.
    pub fn select<'r, R, I>(&self, rows: I) -> FilterResult<Vec<usize>>
    where
        R: RowAccessor + ?Sized + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut selected = Vec::new();
        let mut scanned = 0usize;
        for (i, row) in rows.into_iter().enumerate() {
            scanned += 1;
            if self.matches(row)? {
                selected.push(i);
            }
        }
        log::debug!(
            "Filter {} kept {} of {} rows",
            self.expr,
            selected.len(),
            scanned
        );
        Ok(selected)
    }
}

impl From<Expression> for FilterPredicate {
    fn from(expr: Expression) -> Self {
        Self::new(expr)
    }
}
