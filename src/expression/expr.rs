//! Expression tree definitions.

use crate::access::{DataType, Value};
use crate::expression::operator::{Comparator, ExpressionKind, LogicalOperator, UnaryOperator};
use crate::expression::ExpressionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column reference in an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnReference {
    /// Column index in the row (0-based)
    pub index: usize,
    /// Declared type; results are tagged with it
    pub data_type: DataType,
    /// Optional column name for display
    pub name: Option<String>,
}

impl ColumnReference {
    pub fn new(index: usize, data_type: DataType) -> Self {
        Self {
            index,
            data_type,
            name: None,
        }
    }

    pub fn with_name(index: usize, data_type: DataType, name: impl Into<String>) -> Self {
        Self {
            index,
            data_type,
            name: Some(name.into()),
        }
    }
}

/// Constant value in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub result: ExpressionResult,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self {
            result: ExpressionResult::new(value),
        }
    }

    /// A NULL literal that still carries a type
    pub fn null(data_type: DataType) -> Self {
        Self {
            result: ExpressionResult::null(data_type),
        }
    }

    pub fn value(&self) -> &Value {
        self.result.value()
    }
}

/// Expression tree node.
///
/// Each node owns its children; trees are built once and evaluated many
/// times, from any number of threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),

    Column(ColumnReference),

    /// Null tests
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Relational comparison of two operands
    Comparison {
        op: Comparator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `expr IN (list)` / `expr NOT IN (list)`
    InList {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },

    /// AND / OR
    Logical {
        op: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Not(Box<Expression>),
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(Literal::new(value.into()))
    }

    /// Create a typed NULL literal
    pub fn null(data_type: DataType) -> Self {
        Expression::Literal(Literal::null(data_type))
    }

    /// Create a column reference expression
    pub fn column(index: usize, data_type: DataType) -> Self {
        Expression::Column(ColumnReference::new(index, data_type))
    }

    /// Create a column reference with name
    pub fn column_with_name(index: usize, data_type: DataType, name: impl Into<String>) -> Self {
        Expression::Column(ColumnReference::with_name(index, data_type, name))
    }

    pub fn compare(op: Comparator, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::Equals, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::NotEquals, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::GreaterThan, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::GreaterThanEquals, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::LessThan, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::compare(Comparator::LessThanEquals, left, right)
    }

    pub fn in_list(expr: Expression, list: Vec<Expression>) -> Self {
        Expression::InList {
            expr: Box::new(expr),
            list,
            negated: false,
        }
    }

    pub fn not_in_list(expr: Expression, list: Vec<Expression>) -> Self {
        Expression::InList {
            expr: Box::new(expr),
            list,
            negated: true,
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not_expr(operand: Expression) -> Self {
        Expression::Not(Box::new(operand))
    }

    pub fn is_null(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOperator::IsNull,
            operand: Box::new(operand),
        }
    }

    pub fn is_not_null(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOperator::IsNotNull,
            operand: Box::new(operand),
        }
    }

    /// AND together any number of predicates. `None` for an empty input.
    pub fn conjunction(predicates: impl IntoIterator<Item = Expression>) -> Option<Self> {
        predicates.into_iter().reduce(Expression::and)
    }

    /// Stable operator tag of this node
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Literal(_) => ExpressionKind::Literal,
            Expression::Column(_) => ExpressionKind::Column,
            Expression::Unary { op, .. } => op.kind(),
            Expression::Comparison { op, .. } => op.kind(),
            Expression::InList { negated: false, .. } => ExpressionKind::In,
            Expression::InList { negated: true, .. } => ExpressionKind::NotIn,
            Expression::Logical { op, .. } => op.kind(),
            Expression::Not(_) => ExpressionKind::Not,
        }
    }

    /// Deterministic text form for logs and EXPLAIN output. Not meant to be
    /// parsed back.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) | Expression::Column(_) => vec![],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Comparison { left, right, .. } | Expression::Logical { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Expression::InList { expr, list, .. } => {
                let mut children = Vec::with_capacity(list.len() + 1);
                children.push(expr.as_ref());
                children.extend(list.iter());
                children
            }
            Expression::Not(operand) => vec![operand.as_ref()],
        }
    }

    /// Check if this expression is a constant (contains no column references)
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) => true,
            Expression::Column(_) => false,
            _ => self.children().iter().all(|child| child.is_constant()),
        }
    }

    /// Indices of every column the tree reads, sorted and deduplicated
    pub fn column_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.collect_columns(&mut indices);
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    fn collect_columns(&self, indices: &mut Vec<usize>) {
        if let Expression::Column(col) = self {
            indices.push(col.index);
        }
        for child in self.children() {
            child.collect_columns(indices);
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "Literal({})", lit.value()),
            Expression::Column(col) => match &col.name {
                Some(name) => write!(f, "Column({})", name),
                None => write!(f, "Column(#{})", col.index),
            },
            Expression::Unary { op, operand } => write!(f, "{}({})", op.name(), operand),
            Expression::Comparison { op, left, right } => {
                write!(f, "{}({},{})", op.name(), left, right)
            }
            Expression::InList { expr, list, negated } => {
                let name = if *negated { "NotIn" } else { "In" };
                write!(f, "{}({},[", name, expr)?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("])")
            }
            Expression::Logical { op, left, right } => {
                write!(f, "{}({},{})", op.name(), left, right)
            }
            Expression::Not(operand) => write!(f, "Not({})", operand),
        }
    }
}
