//! Filter expression framework.
//!
//! This module provides:
//! - The expression tree (literals, column references, null tests,
//!   comparisons, IN lists, AND / OR / NOT)
//! - Typed results and the coercion rules between them
//! - Evaluation of a tree against one row at a time
//! - Static type checking and a binary plan encoding

pub mod codec;
pub mod comparison;
pub mod error;
pub mod eval;
pub mod expr;
pub mod logical;
pub mod operator;
pub mod result;
pub mod type_checker;

pub use codec::{read_plan, write_plan};
pub use comparison::compare_results;
pub use error::{FilterError, FilterResult};
pub use eval::{evaluate_expression, ExpressionEvaluator};
pub use expr::{ColumnReference, Expression, Literal};
pub use operator::{Comparator, ExpressionKind, LogicalOperator, UnaryOperator};
pub use result::ExpressionResult;
pub use type_checker::{type_check_expression, validate_filter_predicate, TypeChecker};
