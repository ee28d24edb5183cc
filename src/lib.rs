pub mod access;
pub mod expression;
pub mod filter;

pub use access::{DataType, Row, RowAccessor, Value};
pub use expression::{Expression, ExpressionKind, ExpressionResult, FilterError, FilterResult};
pub use filter::FilterPredicate;
