//! Operator definitions for expressions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Stable per-node tag for external filter classification and pushdown.
///
/// Variants are only ever appended; existing tags keep their meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal,
    Column,
    IsNull,
    IsNotNull,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    In,
    NotIn,
    And,
    Or,
    Not,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionKind::Literal => "LITERAL",
            ExpressionKind::Column => "COLUMN",
            ExpressionKind::IsNull => "ISNULL",
            ExpressionKind::IsNotNull => "ISNOTNULL",
            ExpressionKind::Equals => "EQUALS",
            ExpressionKind::NotEquals => "NOT_EQUALS",
            ExpressionKind::GreaterThan => "GREATERTHAN",
            ExpressionKind::GreaterThanEquals => "GREATERTHAN_EQUALTO",
            ExpressionKind::LessThan => "LESSTHAN",
            ExpressionKind::LessThanEquals => "LESSTHAN_EQUALTO",
            ExpressionKind::In => "IN",
            ExpressionKind::NotIn => "NOT_IN",
            ExpressionKind::And => "AND",
            ExpressionKind::Or => "OR",
            ExpressionKind::Not => "NOT",
        }
    }

    /// Relational comparisons, the kinds an index can usually prune on
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            ExpressionKind::Equals
                | ExpressionKind::NotEquals
                | ExpressionKind::GreaterThan
                | ExpressionKind::GreaterThanEquals
                | ExpressionKind::LessThan
                | ExpressionKind::LessThanEquals
        )
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relational comparators. They share one evaluation protocol and differ
/// only in which orderings satisfy them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl Comparator {
    /// Whether the comparator holds for `left.cmp(right)`.
    ///
    /// `None` means the operands are unordered (a NaN was involved); only
    /// `NotEquals` holds then.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            None => matches!(self, Comparator::NotEquals),
            Some(ordering) => match self {
                Comparator::Equals => ordering == Ordering::Equal,
                Comparator::NotEquals => ordering != Ordering::Equal,
                Comparator::GreaterThan => ordering == Ordering::Greater,
                Comparator::GreaterThanEquals => ordering != Ordering::Less,
                Comparator::LessThan => ordering == Ordering::Less,
                Comparator::LessThanEquals => ordering != Ordering::Greater,
            },
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            Comparator::Equals => ExpressionKind::Equals,
            Comparator::NotEquals => ExpressionKind::NotEquals,
            Comparator::GreaterThan => ExpressionKind::GreaterThan,
            Comparator::GreaterThanEquals => ExpressionKind::GreaterThanEquals,
            Comparator::LessThan => ExpressionKind::LessThan,
            Comparator::LessThanEquals => ExpressionKind::LessThanEquals,
        }
    }

    /// Name used in `describe()` output
    pub fn name(&self) -> &'static str {
        match self {
            Comparator::Equals => "Equals",
            Comparator::NotEquals => "NotEquals",
            Comparator::GreaterThan => "GreaterThan",
            Comparator::GreaterThanEquals => "GreaterThanEquals",
            Comparator::LessThan => "LessThan",
            Comparator::LessThanEquals => "LessThanEquals",
        }
    }

    /// SQL-style symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Equals => "=",
            Comparator::NotEquals => "!=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanEquals => ">=",
            Comparator::LessThan => "<",
            Comparator::LessThanEquals => "<=",
        }
    }

    /// Parse the short mnemonics used on the command line (`eq`, `gt`, ...)
    /// as well as the symbols.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" => Some(Comparator::Equals),
            "ne" | "!=" | "<>" => Some(Comparator::NotEquals),
            "gt" | ">" => Some(Comparator::GreaterThan),
            "ge" | ">=" => Some(Comparator::GreaterThanEquals),
            "lt" | "<" => Some(Comparator::LessThan),
            "le" | "<=" => Some(Comparator::LessThanEquals),
            _ => None,
        }
    }
}

/// Binary logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            LogicalOperator::And => ExpressionKind::And,
            LogicalOperator::Or => ExpressionKind::Or,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogicalOperator::And => "And",
            LogicalOperator::Or => "Or",
        }
    }
}

/// Null tests. Always produce a non-null boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    IsNull,
    IsNotNull,
}

impl UnaryOperator {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            UnaryOperator::IsNull => ExpressionKind::IsNull,
            UnaryOperator::IsNotNull => ExpressionKind::IsNotNull,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOperator::IsNull => "IsNull",
            UnaryOperator::IsNotNull => "IsNotNull",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_holds() {
        use Ordering::*;

        let cases = [
            (Comparator::Equals, [false, true, false]),
            (Comparator::NotEquals, [true, false, true]),
            (Comparator::GreaterThan, [false, false, true]),
            (Comparator::GreaterThanEquals, [false, true, true]),
            (Comparator::LessThan, [true, false, false]),
            (Comparator::LessThanEquals, [true, true, false]),
        ];
        for (comparator, expected) in cases {
            let actual = [Less, Equal, Greater].map(|o| comparator.holds(Some(o)));
            assert_eq!(actual, expected, "{:?}", comparator);
        }
    }

    #[test]
    fn test_unordered_only_satisfies_not_equals() {
        assert!(Comparator::NotEquals.holds(None));
        assert!(!Comparator::Equals.holds(None));
        assert!(!Comparator::GreaterThan.holds(None));
        assert!(!Comparator::LessThanEquals.holds(None));
    }

    #[test]
    fn test_comparator_parse() {
        assert_eq!(Comparator::parse("gt"), Some(Comparator::GreaterThan));
        assert_eq!(Comparator::parse(">="), Some(Comparator::GreaterThanEquals));
        assert_eq!(Comparator::parse("NE"), Some(Comparator::NotEquals));
        assert_eq!(Comparator::parse("like"), None);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Comparator::GreaterThan.kind().as_str(), "GREATERTHAN");
        assert_eq!(LogicalOperator::Or.kind(), ExpressionKind::Or);
        assert_eq!(UnaryOperator::IsNull.kind().as_str(), "ISNULL");
        assert!(ExpressionKind::LessThan.is_comparison());
        assert!(!ExpressionKind::In.is_comparison());
    }

    #[test]
    fn test_logical_apply() {
        assert!(LogicalOperator::And.apply(true, true));
        assert!(!LogicalOperator::And.apply(true, false));
        assert!(LogicalOperator::Or.apply(false, true));
        assert!(!LogicalOperator::Or.apply(false, false));
    }
}
