//! Operators accepted in `@if` and `@elseif` conditions.
//!
//! The operator set is closed. [`Op::TABLE`] lists every operator with its
//! source text, longest first: the tokenizer tries entries in that order, so
//! `>` can never match the first character of `>=`.

use std::cmp::Ordering;

use crate::value::Operand;

/// Condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Greater than or equal (numeric).
    Gte,
    /// Less than or equal (numeric).
    Lte,
    /// Loose equality.
    Eq,
    /// Loose inequality.
    Ne,
    /// Both operands truthy.
    And,
    /// Either operand truthy.
    Or,
    /// Greater than (numeric).
    Gt,
    /// Less than (numeric).
    Lt,
    /// Negated truthiness of the right operand. Unary.
    Not,
}

impl Op {
    /// Every operator with its source text, in matching order.
    pub const TABLE: [(&'static str, Op); 9] = [
        (">=", Op::Gte),
        ("<=", Op::Lte),
        ("==", Op::Eq),
        ("!=", Op::Ne),
        ("&&", Op::And),
        ("||", Op::Or),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("!", Op::Not),
    ];

    /// Matches the operator at the start of `text`, longest first.
    pub fn match_prefix(text: &str) -> Option<Op> {
        Op::TABLE
            .iter()
            .find(|(symbol, _)| text.starts_with(symbol))
            .map(|&(_, op)| op)
    }

    /// Returns the source text of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Not => "!",
        }
    }

    /// Returns `true` for operators that take no left operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Op::Not)
    }

    /// Returns `true` for operators that test truthiness.
    pub fn is_logical(self) -> bool {
        matches!(self, Op::And | Op::Or | Op::Not)
    }

    /// Evaluates a numeric comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Applies the operator to two resolved operands.
    ///
    /// For [`Op::Not`] the left operand is ignored.
    pub fn apply(self, left: &Operand<'_>, right: &Operand<'_>) -> bool {
        match self {
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => {
                match (left.to_number(), right.to_number()) {
                    (Some(a), Some(b)) => a
                        .partial_cmp(&b)
                        .map(|ordering| self.eval_ordering(ordering))
                        .unwrap_or(false),
                    _ => false,
                }
            }
            Op::Eq => left.loose_eq(right),
            Op::Ne => !left.loose_eq(right),
            Op::And => left.is_truthy() && right.is_truthy(),
            Op::Or => left.is_truthy() || right.is_truthy(),
            Op::Not => !right.is_truthy(),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_longest_first() {
        let lengths: Vec<usize> = Op::TABLE.iter().map(|(s, _)| s.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);

        for (symbol, op) in Op::TABLE {
            assert_eq!(op.as_str(), symbol);
        }
    }

    #[test]
    fn match_prefix_prefers_longer_operator() {
        assert_eq!(Op::match_prefix(">= 10"), Some(Op::Gte));
        assert_eq!(Op::match_prefix("> 10"), Some(Op::Gt));
        assert_eq!(Op::match_prefix("<=1"), Some(Op::Lte));
        assert_eq!(Op::match_prefix("!= x"), Some(Op::Ne));
        assert_eq!(Op::match_prefix("!x"), Some(Op::Not));
        assert_eq!(Op::match_prefix("= x"), None);
        assert_eq!(Op::match_prefix("& x"), None);
    }

    #[test]
    fn op_eval_ordering() {
        assert!(Op::Gt.eval_ordering(Ordering::Greater));
        assert!(!Op::Gt.eval_ordering(Ordering::Equal));
        assert!(Op::Gte.eval_ordering(Ordering::Equal));
        assert!(!Op::Gte.eval_ordering(Ordering::Less));
        assert!(Op::Lt.eval_ordering(Ordering::Less));
        assert!(Op::Lte.eval_ordering(Ordering::Equal));
        assert!(!Op::Lte.eval_ordering(Ordering::Greater));
        assert!(!Op::Eq.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn apply_numeric() {
        assert!(Op::Gt.apply(&Operand::Number(15.0), &Operand::Number(10.0)));
        assert!(!Op::Gt.apply(&Operand::Number(5.0), &Operand::Number(10.0)));
        assert!(Op::Lte.apply(&Operand::Text("3"), &Operand::Number(3.0)));
        // Non-numeric operands never compare
        assert!(!Op::Lt.apply(&Operand::Undefined, &Operand::Number(10.0)));
        assert!(!Op::Gte.apply(&Operand::Text("abc"), &Operand::Text("abc")));
    }

    #[test]
    fn apply_logical() {
        assert!(Op::And.apply(&Operand::Bool(true), &Operand::Text("x")));
        assert!(!Op::And.apply(&Operand::Bool(true), &Operand::Undefined));
        assert!(Op::Or.apply(&Operand::Undefined, &Operand::Number(1.0)));
        assert!(Op::Not.apply(&Operand::Undefined, &Operand::Undefined));
        assert!(!Op::Not.apply(&Operand::Undefined, &Operand::Bool(true)));
        assert!(Op::Ne.apply(&Operand::Text("a"), &Operand::Text("b")));
    }

    #[test]
    fn logical_operators() {
        let logical: Vec<Op> = Op::TABLE
            .iter()
            .map(|&(_, op)| op)
            .filter(|op| op.is_logical())
            .collect();
        assert_eq!(logical, vec![Op::And, Op::Or, Op::Not]);
        assert!(Op::Not.is_unary());
        assert!(!Op::Or.is_unary());
    }

    #[test]
    fn op_display() {
        assert_eq!(Op::Gte.to_string(), ">=");
        assert_eq!(Op::Not.to_string(), "!");
    }
}
