//! Condition expressions for `@if` and `@elseif`.
//!
//! An expression is either a single operand, tested for truthiness, or two
//! operands joined by exactly one operator from [`Op::TABLE`]:
//!
//! ```text
//! money.wallet > 10
//! name == "Reimu"
//! !banned
//! admin || moderator
//! ```
//!
//! There is no precedence and no grouping: a second operator is rejected
//! when the expression is parsed.
//!
//! # Operand resolution
//!
//! Every operand is looked up in the declared variables first, then as a
//! path in the render context. The keywords `true`, `false` and `null` are
//! used when neither has a value. The right-hand operand of a comparison
//! (`==`, `!=`, `>`, `<`, `>=`, `<=`) additionally falls back to a numeric
//! literal and finally to its own text, with surrounding quotes removed.
//!
//! Operands of `!`, `&&` and `||` are references only: a missing key is
//! falsy on either side, so `!banned` holds when `banned` is absent.

use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::op::Op;
use crate::path;
use crate::value::{parse_number, Operand, Variables};

/// A parsed condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
enum ExprKind {
    Truthy(Term),
    Unary { op: Op, operand: Term },
    Binary { left: Term, op: Op, right: Term },
}

/// Operand text plus the lookup strategy for its position.
#[derive(Debug, Clone, PartialEq)]
enum Term {
    /// Variable or context lookup only.
    Reference(String),
    /// Lookup, then numeric literal, then raw text.
    Literal(String),
}

impl Expr {
    /// Parses an expression. `line` is used for error reporting only.
    pub fn parse(expression: &str, line: usize) -> Result<Expr> {
        let source = expression.trim();
        if source.is_empty() {
            return Err(TemplateError::expression(source, "empty condition", line));
        }

        let kind = match find_operator(source, line)? {
            None => ExprKind::Truthy(Term::Reference(source.to_string())),
            Some((at, op)) => {
                let left = source[..at].trim();
                let right = source[at + op.as_str().len()..].trim();

                if right.is_empty() {
                    return Err(TemplateError::expression(
                        source,
                        format!("missing operand after `{}`", op),
                        line,
                    ));
                }

                if op.is_unary() {
                    if !left.is_empty() {
                        return Err(TemplateError::expression(
                            source,
                            format!("unexpected operand before `{}`", op),
                            line,
                        ));
                    }
                    ExprKind::Unary {
                        op,
                        operand: Term::Reference(right.to_string()),
                    }
                } else {
                    if left.is_empty() {
                        return Err(TemplateError::expression(
                            source,
                            format!("missing operand before `{}`", op),
                            line,
                        ));
                    }
                    let right = if op.is_logical() {
                        Term::Reference(right.to_string())
                    } else {
                        Term::Literal(right.to_string())
                    };
                    ExprKind::Binary {
                        left: Term::Reference(left.to_string()),
                        op,
                        right,
                    }
                }
            }
        };

        Ok(Expr {
            source: source.to_string(),
            kind,
        })
    }

    /// Returns the trimmed expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the operator, if the expression has one.
    pub fn op(&self) -> Option<Op> {
        match &self.kind {
            ExprKind::Truthy(_) => None,
            ExprKind::Unary { op, .. } | ExprKind::Binary { op, .. } => Some(*op),
        }
    }

    /// Evaluates the expression against the context and declared variables.
    pub fn evaluate(&self, context: &Value, variables: &Variables) -> bool {
        match &self.kind {
            ExprKind::Truthy(term) => term.resolve(context, variables).is_truthy(),
            ExprKind::Unary { op, operand } => {
                op.apply(&Operand::Undefined, &operand.resolve(context, variables))
            }
            ExprKind::Binary { left, op, right } => op.apply(
                &left.resolve(context, variables),
                &right.resolve(context, variables),
            ),
        }
    }
}

impl Term {
    fn resolve<'a>(&'a self, context: &'a Value, variables: &'a Variables) -> Operand<'a> {
        let (text, literal) = match self {
            Term::Reference(text) => (text.as_str(), false),
            Term::Literal(text) => (text.as_str(), true),
        };

        if let Some(scalar) = variables.get(text) {
            return Operand::Variable(scalar);
        }
        if let Some(value) = path::resolve(context, text) {
            return Operand::Context(value);
        }
        match text {
            "true" => return Operand::Bool(true),
            "false" => return Operand::Bool(false),
            "null" => return Operand::Null,
            _ => {}
        }
        if !literal {
            return Operand::Undefined;
        }
        if let Some(n) = parse_number(text) {
            return Operand::Number(n);
        }
        Operand::Text(unquote(text))
    }
}

/// Strips one pair of matching single or double quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Finds the only operator in `source`, skipping quoted text.
///
/// Returns the byte offset and operator, `None` when there is no operator,
/// or an error when there is more than one.
fn find_operator(source: &str, line: usize) -> Result<Option<(usize, Op)>> {
    let mut found: Option<(usize, Op)> = None;
    let mut quote: Option<char> = None;
    let mut chars = source.char_indices();

    while let Some((at, ch)) = chars.next() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            continue;
        }

        let Some(op) = Op::match_prefix(&source[at..]) else {
            continue;
        };

        if let Some((_, first)) = found {
            return Err(TemplateError::expression(
                source,
                format!("only one operator is allowed, found `{}` and `{}`", first, op),
                line,
            ));
        }
        found = Some((at, op));

        // Operators are ASCII, so skipping their remaining bytes skips chars.
        for _ in 1..op.as_str().len() {
            chars.next();
        }
    }

    Ok(found)
}
