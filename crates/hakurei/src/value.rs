//! Runtime values seen by conditions and interpolation.
//!
//! [`Scalar`] is what a `@var` directive stores. [`Operand`] is a borrowed
//! view over anything a condition operand can resolve to: a context value, a
//! declared variable, or a literal from the expression text. All coercions
//! (truthiness, numeric conversion, loose equality) are defined on operands.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Value stored by a `@var` directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Value that parsed as a finite number.
    Number(f64),
    /// Anything else, kept verbatim.
    String(String),
}

impl Scalar {
    /// Parses a declaration value, coercing numeric text to a number.
    ///
    /// ```rust
    /// use hakurei::Scalar;
    ///
    /// assert_eq!(Scalar::parse("42"), Scalar::Number(42.0));
    /// assert_eq!(Scalar::parse("Reimu"), Scalar::String("Reimu".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match parse_number(raw) {
            Some(n) => Scalar::Number(n),
            None => Scalar::String(raw.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Variables declared during one render pass.
pub type Variables = HashMap<String, Scalar>;

/// Parses a finite number, rejecting `inf`, `NaN` and blank text.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A resolved condition operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'a> {
    /// Nothing was found.
    Undefined,
    /// Value from the render context.
    Context(&'a Value),
    /// Value declared with `@var`.
    Variable(&'a Scalar),
    /// Numeric literal from the expression text.
    Number(f64),
    /// `true` / `false` keyword.
    Bool(bool),
    /// `null` keyword.
    Null,
    /// Raw or quoted text from the expression.
    Text(&'a str),
}

/// Flattened view used by the coercion rules.
enum Prim<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(&'a str),
    Composite(&'a Value),
}

impl<'a> Operand<'a> {
    fn prim(&self) -> Prim<'a> {
        match *self {
            Operand::Undefined => Prim::Undefined,
            Operand::Null => Prim::Null,
            Operand::Bool(b) => Prim::Bool(b),
            Operand::Number(n) => Prim::Number(n),
            Operand::Text(s) => Prim::Str(s),
            Operand::Variable(Scalar::Number(n)) => Prim::Number(*n),
            Operand::Variable(Scalar::String(s)) => Prim::Str(s),
            Operand::Context(value) => match value {
                Value::Null => Prim::Null,
                Value::Bool(b) => Prim::Bool(*b),
                Value::Number(n) => Prim::Number(n.as_f64().unwrap_or(f64::NAN)),
                Value::String(s) => Prim::Str(s),
                Value::Array(_) | Value::Object(_) => Prim::Composite(value),
            },
        }
    }

    /// Truthiness: absent, null, `false`, `0`, `NaN` and `""` are false.
    pub fn is_truthy(&self) -> bool {
        match self.prim() {
            Prim::Undefined | Prim::Null => false,
            Prim::Bool(b) => b,
            Prim::Number(n) => n != 0.0 && !n.is_nan(),
            Prim::Str(s) => !s.is_empty(),
            Prim::Composite(_) => true,
        }
    }

    /// Numeric coercion. `None` means the operand is not a number.
    ///
    /// Null and blank strings count as zero, booleans as zero or one.
    pub fn to_number(&self) -> Option<f64> {
        match self.prim() {
            Prim::Undefined | Prim::Composite(_) => None,
            Prim::Null => Some(0.0),
            Prim::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Prim::Number(n) => (!n.is_nan()).then_some(n),
            Prim::Str(s) if s.trim().is_empty() => Some(0.0),
            Prim::Str(s) => parse_number(s),
        }
    }

    /// Loose equality.
    ///
    /// - null and undefined equal each other and nothing else
    /// - two strings compare exactly
    /// - arrays and objects compare structurally, and only with each other
    /// - any other pair compares numerically
    pub fn loose_eq(&self, other: &Operand<'_>) -> bool {
        match (self.prim(), other.prim()) {
            (Prim::Undefined | Prim::Null, Prim::Undefined | Prim::Null) => true,
            (Prim::Undefined | Prim::Null, _) | (_, Prim::Undefined | Prim::Null) => false,
            (Prim::Str(a), Prim::Str(b)) => a == b,
            (Prim::Composite(a), Prim::Composite(b)) => a == b,
            (Prim::Composite(_), _) | (_, Prim::Composite(_)) => false,
            _ => match (self.to_number(), other.to_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}
