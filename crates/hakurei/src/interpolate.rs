//! `{{ key }}` substitution inside text runs.
//!
//! Keys are looked up in the declared variables first and then as a dotted
//! path in the render context. A backslash makes the next character literal,
//! so `\{{ name }}` is output as `{{ name }}` without substitution. An
//! unterminated `{{`, an empty `{{ }}` marker, or a marker with a `{` before
//! its closing `}}` is left as text.

use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::options::MissingKeys;
use crate::path;
use crate::value::{Scalar, Variables};

/// Replaces every `{{ key }}` marker in `text`.
///
/// Missing keys become empty strings.
///
/// ```rust
/// use hakurei::{interpolate, Variables};
/// use serde_json::json;
///
/// let ctx = json!({"a": {"b": "x"}});
/// assert_eq!(interpolate(&ctx, &Variables::new(), "[{{ a.b }}]"), "[x]");
/// assert_eq!(interpolate(&json!({}), &Variables::new(), "[{{ a.b }}]"), "[]");
/// ```
pub fn interpolate(context: &Value, variables: &Variables, text: &str) -> String {
    // Ignore never produces an error.
    interpolate_with(context, variables, text, MissingKeys::Ignore, 0).unwrap_or_default()
}

/// Replaces every `{{ key }}` marker, applying `policy` to missing keys.
///
/// `line` is the source line of `text`, used for diagnostics.
pub(crate) fn interpolate_with(
    context: &Value,
    variables: &Variables,
    text: &str,
    policy: MissingKeys,
    line: usize,
) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => result.push(escaped),
                None => result.push('\\'),
            },
            '{' if text[at..].starts_with("{{") => {
                let inner = at + 2;
                let Some(len) = marker_len(&text[inner..]) else {
                    result.push(ch);
                    continue;
                };
                let end = inner + len + 2;
                let key = text[inner..inner + len].trim();

                if key.is_empty() {
                    result.push_str(&text[at..end]);
                } else {
                    match lookup(context, variables, key) {
                        Some(value) => result.push_str(&value),
                        None => missing(key, policy, line)?,
                    }
                }

                while chars.peek().is_some_and(|&(i, _)| i < end) {
                    chars.next();
                }
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}

/// Length of the key before the closing `}}`. Keys cannot contain `{`.
fn marker_len(rest: &str) -> Option<usize> {
    let close = rest.find("}}")?;
    match rest.find('{') {
        Some(open) if open < close => None,
        _ => Some(close),
    }
}

fn lookup(context: &Value, variables: &Variables, key: &str) -> Option<String> {
    if let Some(scalar) = variables.get(key) {
        return Some(scalar.to_string());
    }
    path::resolve(context, key).map(format_value)
}

fn missing(key: &str, policy: MissingKeys, line: usize) -> Result<()> {
    match policy {
        MissingKeys::Ignore => Ok(()),
        MissingKeys::Warn => {
            tracing::warn!(key, line, "no value for interpolation key");
            Ok(())
        }
        MissingKeys::Error => Err(TemplateError::MissingKey {
            key: key.to_string(),
            line,
        }),
    }
}

/// Formats a JSON value as a string for output.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Float-typed numbers use the same shortest form as `@var` values.
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => Scalar::Number(f).to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
