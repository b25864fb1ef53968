//! Error types for template compilation and rendering.

use thiserror::Error;

/// Errors that can occur when compiling or rendering a template.
///
/// Structural problems (unknown directives, unbalanced conditionals, bad
/// expressions) are reported by [`Template::compile`](crate::Template::compile).
/// A template that compiles can only fail at render time because of its data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// An `@`-prefixed token that is not a directive, or a directive with
    /// an invalid payload.
    #[error("invalid token `{token}` at line {line}")]
    MalformedDirective { token: String, line: usize },

    /// `@elseif`, `@else` or `@endif` without an open `@if`.
    #[error("`@{directive}` without a matching `@if` at line {line}")]
    UnbalancedConditional { directive: &'static str, line: usize },

    /// `@if` that is never closed by `@endif`.
    #[error("`@if` opened at line {line} is never closed")]
    UnclosedConditional { line: usize },

    /// Condition that cannot be tokenized.
    #[error("invalid expression `{expression}` at line {line}: {reason}")]
    InvalidExpression {
        expression: String,
        reason: String,
        line: usize,
    },

    /// Interpolation key that resolved to nothing under
    /// [`MissingKeys::Error`](crate::MissingKeys::Error).
    #[error("missing value for `{key}` at line {line}")]
    MissingKey { key: String, line: usize },

    /// Template not registered with the engine.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Render data could not be converted into a context.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other error, raised while processing a named template.
    #[error("{source} in template `{name}`")]
    InTemplate {
        name: String,
        #[source]
        source: Box<TemplateError>,
    },
}

impl TemplateError {
    /// Creates an invalid expression error.
    pub fn expression(expression: impl Into<String>, reason: impl Into<String>, line: usize) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
            line,
        }
    }

    /// Attaches a template name to this error.
    ///
    /// Errors that already carry a name are returned unchanged.
    pub fn in_template(self, name: &str) -> Self {
        match self {
            err @ TemplateError::InTemplate { .. } => err,
            err => TemplateError::InTemplate {
                name: name.to_string(),
                source: Box::new(err),
            },
        }
    }

    /// Returns the 1-based source line this error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::MalformedDirective { line, .. }
            | TemplateError::UnbalancedConditional { line, .. }
            | TemplateError::UnclosedConditional { line }
            | TemplateError::InvalidExpression { line, .. }
            | TemplateError::MissingKey { line, .. } => Some(*line),
            TemplateError::InTemplate { source, .. } => source.line(),
            TemplateError::TemplateNotFound(_) | TemplateError::Serialization(_) => None,
        }
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Serialization(err.to_string())
    }
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
