//! Hakurei - a small directive-driven text template engine.
//!
//! Templates are plain text with three additions:
//!
//! - line directives starting with `#` (comments) or `@` (`@var`, `@if`,
//!   `@elseif`, `@else`, `@endif`)
//! - `{{ key }}` interpolation markers, resolved against declared variables
//!   and then the render context
//! - backslash escapes (`\@`, `\{`, `\}`) for literal characters
//!
//! # Quick Start
//!
//! ```rust
//! use hakurei::Template;
//! use serde_json::json;
//!
//! let template = Template::compile(
//!     "# greeting card\n\
//!      @var name Reimu\n\
//!      Hello {{ name }}!\n\
//!      @if money.wallet > 10\n\
//!      You look rich today.\n\
//!      @elseif money.wallet > 0\n\
//!      Donations welcome.\n\
//!      @else\n\
//!      The shrine is broke.\n\
//!      @endif",
//! ).unwrap();
//!
//! let output = template.render(&json!({"money": {"wallet": 3}})).unwrap();
//! assert_eq!(output, "Hello Reimu!\nDonations welcome.");
//! ```
//!
//! # Directives
//!
//! | Directive | Form | Behavior |
//! |-----------|------|----------|
//! | Comment | `# text` | line ignored |
//! | Variable | `@var name value` | declares `name`; numeric values become numbers; not gated by conditionals |
//! | If | `@if expression` | opens a conditional chain |
//! | ElseIf | `@elseif expression` | next arm, only if no earlier arm was taken |
//! | Else | `@else` | final arm |
//! | EndIf | `@endif` | closes the chain |
//!
//! Conditions take a single operand (`@if enabled`) or two operands joined by
//! one of `>=`, `<=`, `==`, `!=`, `&&`, `||`, `>`, `<`, or a unary `!`.
//! See [`Expr`] for the resolution rules.
//!
//! # Rendering
//!
//! A [`Template`] is compiled once and rendered many times. Each render
//! starts from empty variables and an empty conditional stack, so renders
//! are independent and a template can be shared across threads. The output
//! is trimmed unless [`RenderOptions::trim_output`] is disabled.
//!
//! For applications with several templates, [`Engine`] keeps them by name.

pub mod path;

mod conditional;
mod engine;
mod error;
mod expr;
mod interpolate;
mod op;
mod options;
mod scanner;
mod template;
mod value;

// Re-export public API
pub use engine::Engine;
pub use error::{Result, TemplateError};
pub use expr::Expr;
pub use interpolate::interpolate;
pub use op::Op;
pub use options::{MissingKeys, RenderOptions};
pub use template::{render, Template};
pub use value::{Operand, Scalar, Variables};
