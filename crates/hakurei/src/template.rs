//! Compiled templates.
//!
//! [`Template::compile`] scans the source once, parsing every directive and
//! condition up front. Rendering walks the compiled nodes with state that
//! lives only for the duration of the call:
//!
//! - declared variables
//! - the conditional branch stack
//! - the output buffer
//!
//! Nothing is stored on the [`Template`] between renders, so one compiled
//! template can be rendered any number of times, from any number of threads,
//! and always produces the same output for the same data.

use serde::Serialize;
use serde_json::Value;

use crate::conditional::BranchStack;
use crate::error::{Result, TemplateError};
use crate::interpolate::interpolate_with;
use crate::options::RenderOptions;
use crate::scanner::{Node, NodeKind, Scanner};
use crate::value::Variables;

/// A compiled template.
///
/// # Example
///
/// ```rust
/// use hakurei::Template;
/// use serde_json::json;
///
/// let template = Template::compile(
///     "@if money.wallet > 10\nRich\n@else\nPoor\n@endif",
/// ).unwrap();
///
/// assert_eq!(template.render(&json!({"money": {"wallet": 15}})).unwrap(), "Rich");
/// assert_eq!(template.render(&json!({"money": {"wallet": 5}})).unwrap(), "Poor");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: Option<String>,
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Compiles a template.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown directives, invalid conditions, and
    /// `@elseif`/`@else`/`@endif` that do not match an `@if` (or the reverse).
    pub fn compile(source: impl Into<String>) -> Result<Self> {
        Self::build(None, source.into())
    }

    /// Compiles a template whose errors should mention `name`.
    pub fn compile_named(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        Self::build(Some(name.into()), source.into())
    }

    fn build(name: Option<String>, source: String) -> Result<Self> {
        let nodes = match compile_nodes(&source) {
            Ok(nodes) => nodes,
            Err(err) => return Err(locate(name.as_deref(), err)),
        };

        tracing::debug!(
            name = name.as_deref().unwrap_or("<inline>"),
            nodes = nodes.len(),
            "compiled template"
        );

        Ok(Self {
            name,
            source,
            nodes,
        })
    }

    /// Returns the template name, if it was compiled with one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template with any serializable data and default options.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        self.render_with(data, &RenderOptions::default())
    }

    /// Renders the template with any serializable data.
    pub fn render_with<T: Serialize + ?Sized>(
        &self,
        data: &T,
        options: &RenderOptions,
    ) -> Result<String> {
        let context =
            serde_json::to_value(data).map_err(|e| locate(self.name(), e.into()))?;
        self.render_value_with(&context, options)
    }

    /// Renders the template against a JSON context with default options.
    pub fn render_value(&self, context: &Value) -> Result<String> {
        self.render_value_with(context, &RenderOptions::default())
    }

    /// Renders the template against a JSON context.
    pub fn render_value_with(&self, context: &Value, options: &RenderOptions) -> Result<String> {
        self.run(context, options)
            .map_err(|err| locate(self.name(), err))
    }

    fn run(&self, context: &Value, options: &RenderOptions) -> Result<String> {
        let mut variables = Variables::new();
        let mut branches = BranchStack::new();
        let mut output = String::with_capacity(self.source.len());

        for node in &self.nodes {
            let line = node.line;
            match &node.kind {
                NodeKind::Text(text) => {
                    if branches.is_active() {
                        let text =
                            interpolate_with(context, &variables, text, options.missing_keys, line)?;
                        output.push_str(&text);
                    }
                }
                NodeKind::Var { name, value } => {
                    variables.insert(name.clone(), value.clone());
                }
                NodeKind::If(expr) => {
                    branches.open(expr.evaluate(context, &variables), line);
                }
                NodeKind::ElseIf(expr) => {
                    branches.elseif(line, || expr.evaluate(context, &variables));
                }
                NodeKind::Else => branches.otherwise(line),
                NodeKind::EndIf => branches.close(line),
            }
        }
        debug_assert_eq!(branches.depth(), 0, "compiled templates are balanced");

        tracing::debug!(
            name = self.name().unwrap_or("<inline>"),
            variables = variables.len(),
            bytes = output.len(),
            "rendered template"
        );

        if options.trim_output {
            Ok(output.trim().to_string())
        } else {
            Ok(output)
        }
    }
}

/// Compiles and renders a template in one step.
///
/// ```rust
/// use serde_json::json;
///
/// let out = hakurei::render("@var name Reimu\nHello {{name}}!", &json!({})).unwrap();
/// assert_eq!(out, "Hello Reimu!");
/// ```
pub fn render(source: &str, context: &Value) -> Result<String> {
    Template::compile(source)?.render_value(context)
}

fn locate(name: Option<&str>, err: TemplateError) -> TemplateError {
    match name {
        Some(name) => err.in_template(name),
        None => err,
    }
}

fn compile_nodes(source: &str) -> Result<Vec<Node>> {
    let nodes = Scanner::new(source).collect::<Result<Vec<_>>>()?;
    check_balance(&nodes)?;
    Ok(nodes)
}

/// Verifies that every `@if` chain is opened and closed exactly once.
fn check_balance(nodes: &[Node]) -> Result<()> {
    let mut open: Vec<usize> = Vec::new();

    for node in nodes {
        let directive = match node.kind {
            NodeKind::If(_) => {
                open.push(node.line);
                continue;
            }
            NodeKind::ElseIf(_) => "elseif",
            NodeKind::Else => "else",
            NodeKind::EndIf => "endif",
            NodeKind::Text(_) | NodeKind::Var { .. } => continue,
        };

        if open.is_empty() {
            return Err(TemplateError::UnbalancedConditional {
                directive,
                line: node.line,
            });
        }
        if directive == "endif" {
            open.pop();
        }
    }

    match open.last() {
        Some(&line) => Err(TemplateError::UnclosedConditional { line }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_is_repeatable() {
        let template = Template::compile("@var n 1\n{{ n }} {{ who }}").unwrap();
        let ctx = json!({"who": "Marisa"});
        let first = template.render_value(&ctx).unwrap();
        let second = template.render_value(&ctx).unwrap();
        assert_eq!(first, "1 Marisa");
        assert_eq!(first, second);
    }

    #[test]
    fn test_variables_do_not_leak_between_renders() {
        let template = Template::compile("{{ x }}\n@var x set").unwrap();
        assert_eq!(template.render_value(&json!({})).unwrap(), "");
        assert_eq!(template.render_value(&json!({})).unwrap(), "");
    }

    #[test]
    fn test_trim_option() {
        let template = Template::compile("  Hi\n").unwrap();
        let untrimmed = template
            .render_value_with(&json!({}), &RenderOptions::new().trim_output(false))
            .unwrap();
        assert_eq!(untrimmed, "Hi\n");
        assert_eq!(template.render_value(&json!({})).unwrap(), "Hi");
    }

    #[test]
    fn test_render_serializable() {
        #[derive(Serialize)]
        struct Money {
            wallet: u32,
        }
        #[derive(Serialize)]
        struct Data {
            money: Money,
        }

        let template = Template::compile("@if money.wallet >= 10\nRich\n@endif").unwrap();
        let out = template
            .render(&Data {
                money: Money { wallet: 10 },
            })
            .unwrap();
        assert_eq!(out, "Rich");
    }

    #[test]
    fn test_check_balance() {
        assert_eq!(
            Template::compile("@endif").unwrap_err(),
            TemplateError::UnbalancedConditional {
                directive: "endif",
                line: 1
            }
        );
        assert_eq!(
            Template::compile("A\n@else\nB").unwrap_err(),
            TemplateError::UnbalancedConditional {
                directive: "else",
                line: 2
            }
        );
        assert_eq!(
            Template::compile("@if a\n@if b\n@endif").unwrap_err(),
            TemplateError::UnclosedConditional { line: 1 }
        );
        assert_eq!(
            Template::compile("@if a\n@endif\n@elseif b").unwrap_err(),
            TemplateError::UnbalancedConditional {
                directive: "elseif",
                line: 3
            }
        );
    }

    #[test]
    fn test_named_errors() {
        let err = Template::compile_named("shrine.hk", "@if a").unwrap_err();
        assert_eq!(err.to_string(), "`@if` opened at line 1 is never closed in template `shrine.hk`");
    }

    #[test]
    fn test_accessors() {
        let template = Template::compile_named("t", "Hello").unwrap();
        assert_eq!(template.name(), Some("t"));
        assert_eq!(template.source(), "Hello");
        assert_eq!(Template::compile("x").unwrap().name(), None);
    }

    #[test]
    fn test_template_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Template>();
    }
}
