//! Property-based tests for rendering using proptest.

use hakurei::{render, Template};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies
// ============================================================================

/// Plain words: no directive, escape or brace characters.
fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]"
}

fn lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..8)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A single plain line renders as itself.
    #[test]
    fn plain_text_passes_through(text in word()) {
        prop_assert_eq!(render(&text, &json!({}))?, text);
    }

    /// Plain lines keep their order and separators.
    #[test]
    fn plain_lines_pass_through(lines in lines()) {
        let source = lines.join("\n");
        prop_assert_eq!(render(&source, &json!({}))?, source);
    }

    /// Anything inside a false outer block produces no output.
    #[test]
    fn false_block_is_silent(lines in lines(), inner in any::<bool>()) {
        let source = format!(
            "@if false\n{}\n@if {}\n{}\n@endif\n@endif",
            lines.join("\n"),
            inner,
            lines.join("\n"),
        );
        prop_assert_eq!(render(&source, &json!({}))?, "");
    }

    /// A declared variable interpolates to its own value.
    #[test]
    fn var_round_trip(name in "[a-z]{1,8}", value in "[a-z]{1,12}") {
        let source = format!("@var {} {}\n{{{{ {} }}}}", name, value, name);
        prop_assert_eq!(render(&source, &json!({}))?, value);
    }

    /// Numeric comparisons agree with Rust's.
    #[test]
    fn comparisons_match_integers(a in any::<i32>(), b in any::<i32>()) {
        let ctx = json!({"a": a, "b": b});
        for (op, expected) in [
            (">", a > b),
            (">=", a >= b),
            ("<", a < b),
            ("<=", a <= b),
            ("==", a == b),
            ("!=", a != b),
        ] {
            let source = format!("@if a {} b\nyes\n@else\nno\n@endif", op);
            let out = render(&source, &ctx)?;
            prop_assert_eq!(out == "yes", expected, "a {} b", op);
        }
    }

    /// Comparing against a literal behaves like comparing against context.
    #[test]
    fn literal_right_operand(a in -1000i64..1000, b in -1000i64..1000) {
        let source = format!("@if a > {}\nyes\n@endif", b);
        let out = render(&source, &json!({"a": a}))?;
        prop_assert_eq!(out == "yes", a > b);
    }

    /// Renders of one compiled template are identical.
    #[test]
    fn renders_are_deterministic(lines in lines(), flag in any::<bool>()) {
        let source = format!("@if flag\n{}\n@else\nnope\n@endif", lines.join("\n"));
        let template = Template::compile(source)?;
        let ctx = json!({"flag": flag});
        prop_assert_eq!(template.render(&ctx)?, template.render(&ctx)?);
    }

    /// Exactly one arm of an if/elseif/else chain is emitted.
    #[test]
    fn exactly_one_arm(n in 0u32..30) {
        let source = "@if n < 10\nlow\n@elseif n < 20\nmid\n@else\nhigh\n@endif";
        let out = render(source, &json!({"n": n}))?;
        let expected = if n < 10 { "low" } else if n < 20 { "mid" } else { "high" };
        prop_assert_eq!(out, expected);
    }
}
