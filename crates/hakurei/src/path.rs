//! Dotted path lookup into a render context.
//!
//! Paths are resolved segment by segment against a [`serde_json::Value`]:
//!
//! - Object keys: `user.profile.name`
//! - Array indices: `items.0` or `items.0.name`
//!
//! Empty segments are discarded, so `a..b` and `.a.b` behave like `a.b`.
//! A missing segment is not an error; resolution simply yields `None`.

use serde_json::Value;

/// Resolves a dotted path in a JSON value.
///
/// # Example
///
/// ```rust
/// use hakurei::path::resolve;
/// use serde_json::json;
///
/// let data = json!({"a": {"b": "x"}});
/// assert_eq!(resolve(&data, "a.b"), Some(&json!("x")));
/// assert_eq!(resolve(&data, "a.c"), None);
/// ```
pub fn resolve<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    walk(context, path.split('.'))
}

/// Resolves a path that has already been split into segments.
pub fn resolve_segments<'a, S: AsRef<str>>(context: &'a Value, segments: &[S]) -> Option<&'a Value> {
    walk(context, segments.iter().map(AsRef::as_ref))
}

/// Resolves a path, substituting `default` when the value is absent or null.
pub fn resolve_or<'a>(context: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    match resolve(context, path) {
        None | Some(Value::Null) => default,
        Some(value) => value,
    }
}

/// Returns `true` if a value (including `null`) exists at `path`.
pub fn has_path(context: &Value, path: &str) -> bool {
    resolve(context, path).is_some()
}

fn walk<'a, 'p>(context: &'a Value, segments: impl Iterator<Item = &'p str>) -> Option<&'a Value> {
    let mut current = context;
    let mut any = false;

    for part in segments.filter(|s| !s.is_empty()) {
        any = true;
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }

    // A path with no segments names nothing.
    any.then_some(current)
}
