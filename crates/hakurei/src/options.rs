//! Render configuration.

use serde::{Deserialize, Serialize};

/// What to do when an interpolation key resolves to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeys {
    /// Substitute an empty string.
    Ignore,
    /// Substitute an empty string and log a warning.
    #[default]
    Warn,
    /// Fail the render with [`TemplateError::MissingKey`](crate::TemplateError::MissingKey).
    Error,
}

/// Options applied to every render.
///
/// # Example
///
/// ```rust
/// use hakurei::{MissingKeys, RenderOptions};
///
/// let options = RenderOptions::new()
///     .missing_keys(MissingKeys::Error)
///     .trim_output(false);
///
/// assert_eq!(options.missing_keys, MissingKeys::Error);
/// assert!(!options.trim_output);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Policy for interpolation keys with no value.
    pub missing_keys: MissingKeys,
    /// Trim leading and trailing whitespace from the rendered string.
    pub trim_output: bool,
}

impl RenderOptions {
    /// Creates the default options: warn on missing keys, trim output.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing_keys(mut self, policy: MissingKeys) -> Self {
        self.missing_keys = policy;
        self
    }

    pub fn trim_output(mut self, trim: bool) -> Self {
        self.trim_output = trim;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            missing_keys: MissingKeys::default(),
            trim_output: true,
        }
    }
}
