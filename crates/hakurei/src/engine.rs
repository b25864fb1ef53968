//! Named template registry.
//!
//! [`Engine`] pairs a set of [`RenderOptions`] with templates compiled under
//! a name, so an application can register its templates once at startup and
//! render them by name afterwards. Errors from named templates carry the
//! template name.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Result, TemplateError};
use crate::options::RenderOptions;
use crate::template::Template;

/// A collection of compiled templates sharing one set of render options.
///
/// # Example
///
/// ```rust
/// use hakurei::Engine;
/// use serde_json::json;
///
/// let mut engine = Engine::new();
/// engine.add_template("greeting", "Hello, {{ name }}!").unwrap();
///
/// let output = engine.render_named("greeting", &json!({"name": "World"})).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: RenderOptions,
    templates: HashMap<String, Template>,
}

impl Engine {
    /// Creates an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            templates: HashMap::new(),
        }
    }

    /// Returns the options applied to every render.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Compiles and registers a template, replacing any previous one with
    /// the same name.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        let template = Template::compile_named(name, source)?;
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    /// Checks if a template with the given name exists.
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Returns a registered template.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Renders a previously registered template.
    pub fn render_named<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_string()))?;
        template.render_with(data, &self.options)
    }

    /// Compiles and renders an unregistered template.
    pub fn render_template<T: Serialize + ?Sized>(&self, source: &str, data: &T) -> Result<String> {
        Template::compile(source)?.render_with(data, &self.options)
    }
}
