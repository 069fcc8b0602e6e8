//! Jinja rendering
//!
//! Thin wrapper over a minijinja [`Environment`] configured to behave like
//! Jinja2's `Template(source).render(...)`: a single trailing newline of the
//! template is dropped and undefined variables render as nothing, unless the
//! options say otherwise.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::{debug, info};

use crate::bindings::Bindings;
use crate::error::{GenerateError, GenerateResult};

/// Knobs that change how a template is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Keep the template's final newline in the output
    pub keep_trailing_newline: bool,

    /// Fail on undefined variables instead of rendering them empty
    pub strict_undefined: bool,
}

/// Renders template text against a binding set
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        debug!(?options, "Renderer::new: called");
        Self { options }
    }

    // Templates are compiled straight from borrowed text, so the environment
    // lives no longer than the source it renders.
    fn environment<'source>(&self) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(self.options.keep_trailing_newline);
        env.set_undefined_behavior(if self.options.strict_undefined {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        // Output is YAML text, not markup: never escape
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env
    }

    /// Render `source` with `bindings`
    ///
    /// `name` only shows up in error messages.
    pub fn render(&self, name: &str, source: &str, bindings: &Bindings) -> GenerateResult<String> {
        debug!(%name, source_len = source.len(), vars = bindings.len(), "Renderer::render: called");
        let env = self.environment();

        let template = env
            .template_from_named_str(name, source)
            .map_err(|source| GenerateError::TemplateSyntax {
                name: name.to_string(),
                source,
            })?;

        let rendered = template.render(bindings).map_err(|source| GenerateError::Render {
            name: name.to_string(),
            source,
        })?;

        info!("Rendered template '{}' ({} bytes)", name, rendered.len());
        Ok(rendered)
    }
}
