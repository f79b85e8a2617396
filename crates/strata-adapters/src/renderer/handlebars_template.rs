//! Handlebars-backed render functions compiled from template source.

use handlebars::{Handlebars, no_escape};

use strata_core::{
    application::{ApplicationError, ports::Render},
    domain::RenderArgs,
    error::StrataResult,
};

/// A single compiled template.
///
/// Output is not HTML-escaped: templates produce source code and config
/// files.
pub struct HandlebarsTemplate {
    name: String,
    hbs: Handlebars<'static>,
}

impl HandlebarsTemplate {
    /// Compile `source`. Syntax errors surface here, not at render time.
    pub fn compile(name: impl Into<String>, source: &str, strict: bool) -> StrataResult<Self> {
        let name = name.into();
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(no_escape);
        hbs.set_strict_mode(strict);
        hbs.register_template_string(&name, source)
            .map_err(|e| ApplicationError::TemplateInvalid {
                template: name.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { name, hbs })
    }
}

impl Render for HandlebarsTemplate {
    fn render(&self, args: &RenderArgs) -> StrataResult<String> {
        self.hbs.render(&self.name, args).map_err(|e| {
            ApplicationError::RenderingFailed {
                template: self.name.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
