//! Template resolution: a table of render functions keyed by template path,
//! with Handlebars as the fallback for templates that have no entry.

mod handlebars_template;

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use strata_core::{
    application::{
        ApplicationError,
        ports::{Render, TemplateResolver},
    },
    domain::{RenderArgs, TemplateDescriptor},
    error::StrataResult,
};

pub use handlebars_template::HandlebarsTemplate;

type RenderFn = Arc<dyn Fn(&RenderArgs) -> String + Send + Sync>;

/// Function table keyed by template path relative to the base root, e.g.
/// `packages/nextjs/app/page.template.tsx`.
#[derive(Clone)]
pub struct TemplateRegistry {
    functions: HashMap<String, RenderFn>,
    fallback: bool,
    strict: bool,
}

impl TemplateRegistry {
    /// Empty table; every template is compiled from its source.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            fallback: true,
            strict: false,
        }
    }

    /// Resolve only registered functions; unknown templates are an error.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    /// Fail renders that reference undefined arguments.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn register<F>(mut self, key: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RenderArgs) -> String + Send + Sync + 'static,
    {
        self.functions.insert(key.into(), Arc::new(render));
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver for TemplateRegistry {
    fn resolve(
        &self,
        template: &TemplateDescriptor,
        source: &str,
    ) -> StrataResult<Box<dyn Render>> {
        let key = template.key();
        if let Some(f) = self.functions.get(&key) {
            debug!(%key, "Using registered render function");
            let f = Arc::clone(f);
            return Ok(Box::new(move |args: &RenderArgs| f(args)));
        }

        if !self.fallback {
            return Err(ApplicationError::TemplateMissing { template: key }.into());
        }

        debug!(%key, "Compiling template source");
        Ok(Box::new(HandlebarsTemplate::compile(key, source, self.strict)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn descriptor() -> TemplateDescriptor {
        TemplateDescriptor::from_base(
            Path::new("/base"),
            Path::new("/base/packages/nextjs/foo.template.ts"),
        )
        .unwrap()
    }

    #[test]
    fn registered_function_wins_over_source() {
        let registry = TemplateRegistry::new().register(
            "packages/nextjs/foo.template.ts",
            |args: &RenderArgs| format!("title={}", args.get_str("title").unwrap_or("?")),
        );

        let render = registry.resolve(&descriptor(), "{{ignored}}").unwrap();
        let out = render.render(&RenderArgs::new().with("title", "X")).unwrap();

        assert_eq!(out, "title=X");
    }

    #[test]
    fn falls_back_to_compiling_source() {
        let render = TemplateRegistry::new()
            .resolve(&descriptor(), "export const title = \"{{title}}\";")
            .unwrap();
        let out = render.render(&RenderArgs::new().with("title", "X")).unwrap();
        assert_eq!(out, "export const title = \"X\";");
    }

    #[test]
    fn missing_function_without_fallback_is_an_error() {
        let err = TemplateRegistry::new()
            .without_fallback()
            .resolve(&descriptor(), "")
            .err()
            .unwrap();
        assert!(err.to_string().contains("has no render function"));
    }
}
