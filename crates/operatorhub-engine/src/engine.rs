//! Template engine based on MiniJinja

use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

use crate::error::{EngineError, Result, TemplateError};
use crate::filters;
use crate::functions;

/// The template engine
///
/// Undefined variables are errors, so a typo in a template never renders as an
/// empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();

        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        env.add_filter("toyaml", filters::toyaml);
        env.add_filter("tojson", filters::tojson);
        env.add_filter("quote", filters::quote);
        env.add_filter("squote", filters::squote);
        env.add_filter("indent", filters::indent);
        env.add_filter("nindent", filters::nindent);
        env.add_filter("required", filters::required);
        env.add_filter("trimprefix", filters::trimprefix);
        env.add_filter("trimsuffix", filters::trimsuffix);
        env.add_filter("trunc", filters::trunc);
        env.add_filter("b64encode", filters::b64encode);
        env.add_filter("sha256", filters::sha256sum);

        env.add_function("fail", functions::fail);
        env.add_function("dict", functions::dict);
        env.add_function("list", functions::list);
        env.add_function("coalesce", functions::coalesce);
        env.add_function("ternary", functions::ternary);
        env.add_function("now", functions::now);

        env
    }

    /// Render a template string; the fields of `context` become top-level variables
    pub fn render_string<C: Serialize>(
        &self,
        template: &str,
        context: &C,
        template_name: &str,
    ) -> Result<String> {
        let mut env = self.create_environment();

        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template))?;

        let tmpl = env
            .get_template(template_name)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template))?;

        tmpl.render(context)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template).into())
    }

    /// Read and render a template file
    pub fn render_file<C: Serialize>(&self, template_path: &Path, context: &C) -> Result<String> {
        let source =
            std::fs::read_to_string(template_path).map_err(|source| EngineError::ReadTemplate {
                path: template_path.to_path_buf(),
                source,
            })?;

        let name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| template_path.display().to_string());

        self.render_string(&source, context, &name)
    }
}
