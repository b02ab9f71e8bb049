//! MiniJinja template engine wrapper

use crate::types::Query;
use anyhow::{Context, Result};
use minijinja::{context, Environment, Value};
use std::path::Path;

pub const PROMPT_TEMPLATE: &str = "prompt.txt";
pub const INDEX_TEMPLATE: &str = "index.html";

const EMBEDDED_PROMPT: &str = include_str!("../../web/templates/prompt.txt");
const EMBEDDED_INDEX: &str = include_str!("../../web/templates/index.html");

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Engine with the built-in page and prompt templates.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();

        // Configure MiniJinja
        env.set_debug(cfg!(debug_assertions));
        env.add_template(PROMPT_TEMPLATE, EMBEDDED_PROMPT)?;
        env.add_template(INDEX_TEMPLATE, EMBEDDED_INDEX)?;

        Ok(Self { env })
    }

    /// Engine whose prompt template is read from `path` instead of the built-in one.
    pub fn with_prompt_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading prompt template {}", path.display()))?;
        let mut engine = Self::new()?;
        engine.add_template_owned(PROMPT_TEMPLATE.to_string(), content)?;
        tracing::info!("Loaded prompt template from {}", path.display());
        Ok(engine)
    }

    /// Render a template with context
    pub fn render(&self, template_name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(template_name)?.render(ctx)
    }

    /// Add a template from string - requires owned strings for 'static lifetime
    pub fn add_template_owned(&mut self, name: String, content: String) -> Result<()> {
        // Templates are registered once at startup, so leaking them is bounded
        let name_static: &'static str = Box::leak(name.into_boxed_str());
        let content_static: &'static str = Box::leak(content.into_boxed_str());
        self.env.add_template(name_static, content_static)?;
        Ok(())
    }

    pub fn add_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.add_template_owned(name.to_string(), content.to_string())
    }

    /// Wrap a query in the instructional prompt.
    pub fn render_prompt(&self, query: &Query) -> Result<String, minijinja::Error> {
        self.render(PROMPT_TEMPLATE, context! { query => query.as_str() })
    }

    /// Render the single-page front-end
    pub fn render_index(&self, model: &str) -> Result<String, minijinja::Error> {
        self.render(INDEX_TEMPLATE, context! {
            title => "Project Idea Generator",
            model => model,
            version => env!("CARGO_PKG_VERSION"),
        })
    }
}
