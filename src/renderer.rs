//! Template rendering for generoo.
//! Evaluates parsed templates against an [`Environment`]: variables are
//! substituted verbatim and sections are included or dropped by truthiness.
use log::trace;
use serde::Deserialize;

use crate::config::RenderOptions;
use crate::context::Environment;
use crate::error::{Error, Result};
use crate::parser::{Node, Parser, Span, Template};
use crate::path;

/// What happens when a tag names something the environment does not define.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Fail with `Error::MissingVariableError`
    #[default]
    Strict,
    /// Render the variable as an empty string and treat the section as falsy
    Lenient,
}

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a content template.
    ///
    /// # Arguments
    /// * `name` - Identifier of the template used in error messages
    /// * `template` - Template string to render
    /// * `env` - Variables and flags for rendering
    fn render(&self, name: &str, template: &str, env: &Environment) -> Result<String>;

    /// Renders a `/`-separated path template. `Ok(None)` means a gated
    /// segment excluded the path.
    fn render_path(&self, template: &str, env: &Environment) -> Result<Option<String>>;
}

/// The section evaluator: parses with a [`Parser`] and renders nodes under a
/// [`MissingPolicy`].
#[derive(Debug, Clone, Default)]
pub struct SectionRenderer {
    parser: Parser,
    policy: MissingPolicy,
}

impl SectionRenderer {
    pub fn new(parser: Parser, policy: MissingPolicy) -> Self {
        Self { parser, policy }
    }

    /// Builds a renderer from configuration options.
    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        let parser = Parser::new(options.delimiters()?, options.max_depth);
        Ok(Self::new(parser, options.missing))
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    /// Renders an already parsed template.
    pub fn render_template(&self, template: &Template, env: &Environment) -> Result<String> {
        let mut out = String::new();
        self.render_nodes(&template.name, &template.nodes, env, &mut out)?;
        Ok(out)
    }

    /// Decides whether a section's body is rendered.
    ///
    /// An inverted section over an undefined name is always open, whatever the
    /// policy: absence is exactly what it tests for.
    pub fn section_is_open(
        &self,
        template: &str,
        name: &str,
        negated: bool,
        span: Span,
        env: &Environment,
    ) -> Result<bool> {
        match (env.truthiness(name), negated) {
            (Some(truthy), negated) => Ok(truthy != negated),
            (None, true) => Ok(true),
            (None, false) => match self.policy {
                MissingPolicy::Strict => Err(missing(template, name, span)),
                MissingPolicy::Lenient => Ok(false),
            },
        }
    }

    fn render_nodes(
        &self,
        template: &str,
        nodes: &[Node],
        env: &Environment,
        out: &mut String,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Literal(text) => out.push_str(text),
                Node::Variable { name, span, .. } => match env.value(name) {
                    Some(value) => out.push_str(&value),
                    None if self.policy == MissingPolicy::Lenient => {
                        trace!("'{template}': '{name}' is undefined, rendering it empty");
                    }
                    None => return Err(missing(template, name, *span)),
                },
                Node::Section { name, negated, body, span } => {
                    if self.section_is_open(template, name, *negated, *span, env)? {
                        self.render_nodes(template, body, env, out)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl TemplateRenderer for SectionRenderer {
    fn render(&self, name: &str, template: &str, env: &Environment) -> Result<String> {
        let parsed = self.parser.parse(name, template)?;
        self.render_template(&parsed, env)
    }

    fn render_path(&self, template: &str, env: &Environment) -> Result<Option<String>> {
        path::render_path(self, template, env)
    }
}

fn missing(template: &str, name: &str, span: Span) -> Error {
    Error::MissingVariableError {
        template: template.to_string(),
        name: name.to_string(),
        line: span.line,
        column: span.column,
    }
}
