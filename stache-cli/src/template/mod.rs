//! Mustache templates
//!
//! Templates render against a [`serde_json::Value`]:
//!
//! - `{{name}}` interpolates with HTML escaping; `{{{name}}}` and `{{& name}}`
//!   interpolate raw.
//! - `{{#name}}` repeats its body for each item of a list, renders it once
//!   inside an object or other truthy value, and skips it for `null`,
//!   `false`, `0`, `""` and `[]`. `{{^name}}` renders only in those cases.
//! - Names resolve in the innermost section value first and then walk
//!   outward. `{{.}}` is the current value and dotted names descend.
//! - `{{> name}}` includes a partial. An unknown partial renders nothing.
//! - `{{! comments }}` and `{{=<% %>=}}` delimiter changes are supported.
//!   Section, comment and partial tags alone on a line remove that line.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stache::template::{Partials, Template};
//!
//! # fn main() -> Result<(), stache::template::TemplateError> {
//! let template = Template::parse("{{#items}}<li>{{.}}</li>{{/items}}{{^items}}none{{/items}}")?;
//! let partials = Partials::default();
//!
//! assert_eq!(
//!     template.render(&json!({"items": ["a", "b"]}), &partials)?,
//!     "<li>a</li><li>b</li>"
//! );
//! assert_eq!(template.render(&json!({"items": []}), &partials)?, "none");
//! # Ok(())
//! # }
//! ```

mod context;
mod parser;

use std::collections::HashMap;

use handlebars::html_escape;
use serde_json::Value;
use thiserror::Error;

use context::Context;
use parser::Node;

/// Nesting limit for partials including partials
pub const MAX_PARTIAL_DEPTH: usize = 100;

/// Template parse and render failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A tag was opened but its closing delimiter never appears
    #[error("unclosed tag on line {line}")]
    UnclosedTag {
        /// Line of the opening delimiter
        line: usize,
    },

    /// A section was opened but never closed
    #[error("unclosed section '{name}' opened on line {line}")]
    UnclosedSection {
        /// Section name
        name: String,
        /// Line of the opening tag
        line: usize,
    },

    /// A closing tag has no open section
    #[error("unopened section '{name}' closed on line {line}")]
    UnopenedSection {
        /// Section name
        name: String,
        /// Line of the closing tag
        line: usize,
    },

    /// A closing tag names a different section than the one open
    #[error("section '{open}' closed by '{close}' on line {line}")]
    MismatchedSection {
        /// Innermost open section
        open: String,
        /// Name in the closing tag
        close: String,
        /// Line of the closing tag
        line: usize,
    },

    /// A delimiter change is not two whitespace-separated delimiters
    #[error("invalid delimiters '{spec}' on line {line}")]
    InvalidDelimiters {
        /// Tag content
        spec: String,
        /// Line of the tag
        line: usize,
    },

    /// An included partial failed to parse
    #[error("in partial '{name}'")]
    Partial {
        /// Partial name
        name: String,
        /// Parse failure inside the partial
        #[source]
        source: Box<TemplateError>,
    },

    /// Partials nest deeper than [`MAX_PARTIAL_DEPTH`]
    #[error("partial '{name}' nested too deeply")]
    PartialDepth {
        /// Partial that exceeded the limit
        name: String,
    },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for unclosed tags, unbalanced sections or
    /// invalid delimiter changes.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        parser::parse(source).map(|nodes| Self { nodes })
    }

    /// Render against `data`, taking `{{> name}}` from `partials`
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Partial`] if an included partial does not
    /// parse, or [`TemplateError::PartialDepth`] for runaway recursion.
    pub fn render(&self, data: &Value, partials: &Partials) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut context = Context::new(data);
        render_nodes(&self.nodes, &mut context, partials, 0, &mut out)?;
        Ok(out)
    }
}

/// Partials available to `{{> name}}`, parsed once
#[derive(Debug, Default)]
pub struct Partials {
    entries: HashMap<String, Partial>,
}

#[derive(Debug)]
struct Partial {
    source: String,
    parsed: Result<Template, TemplateError>,
}

impl Partials {
    /// Parse every `(name, source)` pair in `sources`
    ///
    /// A partial that does not parse only fails templates that include it.
    #[must_use]
    pub fn new<'s>(sources: impl IntoIterator<Item = (&'s String, &'s String)>) -> Self {
        let entries = sources
            .into_iter()
            .map(|(name, source)| {
                let partial = Partial {
                    source: source.clone(),
                    parsed: Template::parse(source),
                };
                (name.clone(), partial)
            })
            .collect();

        Self { entries }
    }

    fn render_into<'a>(
        &self,
        name: &str,
        indent: &str,
        indent_first_line: bool,
        context: &mut Context<'a>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        let Some(partial) = self.entries.get(name) else {
            return Ok(());
        };
        if depth >= MAX_PARTIAL_DEPTH {
            return Err(TemplateError::PartialDepth {
                name: name.to_string(),
            });
        }

        let indented;
        let template = if indent.is_empty() {
            partial
                .parsed
                .as_ref()
                .map_err(|source| partial_error(name, source.clone()))?
        } else {
            let source = indent_lines(&partial.source, indent, indent_first_line);
            indented = Template::parse(&source).map_err(|source| partial_error(name, source))?;
            &indented
        };

        render_nodes(&template.nodes, context, self, depth + 1, out)
    }
}

fn partial_error(name: &str, source: TemplateError) -> TemplateError {
    TemplateError::Partial {
        name: name.to_string(),
        source: Box::new(source),
    }
}

fn indent_lines(source: &str, indent: &str, indent_first_line: bool) -> String {
    source
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if !line.is_empty() && (i > 0 || indent_first_line) {
                format!("{indent}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_nodes<'a>(
    nodes: &[Node],
    context: &mut Context<'a>,
    partials: &Partials,
    depth: usize,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, escape } => {
                if let Some(value) = context.lookup(name) {
                    let text = context::display(value);
                    if *escape {
                        out.push_str(&html_escape(&text));
                    } else {
                        out.push_str(&text);
                    }
                }
            }
            Node::Section {
                name,
                inverted: false,
                children,
            } => match context.lookup(name) {
                Some(Value::Array(items)) => {
                    for item in items {
                        context.push(item);
                        render_nodes(children, context, partials, depth, out)?;
                        context.pop();
                    }
                }
                Some(Value::Bool(true)) => render_nodes(children, context, partials, depth, out)?,
                Some(value) if context::is_truthy(value) => {
                    context.push(value);
                    render_nodes(children, context, partials, depth, out)?;
                    context.pop();
                }
                _ => {}
            },
            Node::Section {
                name,
                inverted: true,
                children,
            } => {
                if !context.lookup(name).is_some_and(context::is_truthy) {
                    render_nodes(children, context, partials, depth, out)?;
                }
            }
            Node::Partial {
                name,
                indent,
                indent_first_line,
            } => partials.render_into(name, indent, *indent_first_line, context, depth, out)?,
        }
    }
    Ok(())
}
