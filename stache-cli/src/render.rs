//! Template rendering
//!
//! Every template in a run shares one [`Renderer`], which holds the parsed
//! partials. See [`crate::template`] for the supported mustache syntax.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::BuildConfig;
use crate::data::{load_template_data, with_version};
use crate::error::{Error, Result};
use crate::output::{resolve_output_path, write_output};
use crate::partials::PartialMap;
use crate::template::{Partials, Template};

/// Template renderer with the run's partials parsed
pub struct Renderer {
    partials: Partials,
}

impl Renderer {
    /// Create a renderer over every partial in `partials`
    #[must_use]
    pub fn new(partials: &PartialMap) -> Self {
        Self {
            partials: Partials::new(partials),
        }
    }

    /// Render template text against `data`
    ///
    /// `path` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the template, or a partial it includes,
    /// does not parse.
    pub fn render(&self, path: &Path, template: &str, data: &Value) -> Result<String> {
        Template::parse(template)
            .and_then(|template| template.render(data, &self.partials))
            .map_err(|source| Error::Render {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Result of rendering one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedTemplate {
    /// Rendered text, when no output directory is configured
    Text(String),
    /// Path the rendered text was written to
    Written(PathBuf),
}

/// Read, render and optionally write one template
///
/// The template text and its `mustache.json` data are read concurrently. A
/// configured bust token replaces any `version` in the data.
///
/// # Errors
///
/// Returns an error if the template cannot be read, rendered or written.
pub async fn render_template(
    path: &Path,
    renderer: &Renderer,
    config: &BuildConfig,
) -> Result<RenderedTemplate> {
    let (template, data) = tokio::join!(
        tokio::fs::read_to_string(path),
        load_template_data(path)
    );
    let template = template.map_err(|source| Error::read(path, source))?;

    let data = with_version(&data, config.bust());
    let rendered = renderer.render(path, &template, &data)?;

    let Some(output_dir) = config.output_dir() else {
        tracing::debug!(template = %path.display(), "rendered template");
        return Ok(RenderedTemplate::Text(rendered));
    };

    let output_path = resolve_output_path(path, config.template_pattern(), output_dir);
    write_output(&output_path, &rendered).await?;

    tracing::debug!(
        template = %path.display(),
        output = %output_path.display(),
        "wrote template"
    );
    Ok(RenderedTemplate::Written(output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateError;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn renderer_with(partials: &[(&str, &str)]) -> Renderer {
        let map: PartialMap = partials
            .iter()
            .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
            .collect();
        Renderer::new(&map)
    }

    #[test]
    fn test_interpolation_escapes_html() {
        let renderer = renderer_with(&[]);
        let out = renderer
            .render(
                Path::new("t"),
                "<p>{{name}}</p>",
                &json!({"name": "<b>Tom</b>"}),
            )
            .unwrap();
        assert_eq!(out, "<p>&lt;b&gt;Tom&lt;/b&gt;</p>");
    }

    #[test]
    fn test_triple_mustache_is_raw() {
        let renderer = renderer_with(&[]);
        let out = renderer
            .render(Path::new("t"), "{{{html}}}", &json!({"html": "<b>x</b>"}))
            .unwrap();
        assert_eq!(out, "<b>x</b>");
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let renderer = renderer_with(&[]);
        let out = renderer.render(Path::new("t"), "[{{nothing}}]", &json!({})).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_partial_inclusion() {
        let renderer = renderer_with(&[("inlineJs", "<script>var a=1;</script>")]);

        let out = renderer
            .render(Path::new("t"), "<head>{{> inlineJs}}</head>", &json!({}))
            .unwrap();
        assert_eq!(out, "<head><script>var a=1;</script></head>");
    }

    #[test]
    fn test_partial_sees_caller_data() {
        let renderer = renderer_with(&[("greeting", "Hi {{name}}")]);
        let out = renderer
            .render(Path::new("t"), "{{> greeting}}!", &json!({"name": "Ada"}))
            .unwrap();
        assert_eq!(out, "Hi Ada!");
    }

    #[test]
    fn test_syntax_error_is_render_error() {
        let renderer = renderer_with(&[]);
        let result = renderer.render(
            Path::new("broken.mustache"),
            "{{#open}}never closed",
            &json!({}),
        );
        assert!(matches!(
            result,
            Err(Error::Render {
                source: TemplateError::UnclosedSection { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_partial_fails_where_included() {
        let renderer = renderer_with(&[("bad", "{{#open}}")]);

        assert_eq!(
            renderer.render(Path::new("t"), "ok", &json!({})).unwrap(),
            "ok"
        );
        let result = renderer.render(Path::new("t"), "{{> bad}}", &json!({}));
        assert!(matches!(
            result,
            Err(Error::Render {
                source: TemplateError::Partial { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_missing_partial_renders_empty() {
        let renderer = renderer_with(&[]);
        let out = renderer
            .render(Path::new("t"), "a{{> footer.html}}b", &json!({}))
            .unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_sections() {
        let renderer = renderer_with(&[]);
        let data = json!({
            "version": "c0ffee",
            "user": {"name": "Ada"},
            "show": true,
            "hide": false,
            "items": [{"name": "a"}, {"name": "b"}],
            "list": ["x", "y"],
            "none": [],
        });
        let cases = [
            ("{{#items}}<{{name}}>{{/items}}", "<a><b>"),
            ("{{#user}}{{name}}{{/user}}", "Ada"),
            ("{{#show}}yes{{/show}}", "yes"),
            ("{{#hide}}yes{{/hide}}", ""),
            ("{{^none}}none{{/none}}", "none"),
            ("{{^missing}}none{{/missing}}", "none"),
            ("{{^hide}}none{{/hide}}", "none"),
            ("{{^items}}none{{/items}}", ""),
            ("{{#list}}[{{.}}]{{/list}}", "[x][y]"),
            ("{{#items}}{{version}}{{/items}}", "c0ffeec0ffee"),
        ];

        for (template, expected) in cases {
            let out = renderer.render(Path::new("t"), template, &data).unwrap();
            assert_eq!(out, expected, "{template}");
        }
    }

    #[tokio::test]
    async fn test_render_template_to_text_with_bust() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.html"), "v={{version}}").unwrap();
        fs::write(dir.path().join("mustache.json"), r#"{"version": "mine"}"#).unwrap();
        let pattern = format!("{}/*.html", dir.path().display());
        let config = BuildConfig::new(pattern)
            .unwrap()
            .with_bust(Some("deadbeef".to_string()));

        let rendered =
            render_template(&dir.path().join("page.html"), &renderer_with(&[]), &config)
                .await
                .unwrap();

        assert_eq!(rendered, RenderedTemplate::Text("v=deadbeef".to_string()));
    }

    #[tokio::test]
    async fn test_render_template_writes_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/home.html"), "Hello {{name}}").unwrap();
        fs::write(dir.path().join("pages/mustache.json"), r#"{"name": "World"}"#).unwrap();
        let pattern = format!("{}/pages/*.html", dir.path().display());
        let dist = dir.path().join("dist");
        let config = BuildConfig::new(pattern)
            .unwrap()
            .with_output_dir(Some(dist.clone()));

        let page = dir.path().join("pages/home.html");
        let rendered = render_template(&page, &renderer_with(&[]), &config)
            .await
            .unwrap();

        assert_eq!(rendered, RenderedTemplate::Written(dist.join("home.html")));
        assert_eq!(fs::read_to_string(dist.join("home.html")).unwrap(), "Hello World");
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig::new("*.html").unwrap();

        let gone = dir.path().join("gone.html");
        let result = render_template(&gone, &renderer_with(&[]), &config).await;
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
