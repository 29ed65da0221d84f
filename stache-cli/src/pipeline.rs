//! Build orchestration
//!
//! One run goes through three stages:
//!
//! 1. Partials and the three inline assets load concurrently.
//! 2. Inline assets join the partial map under their fixed names and every
//!    partial is parsed once into the shared renderer.
//! 3. The template pattern is expanded and every template renders
//!    concurrently against the shared renderer.
//!
//! The first failure anywhere aborts the run.

use std::path::PathBuf;

use futures_util::future::try_join_all;

use crate::assets::{AssetDigests, InlineAssets};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::partials::load_partials;
use crate::pattern;
use crate::render::{render_template, RenderedTemplate, Renderer};

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutput {
    /// Rendered templates joined by newlines, in template order
    Rendered(String),
    /// Files written, in template order
    Written(Vec<PathBuf>),
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered text or written files
    pub output: BuildOutput,
    /// Inline asset digests, when requested
    pub digests: Option<AssetDigests>,
}

/// Run the whole templating pipeline for `config`
///
/// # Errors
///
/// Returns the first fatal error raised while loading partials or assets,
/// expanding the template pattern, or rendering and writing any template.
pub async fn run(config: &BuildConfig) -> Result<BuildReport> {
    let (mut partials, assets) =
        tokio::try_join!(load_partials(config.partials()), InlineAssets::load(config))?;

    for (name, content) in assets.partials() {
        partials.insert(name.to_string(), content);
    }
    let renderer = Renderer::new(&partials);

    let templates = pattern::expand(config.template_pattern()).await?;
    let rendered = try_join_all(
        templates
            .iter()
            .map(|template| render_template(template, &renderer, config)),
    )
    .await?;

    tracing::info!(
        templates = rendered.len(),
        partials = partials.len(),
        "build finished"
    );

    Ok(BuildReport {
        output: collect_output(rendered, config.output_dir().is_some()),
        digests: config.digests().then(|| assets.digests()),
    })
}

fn collect_output(rendered: Vec<RenderedTemplate>, writes_files: bool) -> BuildOutput {
    let mut texts = Vec::new();
    let mut written = Vec::new();

    for template in rendered {
        match template {
            RenderedTemplate::Text(text) => texts.push(text),
            RenderedTemplate::Written(path) => written.push(path),
        }
    }

    if writes_files {
        BuildOutput::Written(written)
    } else {
        BuildOutput::Rendered(texts.join("\n"))
    }
}
