//! `stache` command: render templates

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::pipeline::{self, BuildOutput, BuildReport};

/// Render mustache templates with partials and inline assets
///
/// Examples:
///   stache -t "pages/*.mustache" -p "partials/*.mustache" -o dist
///   stache -t "pages/*.html" -j "assets/*.js" -c "assets/*.css" -b "$GIT_SHA"
#[derive(Debug, Parser)]
#[command(name = "stache")]
#[command(version)]
#[command(about = "Render mustache templates into a static site", long_about = None)]
pub struct RenderCommand {
    /// Template glob; the part matched from the first `*` is mirrored under --output
    #[arg(short, long)]
    pub template: String,

    /// Cache-buster (e.g. commit SHA-1), exposed to templates as `version`
    #[arg(short, long, env = "STACHE_BUST")]
    pub bust: Option<String>,

    /// Partials glob; each file is available as a partial named by its base filename
    #[arg(short, long)]
    pub partials: Option<String>,

    /// Inline JavaScript glob, included with `{{> inlineJs}}`
    #[arg(short, long)]
    pub js: Option<String>,

    /// Inline CSS glob, included with `{{> inlineCss}}`
    #[arg(short, long)]
    pub css: Option<String>,

    /// Inline SVG glob, included with `{{> inlineSvg}}`
    #[arg(short, long)]
    pub svg: Option<String>,

    /// Output directory; rendered output goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print base64 SHA-256 digests of the inline JS and CSS
    #[arg(long)]
    pub digests: bool,
}

impl RenderCommand {
    /// Build the run configuration from the parsed arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the template pattern is empty.
    pub fn config(&self) -> Result<BuildConfig> {
        let config = BuildConfig::new(self.template.clone())?
            .with_bust(self.bust.clone())
            .with_partials(self.partials.clone())
            .with_js(self.js.clone())
            .with_css(self.css.clone())
            .with_svg(self.svg.clone())
            .with_output_dir(self.output.clone())
            .with_digests(self.digests);
        Ok(config)
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the build.
    pub async fn execute(&self) -> Result<()> {
        let config = self.config()?;
        let report = pipeline::run(&config).await.with_context(|| {
            format!(
                "Failed to render templates: {}",
                config.template_pattern()
            )
        })?;

        Self::print_report(&report);
        Ok(())
    }

    fn print_report(report: &BuildReport) {
        match &report.output {
            BuildOutput::Rendered(text) => println!("{text}"),
            BuildOutput::Written(_) => println!("{}", style("Done!").green().bold()),
        }

        if let Some(digests) = &report.digests {
            println!("{digests}");
        }
    }
}
