//! `stache-sitemap` command: build sitemap.xml from page metadata

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use crate::config::SitemapConfig;
use crate::sitemap;

/// Build a sitemap from per-page JSON metadata
///
/// Example:
///   stache-sitemap -j "pages/*.json" -s dist/sitemap.xml
#[derive(Debug, Parser)]
#[command(name = "stache-sitemap")]
#[command(version)]
#[command(about = "Build sitemap.xml from per-page JSON metadata", long_about = None)]
pub struct SitemapCommand {
    /// Page metadata glob; every file must hold an object with a `url`
    #[arg(short, long)]
    pub json: String,

    /// Sitemap output path
    #[arg(short, long)]
    pub sitemap: PathBuf,

    /// Add the XML-Schema-instance attributes to <urlset>
    #[arg(long)]
    pub xsi: bool,
}

impl SitemapCommand {
    /// Build the run configuration from the parsed arguments
    #[must_use]
    pub fn config(&self) -> SitemapConfig {
        SitemapConfig::new(self.json.clone(), self.sitemap.clone()).with_schema_instance(self.xsi)
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if any metadata file cannot be read or parsed, or the
    /// sitemap cannot be written.
    pub async fn execute(&self) -> Result<()> {
        let config = self.config();
        sitemap::generate(&config).await.with_context(|| {
            format!(
                "Failed to write sitemap: {}",
                config.sitemap_path().display()
            )
        })?;

        println!("{}", style("Done!").green().bold());
        Ok(())
    }
}
