//! stache-sitemap CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use stache::commands::SitemapCommand;
use stache::observability;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let command = SitemapCommand::parse();
    observability::init()?;

    command.execute().await
}
