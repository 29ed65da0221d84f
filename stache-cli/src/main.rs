//! stache CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use stache::commands::RenderCommand;
use stache::observability;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let command = RenderCommand::parse();
    observability::init()?;

    command.execute().await
}
