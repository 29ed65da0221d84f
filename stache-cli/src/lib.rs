//! stache: static-site build library
//!
//! Renders mustache-style templates selected by a glob pattern, with shared
//! partials, inline JS/CSS/SVG fragments and per-template `mustache.json`
//! data, and builds sitemaps from per-page JSON metadata.
//!
//! # Example
//!
//! ```rust,no_run
//! use stache::{pipeline, BuildConfig, BuildOutput};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BuildConfig::new("pages/*.mustache")?
//!     .with_partials(Some("partials/*.mustache".to_string()))
//!     .with_js(Some("assets/*.js".to_string()));
//!
//! let report = pipeline::run(&config).await?;
//! if let BuildOutput::Rendered(html) = report.output {
//!     println!("{html}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

pub mod assets;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod observability;
pub mod output;
pub mod partials;
pub mod pattern;
pub mod pipeline;
pub mod render;
pub mod sitemap;
pub mod template;

pub use assets::{AssetDigests, InlineAssets};
pub use config::{BuildConfig, SitemapConfig};
pub use error::{Error, Result};
pub use partials::PartialMap;
pub use pipeline::{BuildOutput, BuildReport};
pub use render::{RenderedTemplate, Renderer};
