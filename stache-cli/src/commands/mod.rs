//! CLI command implementations

pub mod render;
pub mod sitemap;

pub use render::RenderCommand;
pub use sitemap::SitemapCommand;
