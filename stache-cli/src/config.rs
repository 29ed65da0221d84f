//! Run configuration
//!
//! Both binaries turn their parsed arguments into one of these values once at
//! startup. Every component receives the configuration by reference; nothing
//! downstream reads arguments or environment variables itself.
//!
//! # Example
//!
//! ```rust
//! use stache::BuildConfig;
//!
//! # fn main() -> stache::Result<()> {
//! let config = BuildConfig::new("pages/*.mustache")?
//!     .with_bust(Some("3f2a9c1".to_string()))
//!     .with_output_dir(Some("dist".into()));
//!
//! assert_eq!(config.wildcard_index(), 6);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pattern;

/// Configuration for one templating run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    template_pattern: String,
    bust: Option<String>,
    partials: Option<String>,
    js: Option<String>,
    css: Option<String>,
    svg: Option<String>,
    output_dir: Option<PathBuf>,
    digests: bool,
}

impl BuildConfig {
    /// Create a configuration for the given template pattern
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTemplatePattern`] if the pattern is empty.
    pub fn new(template_pattern: impl Into<String>) -> Result<Self> {
        let template_pattern = template_pattern.into();
        if template_pattern.is_empty() {
            return Err(Error::EmptyTemplatePattern);
        }

        Ok(Self {
            template_pattern,
            bust: None,
            partials: None,
            js: None,
            css: None,
            svg: None,
            output_dir: None,
            digests: false,
        })
    }

    /// Set the cache-bust token injected as `version`
    #[must_use]
    pub fn with_bust(mut self, bust: Option<String>) -> Self {
        self.bust = non_empty(bust);
        self
    }

    /// Set the partials pattern
    #[must_use]
    pub fn with_partials(mut self, pattern: Option<String>) -> Self {
        self.partials = non_empty(pattern);
        self
    }

    /// Set the inline JavaScript pattern
    #[must_use]
    pub fn with_js(mut self, pattern: Option<String>) -> Self {
        self.js = non_empty(pattern);
        self
    }

    /// Set the inline CSS pattern
    #[must_use]
    pub fn with_css(mut self, pattern: Option<String>) -> Self {
        self.css = non_empty(pattern);
        self
    }

    /// Set the inline SVG pattern
    #[must_use]
    pub fn with_svg(mut self, pattern: Option<String>) -> Self {
        self.svg = non_empty(pattern);
        self
    }

    /// Set the output directory; `None` renders to a string
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir.filter(|d| !d.as_os_str().is_empty());
        self
    }

    /// Compute SHA-256 digests of the inline JS and CSS
    #[must_use]
    pub fn with_digests(mut self, digests: bool) -> Self {
        self.digests = digests;
        self
    }

    /// Template glob pattern
    #[must_use]
    pub fn template_pattern(&self) -> &str {
        &self.template_pattern
    }

    /// Byte offset of the first `*` in the template pattern, or 0
    #[must_use]
    pub fn wildcard_index(&self) -> usize {
        pattern::wildcard_index(&self.template_pattern)
    }

    /// Cache-bust token
    #[must_use]
    pub fn bust(&self) -> Option<&str> {
        self.bust.as_deref()
    }

    /// Partials pattern
    #[must_use]
    pub fn partials(&self) -> Option<&str> {
        self.partials.as_deref()
    }

    /// Inline JavaScript pattern
    #[must_use]
    pub fn js(&self) -> Option<&str> {
        self.js.as_deref()
    }

    /// Inline CSS pattern
    #[must_use]
    pub fn css(&self) -> Option<&str> {
        self.css.as_deref()
    }

    /// Inline SVG pattern
    #[must_use]
    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    /// Output directory
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Whether asset digests are requested
    #[must_use]
    pub const fn digests(&self) -> bool {
        self.digests
    }
}

/// Configuration for one sitemap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapConfig {
    json_pattern: String,
    sitemap_path: PathBuf,
    schema_instance: bool,
}

impl SitemapConfig {
    /// Create a configuration reading `json_pattern` and writing `sitemap_path`
    pub fn new(json_pattern: impl Into<String>, sitemap_path: impl Into<PathBuf>) -> Self {
        Self {
            json_pattern: json_pattern.into(),
            sitemap_path: sitemap_path.into(),
            schema_instance: false,
        }
    }

    /// Emit the XML-Schema-instance attributes on `<urlset>`
    #[must_use]
    pub fn with_schema_instance(mut self, enabled: bool) -> Self {
        self.schema_instance = enabled;
        self
    }

    /// Page metadata pattern
    #[must_use]
    pub fn json_pattern(&self) -> &str {
        &self.json_pattern
    }

    /// Sitemap output path
    #[must_use]
    pub fn sitemap_path(&self) -> &Path {
        &self.sitemap_path
    }

    /// Whether schema-instance attributes are emitted
    #[must_use]
    pub const fn schema_instance(&self) -> bool {
        self.schema_instance
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
