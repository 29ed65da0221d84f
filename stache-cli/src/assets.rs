//! Inline assets
//!
//! Script, style and SVG fragments are concatenated from their patterns and
//! exposed to templates as the partials `inlineJs`, `inlineCss` and
//! `inlineSvg`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures_util::future::try_join_all;
use sha2::{Digest, Sha256};

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::pattern;

/// Partial name of the wrapped inline JavaScript
pub const INLINE_JS: &str = "inlineJs";
/// Partial name of the wrapped inline CSS
pub const INLINE_CSS: &str = "inlineCss";
/// Partial name of the raw inline SVG
pub const INLINE_SVG: &str = "inlineSvg";

/// Concatenate the contents of every file matching `pattern`
///
/// Files are joined in expansion order with no separator. No pattern means an
/// empty string and no filesystem access.
///
/// # Errors
///
/// Returns an error if expansion fails or any matched file cannot be read.
pub async fn inline(pattern: Option<&str>) -> Result<String> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return Ok(String::new());
    };

    let files = pattern::expand(pattern).await?;
    let contents = try_join_all(files.into_iter().map(|file| async move {
        tokio::fs::read_to_string(&file)
            .await
            .map_err(|source| Error::read(file, source))
    }))
    .await?;

    Ok(contents.concat())
}

/// Raw inline asset contents for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineAssets {
    /// Concatenated JavaScript
    pub js: String,
    /// Concatenated CSS
    pub css: String,
    /// Concatenated SVG
    pub svg: String,
}

impl InlineAssets {
    /// Load all three assets concurrently from the configured patterns
    ///
    /// # Errors
    ///
    /// Returns the first expansion or read failure.
    pub async fn load(config: &BuildConfig) -> Result<Self> {
        let (js, css, svg) =
            tokio::try_join!(inline(config.js()), inline(config.css()), inline(config.svg()))?;
        Ok(Self { js, css, svg })
    }

    /// The partial entries templates include, keyed by their fixed names
    #[must_use]
    pub fn partials(&self) -> [(&'static str, String); 3] {
        [
            (INLINE_JS, format!("<script>{}</script>", self.js)),
            (INLINE_CSS, format!("<style>{}</style>", self.css)),
            (INLINE_SVG, self.svg.clone()),
        ]
    }

    /// SHA-256 digests of the raw script and style content
    #[must_use]
    pub fn digests(&self) -> AssetDigests {
        AssetDigests {
            js: sha256_base64(&self.js),
            css: sha256_base64(&self.css),
        }
    }
}

/// Base64 SHA-256 digests for Content-Security-Policy hash sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDigests {
    /// Digest of the inline JavaScript
    pub js: String,
    /// Digest of the inline CSS
    pub css: String,
}

impl std::fmt::Display for AssetDigests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "JS_sha256={}", self.js)?;
        write!(f, "CSS_sha256={}", self.css)
    }
}

fn sha256_base64(content: &str) -> String {
    STANDARD.encode(Sha256::digest(content.as_bytes()))
}
