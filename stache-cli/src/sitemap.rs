//! Sitemap generation from per-page JSON metadata

use std::path::PathBuf;

use futures_util::future::try_join_all;
use quick_xml::escape::escape;
use serde::Deserialize;

use crate::config::SitemapConfig;
use crate::error::{Error, Result};
use crate::output::write_output;
use crate::pattern;

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XSI_ATTRIBUTES: &str = concat!(
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
    r#" xsi:schemaLocation="http://www.sitemaps.org/schemas/sitemap/0.9"#,
    r#" http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd""#,
);

/// Page metadata; only `url` is read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Absolute URL of the page
    pub url: String,
}

/// Read every metadata file and write the sitemap
///
/// Returns the number of `<url>` entries written.
///
/// # Errors
///
/// Returns an error if expansion fails, a file cannot be read or lacks a
/// `url`, or the sitemap cannot be written.
pub async fn generate(config: &SitemapConfig) -> Result<usize> {
    let files = pattern::expand(config.json_pattern()).await?;
    let pages = try_join_all(files.into_iter().map(read_page)).await?;

    let xml = render_sitemap(&pages, config.schema_instance());
    write_output(config.sitemap_path(), &xml).await?;

    tracing::info!(
        pages = pages.len(),
        sitemap = %config.sitemap_path().display(),
        "sitemap written"
    );
    Ok(pages.len())
}

async fn read_page(path: PathBuf) -> Result<PageMeta> {
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| Error::read(&path, source))?;

    serde_json::from_str(&content).map_err(|source| Error::Json { path, source })
}

/// Render the sitemap document for `pages`, in order
#[must_use]
pub fn render_sitemap(pages: &[PageMeta], schema_instance: bool) -> String {
    let urls: String = pages.iter().map(render_url).collect();
    let xsi = if schema_instance { XSI_ATTRIBUTES } else { "" };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"{XMLNS}\"{xsi}>\n{urls}\n</urlset>"
    )
}

fn render_url(page: &PageMeta) -> String {
    format!(
        "<url>\n    <loc>{}</loc>\n    \
         <changefreq>weekly</changefreq>\n    \
         <priority>1.00</priority>\n  </url>",
        escape(page.url.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn page(url: &str) -> PageMeta {
        PageMeta {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_render_entries_in_order() {
        let xml = render_sitemap(&[page("https://x/1"), page("https://x/2")], false);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.ends_with("</urlset>"));
        assert_eq!(xml.matches("<changefreq>weekly</changefreq>").count(), 2);
        assert_eq!(xml.matches("<priority>1.00</priority>").count(), 2);

        let first = xml.find("<loc>https://x/1</loc>").unwrap();
        let second = xml.find("<loc>https://x/2</loc>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_empty() {
        let xml = render_sitemap(&[], false);
        assert!(!xml.contains("<url>"));
        assert!(xml.contains("<urlset"));
    }

    #[test]
    fn test_schema_instance_attributes() {
        let xml = render_sitemap(&[], true);
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains("sitemap.xsd"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let xml = render_sitemap(&[page("https://x/?a=1&b=2")], false);
        assert!(xml.contains("<loc>https://x/?a=1&amp;b=2</loc>"));

        let xml = render_sitemap(&[page("https://x/<\"q\">")], false);
        assert!(xml.contains("<loc>https://x/&lt;&quot;q&quot;&gt;</loc>"));
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("pages")).unwrap();
        fs::write(
            dir.path().join("pages/a.json"),
            r#"{"url": "https://x/a", "title": "A"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("pages/b.json"), r#"{"url": "https://x/b"}"#).unwrap();
        let sitemap = dir.path().join("out/sitemap.xml");
        let config =
            SitemapConfig::new(format!("{}/pages/*.json", dir.path().display()), &sitemap);

        assert_eq!(generate(&config).await.unwrap(), 2);

        let xml = fs::read_to_string(&sitemap).unwrap();
        assert!(xml.find("https://x/a").unwrap() < xml.find("https://x/b").unwrap());
    }

    #[tokio::test]
    async fn test_missing_url_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"title": "no url"}"#).unwrap();
        let config = SitemapConfig::new(
            format!("{}/*.json", dir.path().display()),
            dir.path().join("sitemap.xml"),
        );

        assert!(matches!(generate(&config).await, Err(Error::Json { .. })));
        assert!(!dir.path().join("sitemap.xml").exists());
    }
}
