//! Output path derivation and file writing

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pattern::wildcard_index;

/// Map a template's source path to its output path
///
/// Everything in `template_path` from the first `*` of `template_pattern`
/// onwards is kept and joined beneath `output_dir`. Without a wildcard the
/// whole source path is kept, so templates sharing that suffix collide.
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use stache::output::resolve_output_path;
///
/// let out = resolve_output_path(
///     Path::new("pages/blog/post.mustache"),
///     "pages/*/*.mustache",
///     Path::new("dist"),
/// );
/// assert_eq!(out, PathBuf::from("dist/blog/post.mustache"));
/// ```
#[must_use]
pub fn resolve_output_path(
    template_path: &Path,
    template_pattern: &str,
    output_dir: &Path,
) -> PathBuf {
    let source = template_path.to_string_lossy();
    let suffix = source.get(wildcard_index(template_pattern)..).unwrap_or_default();

    output_dir.join(suffix.trim_start_matches('/'))
}

/// Write `contents` to `path`, creating missing parent directories
///
/// # Errors
///
/// Returns [`Error::Write`] if the directory or the file cannot be written.
pub async fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::write(parent, source))?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|source| Error::write(path, source))
}
