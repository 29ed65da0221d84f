//! Named partial loading

use std::collections::HashMap;
use std::path::Path;

use futures_util::future::try_join_all;

use crate::error::{Error, Result};
use crate::pattern;

/// Partial name (base filename) to template text
pub type PartialMap = HashMap<String, String>;

/// Load every file matching `pattern`, keyed by its base filename
///
/// When two files share a base name the one expanded last wins.
///
/// # Errors
///
/// Returns an error if expansion fails or any matched file cannot be read.
pub async fn load_partials(pattern: Option<&str>) -> Result<PartialMap> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return Ok(PartialMap::new());
    };

    let files = pattern::expand(pattern).await?;
    let entries = try_join_all(files.into_iter().map(|file| async move {
        let content = tokio::fs::read_to_string(&file)
            .await
            .map_err(|source| Error::read(&file, source))?;
        Ok::<_, Error>((partial_name(&file), content))
    }))
    .await?;

    // Collecting in expansion order keeps the last duplicate.
    Ok(entries.into_iter().collect())
}

fn partial_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
