//! Glob pattern expansion
//!
//! Patterns are split into a literal directory prefix, which is walked with
//! `walkdir`, and the full pattern, which every walked file is matched against
//! with `globset`. `*` and `?` never cross a `/`; `**` spans directories.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Expand `pattern` into the files it matches
///
/// Paths keep the pattern's literal prefix exactly as written, so a match for
/// `pages/*.html` looks like `pages/home.html`. Results are ordered by file
/// name within each directory. A prefix directory that does not exist yields
/// no matches.
///
/// # Errors
///
/// Returns an error if the pattern is malformed or the directory walk fails.
pub async fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let owned = pattern.to_owned();
    let matches = tokio::task::spawn_blocking(move || expand_blocking(&owned)).await??;

    tracing::debug!(pattern, matches = matches.len(), "expanded pattern");
    Ok(matches)
}

/// Byte offset of the first `*` in `pattern`, or 0 when there is none
#[must_use]
pub fn wildcard_index(pattern: &str) -> usize {
    pattern.find('*').unwrap_or(0)
}

fn expand_blocking(pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = compile(pattern)?;
    let (root, rest) = split_literal_prefix(pattern);

    let walk_from = if root.is_empty() { Path::new(".") } else { Path::new(root) };
    if !walk_from.exists() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(walk_from)
        .follow_links(true)
        .max_depth(max_depth(rest))
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut matches = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            pattern: pattern.to_owned(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        // Walking "." stands in for an empty prefix; report paths without it.
        let path = if root.is_empty() {
            entry.path().strip_prefix(".").unwrap_or_else(|_| entry.path())
        } else {
            entry.path()
        };

        if matcher.is_match(path) {
            matches.push(path.to_path_buf());
        }
    }

    Ok(matches)
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| Error::Pattern {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Split into the literal directory prefix and the remainder
fn split_literal_prefix(pattern: &str) -> (&str, &str) {
    let Some(first_meta) = pattern.find(GLOB_META) else {
        return (pattern, "");
    };

    match pattern[..first_meta].rfind('/') {
        Some(0) => ("/", &pattern[1..]),
        Some(slash) => (&pattern[..slash], &pattern[slash + 1..]),
        None => ("", pattern),
    }
}

fn max_depth(rest: &str) -> usize {
    if rest.is_empty() {
        0
    } else if rest.contains("**") {
        usize::MAX
    } else {
        rest.split('/').count()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
