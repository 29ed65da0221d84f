//! Error types for the build pipeline and the sitemap generator

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a run
///
/// The per-template `mustache.json` fallback is the only recoverable failure
/// and never surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    /// No template pattern was supplied
    #[error("template pattern must not be empty")]
    EmptyTemplatePattern,

    /// The glob pattern could not be compiled
    #[error("invalid pattern '{pattern}'")]
    Pattern {
        /// Pattern as given on the command line
        pattern: String,
        /// Underlying parse failure
        #[source]
        source: globset::Error,
    },

    /// Directory traversal failed while expanding a pattern
    #[error("failed to expand pattern '{pattern}'")]
    Walk {
        /// Pattern being expanded
        pattern: String,
        /// Underlying traversal failure
        #[source]
        source: walkdir::Error,
    },

    /// A matched file could not be read
    #[error("failed to read {}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A rendered file or its parent directory could not be written
    #[error("failed to write {}", path.display())]
    Write {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A template failed to render
    #[error("failed to render template {}", path.display())]
    Render {
        /// Template source path
        path: PathBuf,
        /// Parse failure in the template or an included partial
        #[source]
        source: TemplateError,
    },

    /// A JSON document could not be parsed
    #[error("failed to parse JSON in {}", path.display())]
    Json {
        /// Offending file
        path: PathBuf,
        /// Underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A blocking filesystem task panicked or was cancelled
    #[error("background task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// Create a read error for `path`
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
