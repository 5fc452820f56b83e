//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving content from disk
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{kind} \"{id}\" not found in {}", dir.display())]
    NotFound {
        kind: &'static str,
        id: String,
        dir: PathBuf,
    },

    #[error("{} is missing required frontmatter: {}", path.display(), missing.join(", "))]
    IncompleteMetadata {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content directory {} is unavailable: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frontmatter in {}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },
}

impl ContentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
