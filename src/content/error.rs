//! Errors raised while reading or writing documents

use std::path::PathBuf;
use thiserror::Error;

/// Why a document could not be loaded or stored.
///
/// Every variant describes a malformed or unreadable document. The store
/// logs these and skips the offending file; they are never fatal to a listing.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("front-matter has no title")]
    MissingTitle,

    #[error("no publication date in front-matter or file name")]
    MissingDate,

    #[error("unrecognised date {0:?}")]
    InvalidDate(String),

    #[error("a {kind:?} cannot live at {}", .source_path.display())]
    KindMismatch {
        kind: super::DocumentKind,
        source_path: PathBuf,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
