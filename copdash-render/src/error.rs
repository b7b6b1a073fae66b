//! Error types for rendering, export and archive bundling.

use std::path::PathBuf;

use copdash_core::RouteError;
use thiserror::Error;

/// Errors from bundling a directory into a zip archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive source {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("zip error while writing {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to move archive into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from rendering plans or exporting a site.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize site manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
