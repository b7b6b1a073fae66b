//! Directory → zip archive bundling.
//!
//! Every call regenerates the archive from scratch. The zip is written to a
//! uniquely named temporary file next to the destination and renamed into
//! place once complete, so concurrent callers never see a partial archive and
//! the last writer wins.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use copdash_core::asset::path_to_slash;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// Prefix of in-flight archive files. Such files are never bundled.
const TEMP_PREFIX: &str = ".copdash-bundle-";

/// What a bundling pass wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub archive: PathBuf,
    /// Entry names, `/`-separated, relative to the source directory, sorted.
    pub entries: Vec<String>,
    pub bytes: u64,
}

/// Bundle every regular file under `src_dir` into the zip at `dest`.
///
/// `dest` may live inside `src_dir`; the archive never contains itself.
pub fn bundle_directory(src_dir: &Path, dest: &Path) -> Result<BundleSummary, ArchiveError> {
    if !src_dir.is_dir() {
        return Err(ArchiveError::NotADirectory(src_dir.to_path_buf()));
    }

    let dest_dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dest_dir).map_err(|source| ArchiveError::Io {
        path: dest_dir.clone(),
        source,
    })?;
    let dest_canonical = canonical_target(&dest_dir, dest)?;

    // Collect before the temp file exists, so it cannot be picked up.
    let files = collect_files(src_dir, dest_canonical.as_deref())?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".zip")
        .tempfile_in(&dest_dir)
        .map_err(|source| ArchiveError::Io {
            path: dest_dir.clone(),
            source,
        })?;

    let zip_err = |source| ArchiveError::Zip {
        path: dest.to_path_buf(),
        source,
    };
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(temp.as_file_mut());
    for (name, path) in &files {
        zip.start_file(name.as_str(), options).map_err(zip_err)?;
        let mut input = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        io::copy(&mut input, &mut zip).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(entry = %name, "added archive entry");
    }
    zip.finish().map_err(zip_err)?;

    temp.persist(dest).map_err(|e| ArchiveError::Persist {
        path: dest.to_path_buf(),
        source: e.error,
    })?;

    let bytes = fs::metadata(dest)
        .map(|m| m.len())
        .map_err(|source| ArchiveError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
    info!(
        archive = %dest.display(),
        source = %src_dir.display(),
        entries = files.len(),
        bytes,
        "bundled directory"
    );

    Ok(BundleSummary {
        archive: dest.to_path_buf(),
        entries: files.into_iter().map(|(name, _)| name).collect(),
        bytes,
    })
}

/// Canonical path the archive will occupy, if it can be determined.
fn canonical_target(dest_dir: &Path, dest: &Path) -> Result<Option<PathBuf>, ArchiveError> {
    let dir = fs::canonicalize(dest_dir).map_err(|source| ArchiveError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;
    Ok(dest.file_name().map(|name| dir.join(name)))
}

/// Regular files under `src_dir` as (entry name, path), sorted by entry name.
fn collect_files(
    src_dir: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<(String, PathBuf)>, ArchiveError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: src_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
            continue;
        }
        if let Some(exclude) = exclude {
            if fs::canonicalize(entry.path()).ok().as_deref() == Some(exclude) {
                continue;
            }
        }
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .unwrap_or_else(|_| entry.path());
        files.push((path_to_slash(relative), entry.path().to_path_buf()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
