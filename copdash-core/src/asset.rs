//! Asset references and the probe abstraction.
//!
//! The `AssetProbe` trait abstracts over where assets live so the router can
//! be exercised against an in-memory listing in tests and against the real
//! asset tree in the binaries. Probing is read-only.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a resolved asset is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A pre-rendered chart (PNG), shown with a caption.
    #[default]
    StaticImage,
    /// A pre-generated HTML snippet (SHAP force plot), embedded verbatim.
    HtmlFragment,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::StaticImage => "image",
            AssetKind::HtmlFragment => "html",
        }
    }
}

/// A single resolved asset. Built per render pass, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetReference {
    /// Path including the asset root, e.g. `assets/Imputed/XGB_imputed.png`.
    pub relative_path: PathBuf,
    pub caption: String,
    pub kind: AssetKind,
}

impl AssetReference {
    pub fn new(relative_path: impl Into<PathBuf>, caption: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            caption: caption.into(),
            kind,
        }
    }

    /// Path with `/` separators regardless of platform, for HTML and display.
    pub fn display_path(&self) -> String {
        path_to_slash(&self.relative_path)
    }
}

/// Join path components with `/`. Absolute paths keep their leading `/`.
pub fn path_to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

/// Outcome of probing one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Present,
    Missing,
    /// The file exists but cannot be used (e.g. a fragment that is not UTF-8).
    Unreadable(String),
}

impl AssetStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, AssetStatus::Present)
    }
}

/// Read-only existence check for resolved assets.
pub trait AssetProbe {
    fn probe(&self, path: &Path, kind: AssetKind) -> AssetStatus;
}

impl<P: AssetProbe + ?Sized> AssetProbe for &P {
    fn probe(&self, path: &Path, kind: AssetKind) -> AssetStatus {
        (**self).probe(path, kind)
    }
}

/// Probes the real filesystem.
///
/// Images only need to be regular files. HTML fragments are read in full and
/// must be valid UTF-8, since they are embedded verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl AssetProbe for FsProbe {
    fn probe(&self, path: &Path, kind: AssetKind) -> AssetStatus {
        match kind {
            AssetKind::StaticImage => {
                if path.is_file() {
                    AssetStatus::Present
                } else {
                    AssetStatus::Missing
                }
            }
            AssetKind::HtmlFragment => match fs::read_to_string(path) {
                Ok(_) => AssetStatus::Present,
                Err(e) if e.kind() == ErrorKind::NotFound => AssetStatus::Missing,
                Err(e) => AssetStatus::Unreadable(e.to_string()),
            },
        }
    }
}

/// Probe backed by a fixed listing of present paths.
#[derive(Debug, Clone, Default)]
pub struct KnownAssets {
    present: BTreeSet<PathBuf>,
}

impl KnownAssets {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            present: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        self.present.remove(path)
    }
}

impl AssetProbe for KnownAssets {
    fn probe(&self, path: &Path, _kind: AssetKind) -> AssetStatus {
        if self.present.contains(path) {
            AssetStatus::Present
        } else {
            AssetStatus::Missing
        }
    }
}

/// Treats every asset as present. Used to list the full routing of a page
/// without an asset tree on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumePresent;

impl AssetProbe for AssumePresent {
    fn probe(&self, _path: &Path, _kind: AssetKind) -> AssetStatus {
        AssetStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_probe_distinguishes_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("XGB_raw.png");
        std::fs::write(&img, b"\x89PNG").unwrap();

        assert_eq!(FsProbe.probe(&img, AssetKind::StaticImage), AssetStatus::Present);
        assert_eq!(
            FsProbe.probe(&dir.path().join("LR_raw.png"), AssetKind::StaticImage),
            AssetStatus::Missing
        );
    }

    #[test]
    fn fs_probe_rejects_directory_as_image() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FsProbe.probe(dir.path(), AssetKind::StaticImage), AssetStatus::Missing);
    }

    #[test]
    fn fs_probe_flags_non_utf8_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("force_plot_xgb.html");
        let bad = dir.path().join("force_plot_LR.html");
        std::fs::write(&good, "<div>ok</div>").unwrap();
        std::fs::write(&bad, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        assert!(FsProbe.probe(&good, AssetKind::HtmlFragment).is_present());
        assert!(matches!(
            FsProbe.probe(&bad, AssetKind::HtmlFragment),
            AssetStatus::Unreadable(_)
        ));
        assert_eq!(
            FsProbe.probe(&dir.path().join("nope.html"), AssetKind::HtmlFragment),
            AssetStatus::Missing
        );
    }

    #[test]
    fn known_assets_probe() {
        let mut known = KnownAssets::new(["assets/Raw/XGB_raw.png"]);
        let path = Path::new("assets/Raw/XGB_raw.png");
        assert!(known.probe(path, AssetKind::StaticImage).is_present());
        assert!(known.remove(path));
        assert_eq!(known.probe(path, AssetKind::StaticImage), AssetStatus::Missing);
    }

    #[test]
    fn display_path_uses_forward_slashes() {
        let r = AssetReference::new(
            Path::new("assets").join("SHAP").join("Raw").join("SHAP_XGB_raw.png"),
            "caption",
            AssetKind::StaticImage,
        );
        assert_eq!(r.display_path(), "assets/SHAP/Raw/SHAP_XGB_raw.png");
    }

    #[cfg(unix)]
    #[test]
    fn slash_path_keeps_single_leading_root() {
        assert_eq!(path_to_slash(Path::new("/srv/copd/assets")), "/srv/copd/assets");
        assert_eq!(path_to_slash(Path::new("../assets")), "../assets");
        assert_eq!(path_to_slash(Path::new("")), "");
    }
}
