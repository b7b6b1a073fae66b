//! Export orchestrator for single views and the static site.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use copdash_core::asset::path_to_slash;
use copdash_core::{
    AssetKind, AssetProbe, DataTypeFilter, NavigationState, Page, PlanItem, PresentationPlan,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::archive::{bundle_directory, BundleSummary};
use crate::error::RenderError;
use crate::html::{page_file_name, HtmlRenderer};
use crate::markdown::MarkdownReportGenerator;

/// Directory under the site root that holds copied images.
pub const SITE_ASSET_DIR: &str = "assets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format '{other}' (valid: html, markdown)")),
        }
    }
}

/// One exported page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPage {
    pub page: Page,
    pub data_type_filter: DataTypeFilter,
    pub file: String,
    pub fingerprint: String,
    pub assets: usize,
    pub unavailable: usize,
}

/// Written as `manifest.json` at the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteManifest {
    pub generated_at: DateTime<Utc>,
    pub asset_root: String,
    pub pages: Vec<ExportedPage>,
    pub archives: Vec<String>,
}

/// Paths and counts returned after a site export.
#[derive(Debug, Clone)]
pub struct SiteExport {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: SiteManifest,
    pub copied_assets: usize,
}

/// Render one navigation state to `output`.
///
/// Download offers in the plan are bundled next to the output file so the
/// links resolve. Images are referenced in place under the asset root, by a
/// path relative to the output's directory.
pub fn export_view<P: AssetProbe>(
    router: &Router<P>,
    state: &NavigationState,
    output: &Path,
    format: OutputFormat,
) -> Result<PresentationPlan, RenderError> {
    let plan = router.resolve_plan(state)?;

    let out_dir = output.parent().unwrap_or_else(|| Path::new(""));
    if !out_dir.as_os_str().is_empty() {
        create_dir(out_dir)?;
    }

    let renderer = HtmlRenderer::new(router.asset_root())
        .with_asset_url_prefix(relative_url_prefix(router.asset_root(), out_dir));
    let content = match format {
        OutputFormat::Html => renderer.render_page(state, &plan),
        OutputFormat::Markdown => MarkdownReportGenerator::new(renderer).generate(state, &plan),
    };
    write_file(output, &content)?;
    bundle_offers(&plan, out_dir, &mut BTreeSet::new())?;

    info!(
        page = %state.page,
        filter = %state.data_type_filter,
        output = %output.display(),
        fingerprint = %plan.fingerprint(),
        "exported view"
    );
    Ok(plan)
}

/// Export every page under every data-type filter with all sections on.
///
/// The Overview for all data types becomes `index.html`. Present images are
/// copied under `assets/`, fragments are inlined, archive offers are bundled
/// once each, and a `manifest.json` records what was written.
pub fn export_site<P: AssetProbe>(
    router: &Router<P>,
    output_dir: &Path,
) -> Result<SiteExport, RenderError> {
    create_dir(output_dir)?;
    let renderer = HtmlRenderer::new(router.asset_root()).with_asset_url_prefix(SITE_ASSET_DIR);

    let mut pages = Vec::new();
    let mut copied = BTreeSet::new();
    let mut archives = BTreeSet::new();

    for page in Page::ALL {
        for filter in DataTypeFilter::CHOICES {
            let state = NavigationState {
                page,
                data_type_filter: filter,
                ..NavigationState::default()
            };
            let plan = router.resolve_plan(&state)?;
            let file = page_file_name(page, filter);
            write_file(&output_dir.join(&file), &renderer.render_page(&state, &plan))?;

            for reference in plan.assets() {
                if reference.kind != AssetKind::StaticImage {
                    continue;
                }
                let relative = renderer.asset_relative(reference).to_path_buf();
                if copied.insert(relative.clone()) {
                    let target = output_dir.join(SITE_ASSET_DIR).join(&relative);
                    if let Some(parent) = target.parent() {
                        create_dir(parent)?;
                    }
                    fs::copy(&reference.relative_path, &target).map_err(|source| {
                        RenderError::Write {
                            path: target.clone(),
                            source,
                        }
                    })?;
                }
            }
            bundle_offers(&plan, output_dir, &mut archives)?;

            pages.push(ExportedPage {
                page,
                data_type_filter: filter,
                file,
                fingerprint: plan.fingerprint(),
                assets: plan.asset_slots().count(),
                unavailable: plan.unavailable().count(),
            });
        }
    }

    let manifest = SiteManifest {
        generated_at: Utc::now(),
        asset_root: router.asset_root().display().to_string(),
        pages,
        archives: archives.into_iter().collect(),
    };
    let manifest_path = output_dir.join("manifest.json");
    write_file(&manifest_path, &serde_json::to_string_pretty(&manifest)?)?;

    let unavailable: usize = manifest.pages.iter().map(|p| p.unavailable).sum();
    info!(
        output = %output_dir.display(),
        pages = manifest.pages.len(),
        assets = copied.len(),
        unavailable,
        "exported static site"
    );

    Ok(SiteExport {
        output_dir: output_dir.to_path_buf(),
        manifest_path,
        manifest,
        copied_assets: copied.len(),
    })
}

/// Bundle each download offer of `plan` into `out_dir`, skipping archive
/// names already in `done`. A missing source directory is logged and skipped.
fn bundle_offers(
    plan: &PresentationPlan,
    out_dir: &Path,
    done: &mut BTreeSet<String>,
) -> Result<Vec<BundleSummary>, RenderError> {
    let mut written = Vec::new();
    for item in &plan.items {
        let PlanItem::Download(offer) = item else {
            continue;
        };
        if done.contains(&offer.archive_name) {
            continue;
        }
        if !offer.source_dir.is_dir() {
            warn!(
                source = %offer.source_dir.display(),
                archive = %offer.archive_name,
                "archive source missing, download link will be dead"
            );
            continue;
        }
        written.push(bundle_directory(&offer.source_dir, &out_dir.join(&offer.archive_name))?);
        done.insert(offer.archive_name.clone());
    }
    Ok(written)
}

/// URL prefix that reaches `asset_root` from a page written into `out_dir`.
///
/// Both paths are made absolute first; a root that cannot be reached by a
/// relative path (another drive) is referenced absolutely.
fn relative_url_prefix(asset_root: &Path, out_dir: &Path) -> String {
    let out_dir = if out_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        out_dir
    };
    match (absolute(asset_root), absolute(out_dir)) {
        (Some(root), Some(dir)) => match pathdiff::diff_paths(&root, &dir) {
            Some(relative) => path_to_slash(&relative),
            None => path_to_slash(&root),
        },
        _ => path_to_slash(asset_root),
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path)
        .ok()
        .or_else(|| env::current_dir().ok().map(|cwd| cwd.join(path)))
}

fn create_dir(path: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(path).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), RenderError> {
    fs::write(path, content).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}
