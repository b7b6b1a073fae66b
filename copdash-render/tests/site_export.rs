//! Static site and single-view export against an asset tree on disk.

use std::fs;
use std::path::{Path, PathBuf};

use copdash_core::{
    builtin_table, AssetKind, AssumePresent, DataType, DataTypeFilter, NavigationState, Page,
    Router, Section,
};
use copdash_render::{export_site, export_view, page_file_name, OutputFormat, SiteManifest};

fn populate(dir: &Path) -> PathBuf {
    let root = dir.join("assets");
    let lister = Router::with_probe(builtin_table(), &root, AssumePresent).unwrap();
    for reference in lister.all_references() {
        fs::create_dir_all(reference.relative_path.parent().unwrap()).unwrap();
        match reference.kind {
            AssetKind::StaticImage => fs::write(&reference.relative_path, b"\x89PNG").unwrap(),
            AssetKind::HtmlFragment => {
                fs::write(&reference.relative_path, "<div class=\"force\">plot</div>").unwrap()
            }
        }
    }
    root
}

fn zip_names(path: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn site_has_every_page_and_filter() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let out = dir.path().join("site");
    let router = Router::new(builtin_table(), &root).unwrap();

    let export = export_site(&router, &out).unwrap();

    assert_eq!(
        export.manifest.pages.len(),
        Page::ALL.len() * DataTypeFilter::CHOICES.len()
    );
    for page in Page::ALL {
        for filter in DataTypeFilter::CHOICES {
            assert!(out.join(page_file_name(page, filter)).is_file());
        }
    }
    assert!(export.manifest.pages.iter().all(|p| p.unavailable == 0));

    let manifest: SiteManifest =
        serde_json::from_str(&fs::read_to_string(&export.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.archives, vec!["EDA_images.zip"]);
}

#[test]
fn site_copies_images_and_inlines_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let out = dir.path().join("site");
    let router = Router::new(builtin_table(), &root).unwrap();

    let export = export_site(&router, &out).unwrap();
    assert!(export.copied_assets > 0);
    assert!(out.join("assets/Imputed/XGB_imputed.png").is_file());
    assert!(!out.join("assets/SHAP/Raw/html/force_plot_xgb.html").exists());

    let page = fs::read_to_string(out.join("dashboard-imputed.html")).unwrap();
    assert!(page.contains(r#"src="assets/Imputed/XGB_imputed.png""#));
    assert!(page.contains(r#"<div class="force">plot</div>"#));
    assert!(!page.contains("LR_raw"));
}

#[test]
fn site_bundles_eda_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let out = dir.path().join("site");
    let router = Router::new(builtin_table(), &root).unwrap();

    export_site(&router, &out).unwrap();

    let names = zip_names(&out.join("EDA_images.zip"));
    assert!(names.contains(&"class_balance.png".to_string()));
    assert!(names.contains(&"Raw/feature_distributions_raw.png".to_string()));
    assert!(names.iter().all(|n| !n.contains('\\')));
}

#[test]
fn missing_asset_shows_warning_in_site() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    fs::remove_file(root.join("Raw").join("XGB_raw.png")).unwrap();
    let out = dir.path().join("site");
    let router = Router::new(builtin_table(), &root).unwrap();

    let export = export_site(&router, &out).unwrap();

    let raw = export
        .manifest
        .pages
        .iter()
        .find(|p| p.page == Page::Dashboard && p.data_type_filter == DataTypeFilter::Only(DataType::Raw))
        .unwrap();
    assert_eq!(raw.unavailable, 1);
    let page = fs::read_to_string(out.join(&raw.file)).unwrap();
    assert!(page.contains("XGBoost for Raw Data is unavailable"));
}

#[test]
fn single_view_as_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let router = Router::new(builtin_table(), &root).unwrap();
    let state = NavigationState::new(Page::Dashboard, DataTypeFilter::Only(DataType::Imputed))
        .with_section(Section::XGBoost);
    let output = dir.path().join("report").join("imputed.md");

    let plan = export_view(&router, &state, &output, OutputFormat::Markdown).unwrap();
    assert_eq!(plan.len(), 2);

    let report = fs::read_to_string(&output).unwrap();
    assert!(report.contains("XGBoost for Imputed Data"));
}

#[test]
fn single_view_bundles_offered_archive() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let router = Router::new(builtin_table(), &root).unwrap();
    let state = NavigationState::new(Page::Eda, DataTypeFilter::All);
    let output = dir.path().join("out").join("eda.html");

    export_view(&router, &state, &output, OutputFormat::Html).unwrap();
    assert!(dir.path().join("out").join("EDA_images.zip").is_file());
}

#[test]
fn single_view_images_resolve_from_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let root = populate(dir.path());
    let router = Router::new(builtin_table(), &root).unwrap();
    let state = NavigationState::new(Page::Dashboard, DataTypeFilter::Only(DataType::Imputed))
        .with_section(Section::XGBoost);
    let out_dir = dir.path().join("out");

    export_view(&router, &state, &out_dir.join("view.html"), OutputFormat::Html).unwrap();
    let page = fs::read_to_string(out_dir.join("view.html")).unwrap();
    assert!(page.contains(r#"src="../assets/Imputed/XGB_imputed.png""#));
    assert!(out_dir.join("../assets/Imputed/XGB_imputed.png").is_file());

    export_view(&router, &state, &out_dir.join("view.md"), OutputFormat::Markdown).unwrap();
    let report = fs::read_to_string(out_dir.join("view.md")).unwrap();
    assert!(report.contains("(../assets/Imputed/XGB_imputed.png)"));
}

#[test]
fn output_format_parses() {
    assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
    assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    assert!("pdf".parse::<OutputFormat>().is_err());
}
