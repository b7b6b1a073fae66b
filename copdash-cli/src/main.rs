//! copdash CLI: resolve, render and export the COPD results dashboard.
//!
//! Commands:
//! - `plan`: print the presentation plan for one navigation state
//! - `render`: write one navigation state as HTML or markdown
//! - `site`: export every page and data type as a static site
//! - `bundle`: zip a directory (the EDA images by default)
//! - `check`: validate the routing table and list missing assets
//! - `pages`: list pages, data types and sections

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use copdash_core::{
    builtin_table, AssetProbe, AssetStatus, DataType, DataTypeFilter, NavigationState, Page, PlanItem,
    PresentationPlan, Router, RoutingTable, Section, DEFAULT_ASSET_ROOT, EDA_ARCHIVE_NAME,
    EDA_DIRECTORY,
};
use copdash_render::{bundle_directory, export_site, export_view, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "copdash",
    about = "copdash: COPD model results dashboard, rendered from pre-generated assets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where assets and the routing table come from.
#[derive(Args)]
struct SourceArgs {
    /// Asset root directory.
    #[arg(long, default_value = DEFAULT_ASSET_ROOT)]
    assets: PathBuf,

    /// TOML routing table replacing the built-in one.
    #[arg(long)]
    routes: Option<PathBuf>,
}

/// Sidebar selections.
#[derive(Args)]
struct ViewArgs {
    /// Page: overview, dashboard, eda, first-iteration, final-methodology.
    #[arg(long, default_value = "overview")]
    page: Page,

    /// Data type: raw, imputed, imputed-transformed, or all.
    #[arg(long, default_value = "all")]
    data_type: DataTypeFilter,

    /// Enabled section (repeatable): lr, xgboost, shap, comparative. All when omitted.
    #[arg(long = "section")]
    sections: Vec<Section>,
}

impl ViewArgs {
    fn state(&self) -> NavigationState {
        if self.sections.is_empty() {
            NavigationState {
                page: self.page,
                data_type_filter: self.data_type,
                ..NavigationState::default()
            }
        } else {
            NavigationState::new(self.page, self.data_type)
                .with_sections(self.sections.iter().copied())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the presentation plan for one navigation state.
    Plan {
        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the plan as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render one navigation state to a file.
    Render {
        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file.
        #[arg(long, default_value = "copdash.html")]
        output: PathBuf,

        /// Output format: html or markdown.
        #[arg(long, default_value = "html")]
        format: OutputFormat,
    },
    /// Export every page under every data type as a static site.
    Site {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory.
        #[arg(long, default_value = "site")]
        output: PathBuf,
    },
    /// Bundle a directory into a zip archive.
    Bundle {
        /// Directory to bundle. Defaults to the EDA folder under the asset root.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Archive path.
        #[arg(long, default_value = EDA_ARCHIVE_NAME)]
        output: PathBuf,

        /// Asset root, used when --dir is omitted.
        #[arg(long, default_value = DEFAULT_ASSET_ROOT)]
        assets: PathBuf,
    },
    /// Validate the routing table and list every missing asset.
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List pages, data types and sections.
    Pages,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { view, source, json } => run_plan(&view, &source, json),
        Commands::Render {
            view,
            source,
            output,
            format,
        } => run_render(&view, &source, &output, format),
        Commands::Site { source, output } => run_site(&source, &output),
        Commands::Bundle {
            dir,
            output,
            assets,
        } => run_bundle(dir, &output, &assets),
        Commands::Check { source } => run_check(&source),
        Commands::Pages => run_pages(),
    }
}

/// Logs go to stderr so `plan --json` output stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_router(source: &SourceArgs) -> Result<Router> {
    let table = match &source.routes {
        Some(path) => RoutingTable::from_file(path)?,
        None => builtin_table(),
    };
    Ok(Router::new(table, &source.assets)?)
}

fn run_plan(view: &ViewArgs, source: &SourceArgs, json: bool) -> Result<()> {
    let router = load_router(source)?;
    let state = view.state();
    let plan = router.resolve_plan(&state)?;

    if json {
        println!("{}", plan.to_json_pretty()?);
    } else {
        print_plan(&state, &plan);
    }
    Ok(())
}

fn run_render(
    view: &ViewArgs,
    source: &SourceArgs,
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    let router = load_router(source)?;
    let plan = export_view(&router, &view.state(), output, format)
        .with_context(|| format!("Failed to render {}", output.display()))?;

    println!(
        "Wrote {} ({} items, {} unavailable)",
        output.display(),
        plan.len(),
        plan.unavailable().count()
    );
    Ok(())
}

fn run_site(source: &SourceArgs, output: &Path) -> Result<()> {
    let router = load_router(source)?;
    let export = export_site(&router, output)
        .with_context(|| format!("Failed to export site to {}", output.display()))?;

    println!("Site: {}", export.output_dir.display());
    println!("Pages: {}", export.manifest.pages.len());
    println!("Images copied: {}", export.copied_assets);
    for archive in &export.manifest.archives {
        println!("Archive: {archive}");
    }
    println!();
    println!("{:<45} {:>7} {:>12}", "File", "Assets", "Unavailable");
    println!("{}", "-".repeat(66));
    for page in &export.manifest.pages {
        println!("{:<45} {:>7} {:>12}", page.file, page.assets, page.unavailable);
    }
    Ok(())
}

fn run_bundle(dir: Option<PathBuf>, output: &Path, assets: &Path) -> Result<()> {
    let dir = dir.unwrap_or_else(|| assets.join(EDA_DIRECTORY));
    let summary = bundle_directory(&dir, output)?;

    println!(
        "Bundled {} file(s) from {} into {} ({})",
        summary.entries.len(),
        dir.display(),
        summary.archive.display(),
        format_size(summary.bytes)
    );
    Ok(())
}

fn run_check(source: &SourceArgs) -> Result<()> {
    let router = load_router(source)?;
    let references = router.all_references();
    let routed = router.table().routed_pages();

    match &source.routes {
        Some(path) => println!("Routing table: {}", path.display()),
        None => println!("Routing table: built-in"),
    }
    println!("Pages routed: {}/{}", routed.len(), Page::ALL.len());
    for page in Page::ALL.into_iter().filter(|p| !routed.contains(p)) {
        println!("  not routed: {}", page.slug());
    }
    println!("Asset slots: {}", references.len());

    let mut missing = Vec::new();
    for reference in &references {
        let status = router.probe().probe(&reference.relative_path, reference.kind);
        if !status.is_present() {
            missing.push((reference, status));
        }
    }

    if missing.is_empty() {
        println!("All assets present under {}.", source.assets.display());
        return Ok(());
    }

    println!();
    println!("{:<60} {:<11} {}", "Asset", "Status", "Caption");
    println!("{}", "-".repeat(100));
    for (reference, status) in &missing {
        let status = match status {
            AssetStatus::Unreadable(_) => "unreadable",
            _ => "missing",
        };
        println!(
            "{:<60} {:<11} {}",
            reference.display_path(),
            status,
            reference.caption
        );
    }
    bail!("{} of {} assets missing or unreadable", missing.len(), references.len())
}

fn run_pages() -> Result<()> {
    println!("Pages:");
    for page in Page::ALL {
        println!("  {}  {:<20} {}", page.index() + 1, page.slug(), page.label());
    }
    println!();
    println!("Data types:");
    println!("  {:<22} {}", "all", DataTypeFilter::All.label());
    for dt in DataType::ALL {
        println!("  {:<22} {}  ({}/)", dt.token(), dt.label(), dt.folder());
    }
    println!();
    println!("Sections:");
    for section in Section::ALL {
        println!("  {:<22} {}", section.slug(), section.label());
    }
    Ok(())
}

fn print_plan(state: &NavigationState, plan: &PresentationPlan) {
    println!();
    println!("=== {} ===", plan.title);
    println!("Page:        {}", plan.page.label());
    println!("Data type:   {}", state.data_type_filter.label());
    let sections: Vec<&str> = Section::ALL
        .into_iter()
        .filter(|s| state.is_enabled(*s))
        .map(Section::label)
        .collect();
    let sections = if sections.is_empty() {
        "none".to_string()
    } else {
        sections.join(", ")
    };
    println!("Sections:    {sections}");
    println!("Fingerprint: {}", &plan.fingerprint()[..16]);
    println!();

    if plan.is_empty() {
        println!("(nothing to show for this selection)");
        return;
    }

    for (i, item) in plan.items.iter().enumerate() {
        let n = i + 1;
        match item {
            PlanItem::Text(text) => {
                let first_line = truncate(text.body.lines().next().unwrap_or(""), 60);
                match &text.heading {
                    Some(heading) => println!("{n:>3}. text      {heading}: {first_line}"),
                    None => println!("{n:>3}. text      {first_line}"),
                }
            }
            PlanItem::Asset(reference) => println!(
                "{n:>3}. {:<9} {}  [{}]",
                reference.kind.label(),
                reference.caption,
                reference.display_path()
            ),
            PlanItem::Unavailable(missing) => println!("{n:>3}. MISSING   {}", missing.message()),
            PlanItem::Download(offer) => println!(
                "{n:>3}. download  {} -> {} (from {})",
                offer.label,
                offer.archive_name,
                offer.source_dir.display()
            ),
        }
    }

    let missing = plan.unavailable().count();
    if missing > 0 {
        println!();
        println!("WARNING: {missing} of {} assets unavailable", plan.asset_slots().count());
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("copdash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn plan_flags_build_navigation_state() {
        let cli = parse(&["plan", "--page", "dashboard", "--data-type", "Imputed Data", "--section", "xgb"]);
        let Commands::Plan { view, .. } = cli.command else {
            panic!("Expected plan command");
        };
        let state = view.state();
        assert_eq!(state.page, Page::Dashboard);
        assert_eq!(state.data_type_filter, DataTypeFilter::Only(DataType::Imputed));
        assert_eq!(state.sections.len(), 1);
        assert!(state.is_enabled(Section::XGBoost));
    }

    #[test]
    fn omitted_sections_mean_all() {
        let cli = parse(&["render", "--page", "eda", "--format", "markdown"]);
        let Commands::Render { view, format, .. } = cli.command else {
            panic!("Expected render command");
        };
        assert_eq!(format, OutputFormat::Markdown);
        assert_eq!(view.state().sections.len(), Section::ALL.len());
    }

    #[test]
    fn unknown_page_is_rejected() {
        let result = Cli::try_parse_from(["copdash", "plan", "--page", "leaderboard"]);
        assert!(result.is_err());
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
