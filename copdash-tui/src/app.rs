//! Application state, owned by the main thread.
//!
//! The navigation state is owned here and handed to the router on every
//! change; the resolved plan is cached until the next change or refresh.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use copdash_core::{
    AssetProbe, FsProbe, NavigationState, Page, PlanItem, PresentationPlan, Router, Section,
};
use copdash_render::{bundle_directory, export_view, page_file_name, OutputFormat};
use tracing::{info, warn};

/// Errors kept in the history overlay.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Routing,
    Archive,
    Export,
    Logging,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Routing => "ROUTE",
            ErrorCategory::Archive => "ZIP",
            ErrorCategory::Export => "EXPORT",
            ErrorCategory::Logging => "LOG",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState<P: AssetProbe = FsProbe> {
    pub running: bool,
    pub nav: NavigationState,
    pub router: Router<P>,

    /// Plan for `nav`, or `None` when resolution failed.
    pub plan: Option<PresentationPlan>,
    pub scroll: u16,

    pub overlay: Overlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,

    /// Where `b` and `e` write their files.
    pub export_dir: PathBuf,
}

impl<P: AssetProbe> AppState<P> {
    pub fn new(router: Router<P>, export_dir: PathBuf) -> Self {
        let mut app = Self {
            running: true,
            nav: NavigationState::default(),
            router,
            plan: None,
            scroll: 0,
            overlay: Overlay::None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            export_dir,
        };
        app.refresh();
        app
    }

    /// Re-resolve the plan for the current navigation state. Also picks up
    /// assets added or removed on disk since the last pass.
    pub fn refresh(&mut self) {
        match self.router.resolve_plan(&self.nav) {
            Ok(plan) => {
                let missing = plan.unavailable().count();
                if missing > 0 {
                    self.set_warning(format!(
                        "{missing} of {} assets unavailable",
                        plan.asset_slots().count()
                    ));
                }
                self.plan = Some(plan);
            }
            Err(e) => {
                self.plan = None;
                self.push_error(ErrorCategory::Routing, e.to_string(), self.nav.page.label().into());
            }
        }
    }

    /// Replace the navigation state, e.g. with one restored from disk.
    pub fn restore(&mut self, nav: NavigationState) {
        self.nav = nav;
        self.scroll = 0;
        self.refresh();
    }

    pub fn set_page(&mut self, page: Page) {
        if self.nav.page == page {
            return;
        }
        self.nav.page = page;
        self.scroll = 0;
        self.status_message = None;
        self.refresh();
    }

    pub fn cycle_data_type(&mut self) {
        self.nav.data_type_filter = self.nav.data_type_filter.cycle();
        self.scroll = 0;
        self.set_status(format!("Data type: {}", self.nav.data_type_filter.label()));
        self.refresh();
    }

    pub fn toggle_section(&mut self, section: Section) {
        let on = self.nav.toggle(section);
        self.set_status(format!(
            "{} {}",
            section.label(),
            if on { "shown" } else { "hidden" }
        ));
        self.refresh();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Bundle the archive offered on the current page into the export directory.
    pub fn bundle_archive(&mut self) {
        let offer = self.plan.as_ref().and_then(|plan| {
            plan.items.iter().find_map(|item| match item {
                PlanItem::Download(offer) => Some(offer.clone()),
                _ => None,
            })
        });
        let Some(offer) = offer else {
            self.set_warning(format!("{} offers no archive", self.nav.page.label()));
            return;
        };

        let dest = self.export_dir.join(&offer.archive_name);
        match bundle_directory(&offer.source_dir, &dest) {
            Ok(summary) => {
                info!(archive = %dest.display(), entries = summary.entries.len(), "bundled from TUI");
                self.set_status(format!(
                    "Wrote {} ({} files)",
                    dest.display(),
                    summary.entries.len()
                ));
            }
            Err(e) => {
                warn!(error = %e, "bundle failed");
                self.push_error(ErrorCategory::Archive, e.to_string(), offer.label);
            }
        }
    }

    /// Export the current view as a standalone HTML page.
    pub fn export_html(&mut self) {
        let output = self
            .export_dir
            .join(page_file_name(self.nav.page, self.nav.data_type_filter));
        match export_view(&self.router, &self.nav, &output, OutputFormat::Html) {
            Ok(_) => self.set_status(format!("Exported {}", output.display())),
            Err(e) => self.push_error(
                ErrorCategory::Export,
                e.to_string(),
                output.display().to_string(),
            ),
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use copdash_core::{builtin_table, AssumePresent, DataType, DataTypeFilter, KnownAssets};

    pub(crate) fn test_app() -> AppState<AssumePresent> {
        let router = Router::with_probe(builtin_table(), "assets", AssumePresent).unwrap();
        AppState::new(router, PathBuf::from("."))
    }

    #[test]
    fn starts_on_overview_with_plan() {
        let app = test_app();
        assert_eq!(app.nav.page, Page::Overview);
        assert!(app.plan.as_ref().is_some_and(|p| !p.is_empty()));
    }

    #[test]
    fn toggling_section_changes_plan() {
        let mut app = test_app();
        app.set_page(Page::Dashboard);
        let before = app.plan.as_ref().unwrap().len();

        app.toggle_section(Section::XGBoost);
        assert!(!app.nav.is_enabled(Section::XGBoost));
        assert!(app.plan.as_ref().unwrap().len() < before);

        app.toggle_section(Section::XGBoost);
        assert_eq!(app.plan.as_ref().unwrap().len(), before);
    }

    #[test]
    fn cycling_data_type_wraps() {
        let mut app = test_app();
        for _ in 0..DataTypeFilter::CHOICES.len() {
            app.cycle_data_type();
        }
        assert_eq!(app.nav.data_type_filter, DataTypeFilter::All);
        app.cycle_data_type();
        assert_eq!(app.nav.data_type_filter, DataTypeFilter::Only(DataType::Raw));
    }

    #[test]
    fn missing_assets_raise_warning() {
        let router = Router::with_probe(builtin_table(), "assets", KnownAssets::default()).unwrap();
        let mut app = AppState::new(router, PathBuf::from("."));
        app.set_page(Page::Dashboard);
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn unrouted_page_records_error() {
        let mut table = builtin_table();
        table.pages.retain(|r| r.page != Page::Eda);
        let router = Router::with_probe(table, "assets", AssumePresent).unwrap();
        let mut app = AppState::new(router, PathBuf::from("."));

        app.set_page(Page::Eda);
        assert!(app.plan.is_none());
        assert_eq!(app.error_history[0].category, ErrorCategory::Routing);
    }

    #[test]
    fn bundle_without_offer_warns() {
        let mut app = test_app();
        app.bundle_archive();
        let (_, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
    }

    #[test]
    fn bundle_writes_archive_to_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let eda = dir.path().join("assets").join("EDA");
        std::fs::create_dir_all(&eda).unwrap();
        std::fs::write(eda.join("class_balance.png"), b"png").unwrap();
        let router =
            Router::with_probe(builtin_table(), dir.path().join("assets"), AssumePresent).unwrap();
        let out = dir.path().join("out");
        let mut app = AppState::new(router, out.clone());

        app.set_page(Page::Eda);
        app.bundle_archive();
        assert!(out.join("EDA_images.zip").is_file());
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Info);
    }

    #[test]
    fn export_writes_current_view() {
        let dir = tempfile::tempdir().unwrap();
        let router = Router::with_probe(builtin_table(), "assets", AssumePresent).unwrap();
        let mut app = AppState::new(router, dir.path().to_path_buf());

        app.export_html();
        assert!(dir.path().join("index.html").is_file());
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Export, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), ERROR_HISTORY_CAP);
        assert!(app.error_history[0].message.contains("59"));
    }
}
