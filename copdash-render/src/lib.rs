//! copdash render: turns presentation plans into files.
//!
//! - HTML pages with a navigation sidebar (`html`)
//! - Markdown reports (`markdown`)
//! - Single-view and static-site export (`export`)
//! - Zip bundling of asset directories for download offers (`archive`)

pub mod archive;
pub mod error;
pub mod export;
pub mod html;
pub mod markdown;

pub use archive::{bundle_directory, BundleSummary};
pub use error::{ArchiveError, RenderError};
pub use export::{export_site, export_view, ExportedPage, OutputFormat, SiteExport, SiteManifest};
pub use html::{page_file_name, HtmlRenderer};
pub use markdown::MarkdownReportGenerator;
