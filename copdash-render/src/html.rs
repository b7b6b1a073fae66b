//! HTML rendering of presentation plans.
//!
//! Produces self-contained pages (inline CSS and JavaScript) with a sidebar
//! for navigation and a main column holding the plan. Section checkboxes hide
//! and show section content client-side; switching page or data type follows
//! a link to another exported page.

use std::fs;
use std::path::{Path, PathBuf};

use copdash_core::asset::path_to_slash;
use copdash_core::{
    ArchiveOffer, AssetKind, AssetReference, DataTypeFilter, NavigationState, Page, PlanItem,
    PresentationPlan, Section, TextBlock, UnavailableAsset,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::warn;

/// Height of the scrollable container around embedded fragments.
pub const DEFAULT_FRAGMENT_HEIGHT_PX: u32 = 600;

/// File name of the exported page for a page and data-type filter.
///
/// The Overview with every data type is the site entry point.
pub fn page_file_name(page: Page, filter: DataTypeFilter) -> String {
    match (page, filter) {
        (Page::Overview, DataTypeFilter::All) => "index.html".to_string(),
        _ => format!("{}-{}.html", page.slug(), filter.slug()),
    }
}

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    asset_root: PathBuf,
    asset_url_prefix: String,
}

impl HtmlRenderer {
    /// Image URLs default to the asset paths as resolved, which only work for
    /// a page written to the working directory.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        let asset_root = asset_root.into();
        let asset_url_prefix = path_to_slash(&asset_root);
        Self {
            asset_root,
            asset_url_prefix,
        }
    }

    /// Serve images from `prefix` instead of the asset root, e.g. when the
    /// tree has been copied next to the exported pages.
    pub fn with_asset_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_url_prefix = prefix.into();
        self
    }

    /// Path of an asset below the asset root.
    pub fn asset_relative<'a>(&self, reference: &'a AssetReference) -> &'a Path {
        reference
            .relative_path
            .strip_prefix(&self.asset_root)
            .unwrap_or(&reference.relative_path)
    }

    pub fn asset_url(&self, reference: &AssetReference) -> String {
        let relative = path_to_slash(self.asset_relative(reference));
        if self.asset_url_prefix.is_empty() {
            relative
        } else {
            format!("{}/{}", self.asset_url_prefix.trim_end_matches('/'), relative)
        }
    }

    /// Render a complete document for one navigation state.
    pub fn render_page(&self, state: &NavigationState, plan: &PresentationPlan) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {filter}</title>
    <style>{css}</style>
</head>
<body>
    {sidebar}
    <main class="content">
        <h1>{title}</h1>
        <p class="subtitle">{filter}</p>
        {body}
    </main>
    <script>{js}</script>
</body>
</html>"#,
            title = encode_text(&plan.title),
            filter = encode_text(state.data_type_filter.label()),
            css = inline_css(),
            js = inline_javascript(),
            sidebar = render_sidebar(state),
            body = self.render_body(plan),
        )
    }

    /// Render the plan items alone, wrapping section-gated runs so the
    /// sidebar checkboxes can toggle them.
    pub fn render_body(&self, plan: &PresentationPlan) -> String {
        if plan.is_empty() {
            return r#"<p class="empty">Nothing to show for the current selection.</p>"#.to_string();
        }

        let mut out = String::new();
        for (index, item) in plan.items.iter().enumerate() {
            if let Some(span) = plan.sections.iter().find(|s| s.start == index) {
                out.push_str(&format!(
                    r#"<section class="section" data-section="{}">"#,
                    span.section.slug()
                ));
            }
            out.push_str(&self.render_item(item));
            if plan.sections.iter().any(|s| s.end == index + 1) {
                out.push_str("</section>");
            }
            out.push('\n');
        }
        out
    }

    fn render_item(&self, item: &PlanItem) -> String {
        match item {
            PlanItem::Text(text) => render_text(text),
            PlanItem::Asset(reference) => match reference.kind {
                AssetKind::StaticImage => self.render_image(reference),
                AssetKind::HtmlFragment => self.render_fragment(reference),
            },
            PlanItem::Unavailable(missing) => render_unavailable(missing),
            PlanItem::Download(offer) => render_download(offer),
        }
    }

    fn render_image(&self, reference: &AssetReference) -> String {
        format!(
            r#"<figure class="asset"><img src="{src}" alt="{alt}" loading="lazy"><figcaption>{caption}</figcaption></figure>"#,
            src = encode_double_quoted_attribute(&self.asset_url(reference)),
            alt = encode_double_quoted_attribute(&reference.caption),
            caption = encode_text(&reference.caption),
        )
    }

    /// Fragments are embedded verbatim. A fragment that cannot be read now,
    /// even if it probed fine earlier, degrades to the inline warning.
    fn render_fragment(&self, reference: &AssetReference) -> String {
        match fs::read_to_string(&reference.relative_path) {
            Ok(fragment) => format!(
                r#"<figure class="fragment"><div class="fragment-frame" style="height:{height}px">{fragment}</div><figcaption>{caption}</figcaption></figure>"#,
                height = DEFAULT_FRAGMENT_HEIGHT_PX,
                caption = encode_text(&reference.caption),
            ),
            Err(e) => {
                warn!(path = %reference.display_path(), error = %e, "fragment unreadable at render time");
                warning_box(&format!(
                    "{} is unavailable: {} could not be read ({e})",
                    reference.caption,
                    reference.display_path()
                ))
            }
        }
    }
}

fn render_text(text: &TextBlock) -> String {
    let mut out = String::new();
    if let Some(heading) = &text.heading {
        out.push_str(&format!("<h2>{}</h2>", encode_text(heading)));
    }
    out.push_str(&markdown_to_html(&text.body));
    out
}

fn render_unavailable(missing: &UnavailableAsset) -> String {
    warning_box(&missing.message())
}

fn warning_box(message: &str) -> String {
    format!(
        r#"<div class="warning" role="alert">&#9888; {}</div>"#,
        encode_text(message)
    )
}

fn render_download(offer: &ArchiveOffer) -> String {
    format!(
        r#"<p class="download"><a href="{href}" download>{label}</a></p>"#,
        href = encode_double_quoted_attribute(&offer.archive_name),
        label = encode_text(&offer.label),
    )
}

fn render_sidebar(state: &NavigationState) -> String {
    let mut pages = String::new();
    for page in Page::ALL {
        let class = if page == state.page { r#" class="active""# } else { "" };
        pages.push_str(&format!(
            r#"<li><a href="{}"{class}>{}</a></li>"#,
            page_file_name(page, state.data_type_filter),
            encode_text(page.label())
        ));
    }

    let mut filters = String::new();
    for filter in DataTypeFilter::CHOICES {
        let class = if filter == state.data_type_filter {
            r#" class="active""#
        } else {
            ""
        };
        filters.push_str(&format!(
            r#"<li><a href="{}"{class}>{}</a></li>"#,
            page_file_name(state.page, filter),
            encode_text(filter.label())
        ));
    }

    let mut toggles = String::new();
    for section in Section::ALL {
        let attrs = if state.is_enabled(section) {
            "checked"
        } else {
            r#"disabled title="Not included in this export""#
        };
        toggles.push_str(&format!(
            r#"<label><input type="checkbox" data-toggle="{}" {attrs}> {}</label>"#,
            section.slug(),
            encode_text(section.label())
        ));
    }

    format!(
        r#"<nav class="sidebar">
        <h2>Pages</h2>
        <ul>{pages}</ul>
        <h2>Select Data Type</h2>
        <ul>{filters}</ul>
        <h2>Sections</h2>
        <div class="toggles">{toggles}</div>
    </nav>"#
    )
}

/// Escape and convert the markdown subset used in narrative text:
/// blank-line separated paragraphs, `- ` bullet lists and `**bold**`.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    for block in markdown.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }
        if lines.iter().all(|l| l.starts_with("- ")) {
            out.push_str("<ul>");
            for line in lines {
                out.push_str(&format!("<li>{}</li>", inline_markdown(&line[2..])));
            }
            out.push_str("</ul>");
        } else {
            out.push_str(&format!("<p>{}</p>", inline_markdown(&lines.join(" "))));
        }
    }
    out
}

fn inline_markdown(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    // An odd number of parts means every `**` is paired.
    if parts.len() % 2 == 0 {
        return encode_text(text).into_owned();
    }
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("<strong>{}</strong>", encode_text(part))
            } else {
                encode_text(part).into_owned()
            }
        })
        .collect()
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { margin: 0; display: flex; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; color: #262730; background: #ffffff; }
.sidebar { width: 260px; min-height: 100vh; padding: 1.5rem 1rem; background: #f0f2f6; flex-shrink: 0; }
.sidebar h2 { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; color: #6b6f7b; margin: 1.5rem 0 0.5rem; }
.sidebar ul { list-style: none; padding: 0; margin: 0; }
.sidebar li a { display: block; padding: 0.35rem 0.6rem; border-radius: 4px; color: #262730; text-decoration: none; }
.sidebar li a:hover { background: #e2e5eb; }
.sidebar li a.active { background: #ff4b4b; color: #ffffff; }
.toggles label { display: block; padding: 0.25rem 0; }
.content { flex: 1; max-width: 1000px; padding: 2rem 3rem; }
.subtitle { color: #6b6f7b; margin-top: -0.5rem; }
figure { margin: 1.5rem 0; }
figure img { max-width: 100%; border: 1px solid #e2e5eb; }
figcaption { color: #6b6f7b; font-size: 0.9rem; margin-top: 0.4rem; }
.fragment-frame { overflow: auto; border: 1px solid #e2e5eb; }
.warning { background: #fffbe6; border-left: 4px solid #faca2b; padding: 0.75rem 1rem; margin: 1rem 0; }
.download a { display: inline-block; padding: 0.5rem 1rem; border: 1px solid #ff4b4b; border-radius: 4px; color: #ff4b4b; text-decoration: none; }
.empty { color: #6b6f7b; font-style: italic; }
[hidden] { display: none !important; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
document.querySelectorAll('input[data-toggle]').forEach(function (box) {
    var apply = function () {
        document.querySelectorAll('[data-section="' + box.dataset.toggle + '"]').forEach(function (el) {
            el.hidden = !box.checked;
        });
    };
    box.addEventListener('change', apply);
    apply();
});
"#
}
