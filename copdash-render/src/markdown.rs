//! Markdown report generator.

use copdash_core::{AssetKind, NavigationState, PlanItem, PresentationPlan, Section};

use crate::html::HtmlRenderer;

/// Renders a plan as a markdown document. Image links use the same URLs as
/// the HTML renderer it wraps.
pub struct MarkdownReportGenerator {
    urls: HtmlRenderer,
}

impl MarkdownReportGenerator {
    pub fn new(urls: HtmlRenderer) -> Self {
        Self { urls }
    }

    pub fn generate(&self, state: &NavigationState, plan: &PresentationPlan) -> String {
        let sections: Vec<&str> = Section::ALL
            .into_iter()
            .filter(|s| state.is_enabled(*s))
            .map(Section::label)
            .collect();
        let mut report = format!(
            "# {}\n\n\
- Page: {}\n\
- Data type: {}\n\
- Sections: {}\n",
            escape_markdown(&plan.title),
            plan.page.label(),
            state.data_type_filter.label(),
            if sections.is_empty() {
                "none".to_string()
            } else {
                sections.join(", ")
            }
        );

        if plan.is_empty() {
            report.push_str("\n_Nothing to show for the current selection._\n");
            return report;
        }

        for item in &plan.items {
            report.push('\n');
            match item {
                PlanItem::Text(text) => {
                    if let Some(heading) = &text.heading {
                        report.push_str(&format!("## {}\n\n", escape_markdown(heading)));
                    }
                    report.push_str(text.body.trim());
                    report.push('\n');
                }
                PlanItem::Asset(reference) => match reference.kind {
                    AssetKind::StaticImage => report.push_str(&format!(
                        "![{caption}]({url})\n\n*{caption}*\n",
                        caption = escape_markdown(&reference.caption),
                        url = link_target(&self.urls.asset_url(reference))
                    )),
                    AssetKind::HtmlFragment => report.push_str(&format!(
                        "[{}]({}) (interactive)\n",
                        escape_markdown(&reference.caption),
                        link_target(&self.urls.asset_url(reference))
                    )),
                },
                PlanItem::Unavailable(missing) => {
                    report.push_str(&format!(
                        "> **Warning:** {}\n",
                        escape_markdown(&missing.message())
                    ));
                }
                PlanItem::Download(offer) => {
                    report.push_str(&format!(
                        "[{}]({})\n",
                        escape_markdown(&offer.label),
                        link_target(&offer.archive_name)
                    ));
                }
            }
        }

        let missing = plan.unavailable().count();
        if missing > 0 {
            report.push_str(&format!(
                "\n---\n\n{} of {} assets unavailable.\n",
                missing,
                plan.asset_slots().count()
            ));
        }
        report
    }
}

/// Backslash-escape characters that markdown would read as markup.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '(' | ')' | '#' | '!' | '<' | '>' | '|'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Percent-encode the characters that end or split a link destination.
fn link_target(url: &str) -> String {
    url.replace('%', "%25")
        .replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}
