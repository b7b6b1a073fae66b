//! Content panel: the resolved plan as a scrollable list.
//!
//! Images and fragments cannot be drawn in a terminal, so each asset slot is
//! shown as its caption and path. Placeholders keep their slot and show the
//! warning text in place.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use copdash_core::{AssetKind, AssetProbe, PlanItem, PresentationPlan};

use crate::app::AppState;
use crate::theme::{self, Theme};

pub fn render<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let lines = match &app.plan {
        Some(plan) => plan_lines(plan),
        None => vec![
            Line::from(Span::styled(
                format!("{} could not be resolved.", app.nav.page.label()),
                theme::negative(),
            )),
            Line::from(Span::styled("Press m for details.", theme::muted())),
        ],
    };

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(para, area);
}

/// One or more lines per plan item, in plan order.
pub fn plan_lines(plan: &PresentationPlan) -> Vec<Line<'static>> {
    if plan.is_empty() {
        return vec![Line::from(Span::styled(
            "Nothing to show for the current selection.",
            theme::muted(),
        ))];
    }

    let theme = Theme::default();
    let mut lines = Vec::new();
    for item in &plan.items {
        let marker = Style::default().fg(theme.item_color(item));
        match item {
            PlanItem::Text(text) => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                if let Some(heading) = &text.heading {
                    lines.push(Line::from(Span::styled(heading.clone(), theme::heading())));
                }
                for body_line in text.body.lines() {
                    lines.push(Line::from(Span::styled(body_line.to_string(), theme::text())));
                }
            }
            PlanItem::Asset(reference) => {
                let (icon, suffix) = match reference.kind {
                    AssetKind::StaticImage => ("■", ""),
                    AssetKind::HtmlFragment => ("◆", " (interactive)"),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {icon} "), marker),
                    Span::styled(reference.caption.clone(), theme::text()),
                    Span::styled(suffix, theme::neutral()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", reference.display_path()),
                    theme::muted(),
                )));
            }
            PlanItem::Unavailable(missing) => {
                lines.push(Line::from(vec![
                    Span::styled("  ⚠ ", marker),
                    Span::styled(missing.message(), theme::warning()),
                ]));
            }
            PlanItem::Download(offer) => {
                lines.push(Line::from(vec![
                    Span::styled("  ⇩ ", marker),
                    Span::styled(offer.label.clone(), theme::accent()),
                    Span::styled(
                        format!("  [b] writes {}", offer.archive_name),
                        theme::muted(),
                    ),
                ]));
            }
        }
    }

    let missing = plan.unavailable().count();
    if missing > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{missing} of {} assets unavailable.",
                plan.asset_slots().count()
            ),
            theme::warning(),
        )));
    }
    lines
}
