//! Bottom status bar: current selection, last status message, key hints.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use copdash_core::AssetProbe;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        format!(" {} · {}", app.nav.page.label(), app.nav.data_type_filter.label()),
        theme::accent(),
    ));
    if let Some(plan) = &app.plan {
        spans.push(Span::styled(
            format!(" · {}", plan.fingerprint().get(..8).unwrap_or("")),
            theme::muted(),
        ));
    }

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
        spans.push(Span::raw(" | "));
    }

    spans.push(Span::styled("?:help b:zip e:export q:quit", theme::muted()));

    let line = Line::from(spans);
    let para = Paragraph::new(line);
    f.render_widget(para, area);
}
