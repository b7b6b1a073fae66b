//! Sidebar: page list, data-type selector, section toggles.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use copdash_core::{AssetProbe, DataTypeFilter, NavigationState, Page, Section};

use crate::app::AppState;
use crate::theme::{self, Theme};

pub fn render<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let para = Paragraph::new(sidebar_lines(&app.nav));
    f.render_widget(para, area);
}

fn sidebar_lines(nav: &NavigationState) -> Vec<Line<'static>> {
    let theme = Theme::default();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled("Pages", theme::accent_bold())));
    for page in Page::ALL {
        let active = page == nav.page;
        let marker = if active { "▸" } else { " " };
        let style = if active {
            theme::accent_bold()
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} {} ", page.index() + 1), theme::muted()),
            Span::styled(page.label(), style),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Data type ", theme::accent_bold()),
        Span::styled("[d]", theme::muted()),
    ]));
    for filter in DataTypeFilter::CHOICES {
        let selected = filter == nav.data_type_filter;
        let (radio, style) = if selected {
            ("(•)", theme::accent())
        } else {
            ("( )", theme::muted())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {radio} "), style),
            Span::styled(filter.label(), style),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Sections", theme::accent_bold())));
    for section in Section::ALL {
        let on = nav.is_enabled(section);
        let check = if on { "[x]" } else { "[ ]" };
        let style = Style::default().fg(theme.toggle_color(on));
        lines.push(Line::from(vec![
            Span::styled(format!("  {check} "), style),
            Span::styled(section.label(), style),
            Span::styled(
                format!(" ({})", toggle_key(section)),
                theme::muted().add_modifier(Modifier::DIM),
            ),
        ]));
    }

    lines
}

fn toggle_key(section: Section) -> char {
    match section {
        Section::LogisticRegression => 'l',
        Section::XGBoost => 'x',
        Section::ShapAnalysis => 's',
        Section::ComparativeInsights => 'c',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copdash_core::DataType;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn marks_active_page_and_filter() {
        let nav = NavigationState::new(Page::Eda, DataTypeFilter::Only(DataType::Imputed))
            .with_section(Section::XGBoost);
        let lines: Vec<String> = sidebar_lines(&nav).iter().map(plain).collect();

        assert!(lines.iter().any(|l| l.contains("▸ 3 EDA")));
        assert!(lines.iter().any(|l| l.contains("(•) Imputed")));
        assert!(lines.iter().any(|l| l.contains("[x] XGBoost")));
        assert!(lines.iter().any(|l| l.contains("[ ] Logistic Regression")));
    }
}
