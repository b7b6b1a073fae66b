//! Top-level UI layout: sidebar + content, status bar, overlays.

pub mod content;
pub mod overlays;
pub mod sidebar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use copdash_core::AssetProbe;

use crate::app::{AppState, Overlay};
use crate::theme;

const SIDEBAR_WIDTH: u16 = 30;

/// Draw the entire UI.
pub fn draw<P: AssetProbe>(f: &mut Frame, app: &AppState<P>) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(main_area);

    draw_sidebar(f, columns[0], app);
    draw_content(f, columns[1], app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn draw_sidebar<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" COPD Dashboard ")
        .title_style(theme::panel_title(false));

    let inner = block.inner(area);
    f.render_widget(block, area);
    sidebar::render(f, inner, app);
}

fn draw_content<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let title = match &app.plan {
        Some(plan) => format!(" {} [{}] ", plan.title, app.nav.page.index() + 1),
        None => format!(" {} [{}] ", app.nav.page.label(), app.nav.page.index() + 1),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);
    content::render(f, inner, app);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use copdash_core::Page;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text<P: AssetProbe>(app: &AppState<P>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn draws_sidebar_and_plan() {
        let mut app = test_app();
        app.set_page(Page::Dashboard);
        let text = screen_text(&app);
        assert!(text.contains("COPD Dashboard"));
        assert!(text.contains("Model Results"));
        assert!(text.contains("XGBoost for Raw Data"));
    }

    #[test]
    fn help_overlay_draws_on_top() {
        let mut app = test_app();
        app.overlay = Overlay::Help;
        let text = screen_text(&app);
        assert!(text.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!((popup.x, popup.width), (20, 60));
        assert_eq!((popup.y, popup.height), (15, 20));
    }
}
