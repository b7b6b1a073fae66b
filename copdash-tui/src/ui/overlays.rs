//! Overlay widgets: keyboard help and error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use copdash_core::AssetProbe;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// Keyboard help. Also shown on first launch.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keyboard Shortcuts [Esc]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Pages");
    key(&mut lines, "1-5", "Jump to page by number");
    key(&mut lines, "Tab / Shift+Tab", "Next / previous page");
    lines.push(Line::from(""));

    section(&mut lines, "Selectors");
    key(&mut lines, "d", "Cycle data type (All → Raw → Imputed → Imputed + Transformed)");
    key(&mut lines, "l", "Toggle Logistic Regression");
    key(&mut lines, "x", "Toggle XGBoost");
    key(&mut lines, "s", "Toggle SHAP Analysis");
    key(&mut lines, "c", "Toggle Comparative Insights");
    lines.push(Line::from(""));

    section(&mut lines, "View");
    key(&mut lines, "j / k", "Scroll down / up");
    key(&mut lines, "PgDn / PgUp", "Scroll by page");
    key(&mut lines, "g / Home", "Back to top");
    key(&mut lines, "r", "Re-check assets on disk");
    lines.push(Line::from(""));

    section(&mut lines, "Export");
    key(&mut lines, "b", "Bundle the offered archive into the export directory");
    key(&mut lines, "e", "Export the current view as HTML");
    lines.push(Line::from(""));

    section(&mut lines, "Other");
    key(&mut lines, "m", "Error history");
    key(&mut lines, "?", "This help");
    key(&mut lines, "q", "Quit");

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Error history overlay.
pub fn render_error_history<P: AssetProbe>(f: &mut Frame, area: Rect, app: &AppState<P>) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, inner);
}
