//! Keyboard input dispatch: overlays, then global keys, then view keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use copdash_core::{AssetProbe, Page, Section};

use crate::app::{AppState, Overlay};

const PAGE_STEP: u16 = 10;

/// Handle a key event.
pub fn handle_key<P: AssetProbe>(app: &mut AppState<P>, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
            ) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(page) = Page::from_index(index) {
                app.set_page(page);
            }
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.set_page(app.nav.page.prev());
            } else {
                app.set_page(app.nav.page.next());
            }
        }
        KeyCode::BackTab => app.set_page(app.nav.page.prev()),
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('m') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }
        KeyCode::Char('r') => {
            app.status_message = None;
            app.refresh();
            if app.status_message.is_none() {
                app.set_status("Refreshed");
            }
        }
        _ => handle_view_key(app, key),
    }
}

/// Selector, export and scroll keys for the current view.
fn handle_view_key<P: AssetProbe>(app: &mut AppState<P>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('d') => app.cycle_data_type(),
        KeyCode::Char('l') => app.toggle_section(Section::LogisticRegression),
        KeyCode::Char('x') => app.toggle_section(Section::XGBoost),
        KeyCode::Char('s') => app.toggle_section(Section::ShapAnalysis),
        KeyCode::Char('c') => app.toggle_section(Section::ComparativeInsights),
        KeyCode::Char('b') => app.bundle_archive(),
        KeyCode::Char('e') => app.export_html(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(PAGE_STEP),
        KeyCode::PageUp => app.scroll_up(PAGE_STEP),
        KeyCode::Home | KeyCode::Char('g') => app.scroll = 0,
        _ => {}
    }
}

fn handle_error_overlay<P: AssetProbe>(app: &mut AppState<P>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
