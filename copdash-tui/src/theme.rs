//! Clinical theme tokens for the copdash TUI
//!
//! # Color Palette
//! - **Accent**: Teal (focus, active page, info messages)
//! - **Positive**: Green (present assets, enabled sections)
//! - **Negative**: Red (errors)
//! - **Warning**: Amber (unavailable assets, warnings)
//! - **Neutral**: Lavender (archive offers, fragments)
//! - **Muted**: Gray-blue (hints, disabled toggles)

use ratatui::style::{Color, Modifier, Style};

use copdash_core::{AssetKind, PlanItem};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::clinical()
    }
}

impl Theme {
    pub fn clinical() -> Self {
        Self {
            accent: Color::Rgb(38, 166, 154),
            positive: Color::Rgb(102, 187, 106),
            negative: Color::Rgb(239, 83, 80),
            warning: Color::Rgb(255, 179, 0),
            neutral: Color::Rgb(179, 157, 219),
            muted: Color::Rgb(120, 144, 156),
            text_primary: Color::White,
            text_secondary: Color::Rgb(176, 190, 197),
        }
    }

    /// Color for the marker in front of a plan item.
    pub fn item_color(&self, item: &PlanItem) -> Color {
        match item {
            PlanItem::Text(_) => self.text_secondary,
            PlanItem::Asset(r) if r.kind == AssetKind::HtmlFragment => self.neutral,
            PlanItem::Asset(_) => self.positive,
            PlanItem::Unavailable(_) => self.warning,
            PlanItem::Download(_) => self.neutral,
        }
    }

    /// Color for a section toggle in the sidebar.
    pub fn toggle_color(&self, enabled: bool) -> Color {
        if enabled {
            self.positive
        } else {
            self.muted
        }
    }
}

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn neutral() -> Style {
    Style::default().fg(Theme::default().neutral)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn heading() -> Style {
    Style::default()
        .fg(Theme::default().text_primary)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copdash_core::{AssetReference, MissingReason, TextBlock, UnavailableAsset};

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.accent, Color::Rgb(38, 166, 154));
    }

    #[test]
    fn test_item_color() {
        let theme = Theme::default();
        let image = AssetReference::new("a/b.png", "B", AssetKind::StaticImage);
        let fragment = AssetReference::new("a/b.html", "B", AssetKind::HtmlFragment);
        assert_eq!(theme.item_color(&PlanItem::Asset(image.clone())), theme.positive);
        assert_eq!(theme.item_color(&PlanItem::Asset(fragment)), theme.neutral);
        assert_eq!(
            theme.item_color(&PlanItem::Unavailable(UnavailableAsset {
                reference: image,
                reason: MissingReason::NotFound,
            })),
            theme.warning
        );
        assert_eq!(
            theme.item_color(&PlanItem::Text(TextBlock::body("x"))),
            theme.text_secondary
        );
    }

    #[test]
    fn test_panel_styles() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
        assert!(panel_title(true).add_modifier.contains(Modifier::BOLD));
    }
}
