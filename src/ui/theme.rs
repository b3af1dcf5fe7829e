//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::ColorState;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Background of a quadrant whose green expression holds.
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    /// Text drawn on top of a colored quadrant.
    pub on_color: Color,
    /// Color for borders and neutral quadrants.
    pub border: Color,
    /// Style for the header bar.
    pub header: Style,
    /// Style for the last-update time once the data is outdated.
    pub stale: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            green: Color::Green,
            yellow: Color::Yellow,
            red: Color::Red,
            on_color: Color::Black,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            stale: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            green: Color::LightGreen,
            yellow: Color::LightYellow,
            red: Color::LightRed,
            on_color: Color::Black,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            stale: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Background color for a quadrant, if it has one.
    pub fn background(&self, state: ColorState) -> Option<Color> {
        match state {
            ColorState::None => None,
            ColorState::Green => Some(self.green),
            ColorState::Yellow => Some(self.yellow),
            ColorState::Red => Some(self.red),
        }
    }

    /// Style for the body of a quadrant.
    pub fn quadrant_style(&self, state: ColorState) -> Style {
        match self.background(state) {
            Some(bg) => Style::default().bg(bg).fg(self.on_color),
            None => Style::default(),
        }
    }

    /// Style for a quadrant's border.
    pub fn quadrant_border(&self, state: ColorState) -> Style {
        let style = Style::default().fg(self.background(state).unwrap_or(self.border));
        if state == ColorState::Red {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_styles() {
        let theme = Theme::dark();
        assert_eq!(theme.quadrant_style(ColorState::None), Style::default());
        assert_eq!(theme.quadrant_style(ColorState::Yellow).bg, Some(Color::Yellow));
        assert_eq!(theme.quadrant_border(ColorState::None).fg, Some(Color::Gray));
        assert!(theme
            .quadrant_border(ColorState::Red)
            .add_modifier
            .contains(Modifier::BOLD));
    }
}
