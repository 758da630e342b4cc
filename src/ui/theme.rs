//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Dimmed text: placeholder, secondary lines, empty state.
    pub muted: Color,
    /// Border color while the input has focus.
    pub border_focused: Color,
    /// Border color otherwise.
    pub border: Color,
    /// Background of the active suggestion row.
    pub highlight: Color,
    /// Background of tag chips.
    pub tag: Color,
    /// Background of the keyboard-focused tag chip.
    pub tag_focused: Color,
    /// Checkbox color for selected suggestions.
    pub checked: Color,
    /// Background of matched substrings.
    pub matched: Color,
    /// Error text.
    pub error: Color,
}

impl Theme {
    /// Theme for dark terminals.
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            border_focused: Color::Yellow,
            border: Color::DarkGray,
            highlight: Color::DarkGray,
            tag: Color::Blue,
            tag_focused: Color::Red,
            checked: Color::Green,
            matched: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Theme for light terminals.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            muted: Color::Gray,
            border_focused: Color::Blue,
            border: Color::Gray,
            highlight: Color::Gray,
            tag: Color::Cyan,
            tag_focused: Color::Magenta,
            checked: Color::Green,
            matched: Color::LightYellow,
            error: Color::Red,
        }
    }

    /// Look up a theme by name, falling back to dark.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style of a matched substring.
    pub fn match_style(&self) -> Style {
        Style::default()
            .bg(self.matched)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of the active suggestion row.
    pub fn active_style(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a tag chip.
    pub fn tag_style(&self, focused: bool) -> Style {
        let bg = if focused { self.tag_focused } else { self.tag };
        Style::default().fg(Color::White).bg(bg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
