//! Chrome color palette

use ratatui::style::Color;

/// Semantic colors used by the built-in chrome.
///
/// Integrators map their application theme onto this palette; the default
/// is a neutral dark scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupTheme {
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub accent: Color,
    /// Fill drawn behind modal chrome to dim the obscured UI.
    pub backdrop: Color,
}

impl Default for PopupTheme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            title: Color::White,
            text: Color::Gray,
            accent: Color::Cyan,
            backdrop: Color::Black,
        }
    }
}
