//! Bottom sheet chrome

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear},
};
use serde::{Deserialize, Serialize};

use super::layout;
use crate::factory::{FactoryScope, PopupFactory, PopupFactoryProvider};
use crate::metadata::Metadata;
use crate::registry::PopupEntry;
use crate::theme::PopupTheme;
use crate::Frame;

/// Metadata key owned by the bottom-sheet chrome.
pub const BOTTOM_SHEET_KEY: &str = "bottom_sheet";

/// Presentation options for bottom-sheet chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetProperties {
    /// Sheet height in cells, measured from the bottom edge.
    pub height: u16,
    /// Whether Esc dismisses the sheet.
    pub dismiss_on_esc: bool,
}

impl Default for SheetProperties {
    fn default() -> Self {
        Self {
            height: 10,
            dismiss_on_esc: true,
        }
    }
}

impl SheetProperties {
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    pub fn dismiss_on_esc(mut self, dismiss: bool) -> Self {
        self.dismiss_on_esc = dismiss;
        self
    }
}

/// Offers bottom-sheet chrome for entries carrying [`BOTTOM_SHEET_KEY`].
#[derive(Debug, Default)]
pub struct BottomSheetFactoryProvider;

impl BottomSheetFactoryProvider {
    pub fn new() -> Self {
        Self
    }

    /// Metadata marking an entry as sheet-rendered.
    pub fn metadata(properties: SheetProperties) -> Metadata {
        Metadata::new().with(BOTTOM_SHEET_KEY, properties)
    }
}

impl PopupFactoryProvider for BottomSheetFactoryProvider {
    fn create(&self, entry: &PopupEntry) -> Option<Box<dyn PopupFactory>> {
        let properties = entry
            .metadata()
            .get::<SheetProperties>(BOTTOM_SHEET_KEY)?
            .clone();
        Some(Box::new(BottomSheetFactory { properties }))
    }
}

struct BottomSheetFactory {
    properties: SheetProperties,
}

impl PopupFactory for BottomSheetFactory {
    fn render(
        &self,
        entry: &PopupEntry,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    ) {
        let container = layout::bottom_anchored(self.properties.height, area);
        frame.render_widget(Clear, container);

        let block = Block::default()
            .borders(Borders::TOP)
            .style(Style::default().fg(theme.border));
        frame.render_widget(block, container);

        let interior = Rect {
            x: container.x,
            y: container.y + 1,
            width: container.width,
            height: container.height.saturating_sub(1),
        };
        entry.render(frame, interior, theme, scope);
    }

    fn handle_key(&self, entry: &PopupEntry, key: KeyEvent, scope: &FactoryScope) -> bool {
        if self.properties.dismiss_on_esc
            && key.code == KeyCode::Esc
            && key.modifiers.is_empty()
        {
            scope.request_dismiss();
            return true;
        }
        if entry.handle_key(key, scope) {
            return true;
        }
        // Sheets are modal while shown; keys do not fall through.
        true
    }
}
